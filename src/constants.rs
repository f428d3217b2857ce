/// 项目常量配置
///
/// 该文件定义了项目目录布局、翻译后端和PDF生成相关的常量，方便统一管理和维护

/// 项目目录默认配置
pub mod project_defaults {
    /// 默认项目目录
    pub const PROJECT_DIR: &str = "docs";

    /// 项目配置文件名
    pub const CONFIG_FILENAME: &str = ".localize-docs.yml";

    /// 覆盖规则文件名
    pub const OVERRIDES_FILENAME: &str = "overrides.yml";

    /// 源文件及中间文件的暂存目录
    pub const DIR_STAGING: &str = "staging";

    /// 各语言字符串表目录
    pub const DIR_TRANSLATIONS: &str = "translations";

    /// 可复用模板目录
    pub const DIR_TEMPLATES: &str = "templates";

    /// 最终输出目录
    pub const DIR_OUTPUT: &str = "output";

    /// 新建目录权限（unix）
    pub const DIR_PERMISSIONS: u32 = 0o750;

    /// 默认基础语言
    pub const BASE_LANGUAGE: &str = "en";

    /// 默认目标语言
    pub const TARGET_LANGUAGES: &[&str] = &["en", "fa"];

    /// 模板文件后缀
    pub const TEMPLATE_SUFFIX: &str = "html.tmpl";

    /// 可处理的源文件扩展名
    pub const SOURCE_EXTENSIONS: &[&str] = &["md", "markdown"];

    /// 暂存远程Wiki时忽略的文件名片段
    pub const WIKI_IGNORE: &[&str] = &[".git", "Home", "_Sidebar", "_Footer"];
}

/// 翻译后端配置
pub mod translator_config {
    /// Google Translate v2 接口地址
    pub const GOOGLE_API_URL: &str = "https://translation.googleapis.com/language/translate/v2";

    /// API密钥环境变量
    pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

    /// 单次请求最多文本数
    pub const GOOGLE_MAX_BATCH_SIZE: usize = 128;

    /// 请求超时时间（秒）
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// 模拟翻译器支持的语言
    pub const MOCK_LANGUAGES: &[&str] = &["en", "es", "ru", "fa", "ar", "zh"];
}

/// PDF生成配置
pub mod pdf_config {
    /// 外部转换程序
    pub const PANDOC_BINARY: &str = "pandoc";

    /// 默认PDF引擎
    pub const PDF_ENGINE: &str = "xelatex";

    /// 章节分隔：在每个<h1>前插入换行
    pub const CHAPTER_BREAK: &str = "<br><h1>";
}

/// 根据语言选择PDF主字体和文字方向
pub fn pdf_font_for_language(lang: &str) -> Option<(&'static str, &'static str)> {
    match lang {
        "en" | "ru" => Some(("Noto Sans", "ltr")),
        "fa" | "ar" => Some(("Noto Sans Arabic", "rtl")),
        "zh" => Some(("Noto Sans CJK SC", "ltr")),
        _ => None,
    }
}

/// 验证文件扩展名是否为可处理的源文件
pub fn is_source_extension(ext: &str) -> bool {
    project_defaults::SOURCE_EXTENSIONS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(ext))
}
