//! 源文档获取模块
//!
//! 将源文档放入项目的暂存目录：本地目录做平铺复制，远程Wiki仓库做浅克隆。

// 标准库导入
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

// 第三方crate导入
use tracing::{debug, info, warn};
use url::Url;
use walkdir::WalkDir;

// 本地模块导入
use crate::config::ProjectLayout;
use crate::constants::project_defaults::WIKI_IGNORE;
use crate::error::{file_error, Result};
use crate::localize_error;

/// 输入源类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// 本地目录
    Directory(PathBuf),
    /// 远程Wiki仓库
    Url(Url),
}

impl InputSource {
    /// 判断输入是URL还是本地目录
    pub fn from_descriptor(input: &str) -> Result<Self> {
        if let Ok(url) = Url::parse(input) {
            if matches!(url.scheme(), "http" | "https" | "ssh" | "git") {
                return Ok(InputSource::Url(url));
            }
        }

        let path = PathBuf::from(input);
        if !path.is_dir() {
            return Err(localize_error!(input_validation, input, "既不是URL也不是已存在的目录"));
        }
        Ok(InputSource::Directory(path))
    }

    /// 将源文档放入暂存目录，返回排序后的暂存文件
    ///
    /// 暂存目录先被清空，只保留本次输入源的内容。
    pub fn stage(&self, layout: &ProjectLayout) -> Result<Vec<PathBuf>> {
        let staging = layout.staging_dir();
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(file_error(&staging, "删除"))?;
        }
        match self {
            InputSource::Directory(dir) => {
                layout.ensure_dir(&staging)?;
                copy_flat(dir, &staging)?;
            }
            InputSource::Url(url) => {
                layout.ensure_dir(layout.project_dir())?;
                shallow_clone(url, &staging)?;
                remove_ignored(&staging)?;
            }
        }

        let staged = list_files(&staging)?;
        info!("📥 已暂存 {} 个文件: {}", staged.len(), staging.display());
        Ok(staged)
    }
}

/// 按文件名排序遍历目录第一层
fn walk_flat(dir: &Path) -> impl Iterator<Item = Result<walkdir::DirEntry>> + '_ {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(move |entry| {
            entry.map_err(|e| {
                let io = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("目录遍历失败"));
                file_error(dir, "读取目录")(io)
            })
        })
}

/// 复制目录第一层的普通文件
pub fn copy_flat(source: &Path, destination: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in walk_flat(source) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            debug!("跳过非文件项: {}", entry.path().display());
            continue;
        }

        let target = destination.join(entry.file_name());
        fs::copy(entry.path(), &target).map_err(file_error(entry.path(), "复制"))?;
        copied += 1;
    }
    Ok(copied)
}

/// `git clone --depth 1 <url> <destination>`
fn shallow_clone(url: &Url, destination: &Path) -> Result<()> {
    info!("🌐 克隆Wiki仓库: {}", url);
    let output = Command::new("git")
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg(url.as_str())
        .arg(destination)
        .output()
        .map_err(|e| localize_error!(tool, "git", e))?;

    if !output.status.success() {
        return Err(localize_error!(
            tool,
            "git",
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(())
}

/// 删除名称中包含Wiki专用标记（`.git`、`Home`、`_Sidebar`、`_Footer`）的条目
pub fn remove_ignored(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    // 先收集再删除，遍历过程中不修改目录
    let entries = walk_flat(dir).collect::<Result<Vec<_>>>()?;

    for entry in entries {
        let name = entry.file_name().to_string_lossy().to_string();
        if !WIKI_IGNORE.iter().any(|ignored| name.contains(ignored)) {
            continue;
        }

        let path = entry.path();
        if entry.file_type().is_dir() {
            fs::remove_dir_all(&path).map_err(file_error(&path, "删除"))?;
        } else {
            fs::remove_file(&path).map_err(file_error(&path, "删除"))?;
        }
        debug!("已移除Wiki专用文件: {}", path.display());
        removed += 1;
    }
    Ok(removed)
}

/// 列出目录第一层的普通文件（排序）
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walk_flat(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        } else {
            warn!("⚠️  暂存目录中存在非文件项: {}", entry.path().display());
        }
    }
    Ok(files)
}
