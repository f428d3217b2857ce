use std::time::Duration;

/// 生成过程统计
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GenerationStats {
    pub validate_time: Duration,
    pub render_time: Duration,
    pub join_time: Duration,
    pub pdf_time: Duration,
    pub documents: usize,
    pub pairs_rendered: usize,
    pub pairs_skipped: usize,
    pub placeholders_resolved: usize,
    pub fallbacks: usize,
    pub overrides_applied: usize,
    pub files_joined: usize,
    pub output_size: usize,
}

impl GenerationStats {
    /// 回退替换在全部已解析占位符中的占比
    pub fn fallback_ratio(&self) -> f64 {
        if self.placeholders_resolved == 0 {
            0.0
        } else {
            self.fallbacks as f64 / self.placeholders_resolved as f64
        }
    }
}

/// 打印生成统计
pub fn print_generation_stats(stats: &GenerationStats, total_duration: Duration) {
    println!("\n📊 生成统计报告:");
    println!("═══════════════════════════════════════");

    // 时间分解
    println!("⏱️  时间分解:");
    println!("   校验字符串表: {}", format_duration(stats.validate_time));
    println!("   渲染模板: {}", format_duration(stats.render_time));
    if stats.files_joined > 0 {
        println!("   合并文档: {}", format_duration(stats.join_time));
    }
    if !stats.pdf_time.is_zero() {
        println!("   PDF生成: {}", format_duration(stats.pdf_time));
    }
    println!("   总耗时: {}", format_duration(total_duration));

    // 文档统计
    println!("\n📄 文档统计:");
    println!("   文档数: {} 个", stats.documents);
    println!("   已渲染: {} 个（文档，语言）组合", stats.pairs_rendered);
    if stats.pairs_skipped > 0 {
        println!("   已跳过: {} 个未配置语言的字符串表", stats.pairs_skipped);
    }
    println!(
        "   输出大小: {} 字节 ({:.1} KB)",
        stats.output_size,
        stats.output_size as f64 / 1024.0
    );

    // 翻译统计
    println!("\n🔤 翻译统计:");
    println!("   解析占位符: {} 项", stats.placeholders_resolved);
    println!(
        "   基础语言回退: {} 项 ({:.1}%)",
        stats.fallbacks,
        stats.fallback_ratio() * 100.0
    );
    println!("   覆盖规则命中: {} 项", stats.overrides_applied);
    if stats.files_joined > 0 {
        println!("   合并文件: {} 个", stats.files_joined);
    }
}

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.500s");
    }

    #[test]
    fn test_fallback_ratio() {
        let mut stats = GenerationStats::default();
        assert_eq!(stats.fallback_ratio(), 0.0);

        stats.placeholders_resolved = 4;
        stats.fallbacks = 1;
        assert!((stats.fallback_ratio() - 0.25).abs() < f64::EPSILON);
    }
}
