use tracing::Level;

/// 根据命令行开关选择日志级别，静默模式返回None
pub fn log_level(verbose: bool, quiet: bool) -> Option<Level> {
    match (verbose, quiet) {
        (_, true) => None,
        (true, false) => Some(Level::DEBUG),
        (false, false) => Some(Level::INFO),
    }
}

/// 初始化日志系统
pub fn init_logging(verbose: bool, quiet: bool) {
    let Some(level) = log_level(verbose, quiet) else {
        return;
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(false, false), Some(Level::INFO));
        assert_eq!(log_level(true, false), Some(Level::DEBUG));
        assert_eq!(log_level(false, true), None);
    }
}
