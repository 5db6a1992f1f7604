//! # 日志初始化
//!
//! 基于 `tracing-subscriber` 的控制台日志，输出到 stderr。
//!
//! ## 日志级别
//! - 默认 `warn`：只显示单文件失败与重试
//! - `-v` → `info`，`-vv` → `debug`，`-vvv` → `trace`
//! - 设置 `RUST_LOG` 时以环境变量为准
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用

use tracing_subscriber::EnvFilter;

/// 根据 `-v` 次数选择默认级别
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// 初始化全局日志
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("renkit={}", level_for(verbosity))));

    // 重复初始化（例如测试中）时忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "trace");
    }
}
