//! # 工具函数模块
//!
//! 提供美化输出、进度条、日志初始化、计划导出等工具。
//!
//! ## 依赖关系
//! - 被 `main.rs`、`batch/`、`commands/` 使用
//! - 子模块: export, logging, output, progress

pub mod export;
pub mod logging;
pub mod output;
pub mod progress;
