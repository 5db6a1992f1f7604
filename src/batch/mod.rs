//! # 批量处理模块
//!
//! 提供统一的文件批量处理能力。
//!
//! ## 功能
//! - 收集匹配文件列表
//! - 计算输出路径
//! - 并发复制/移动
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod fsops;
pub mod layout;
pub mod pipeline;
pub mod runner;

pub use collector::{FileCollector, FileTask};
pub use fsops::{IoAction, RetryPolicy};
pub use layout::OutputLayout;
pub use pipeline::Pipeline;
pub use runner::{BatchResult, BatchRunner, Placement, TaskStatus};
