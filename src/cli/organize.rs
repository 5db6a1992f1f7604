//! # organize 子命令 CLI 定义
//!
//! 按原名复制/移动匹配的文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/organize.rs`

use super::common::CommonArgs;
use clap::Args;

/// organize 子命令参数
#[derive(Args, Debug)]
pub struct OrganizeArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}
