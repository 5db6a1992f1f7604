//! # organize 命令实现
//!
//! 不改名，按原文件名复制/移动到输出目录。
//!
//! ## 依赖关系
//! - 使用 `cli/organize.rs` 定义的参数
//! - 使用 `commands/apply.rs` 执行

use super::apply;
use crate::cli::organize::OrganizeArgs;
use crate::error::Result;
use crate::rules::RuleSet;
use crate::utils::output;

/// 执行 organize 命令
pub fn execute(args: OrganizeArgs) -> Result<()> {
    output::print_header("Organize Files");
    apply::run(&args.common, RuleSet::empty())?;
    Ok(())
}
