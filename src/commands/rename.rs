//! # rename 命令实现
//!
//! 编译重命名规则，然后交给公共流程批量处理。
//!
//! ## 依赖关系
//! - 使用 `cli/rename.rs` 定义的参数
//! - 使用 `rules/` 编译规则集
//! - 使用 `commands/apply.rs` 执行

use super::apply;
use crate::cli::rename::RenameArgs;
use crate::error::Result;
use crate::rules::RuleSet;
use crate::utils::output;

/// 执行 rename 命令
pub fn execute(args: RenameArgs) -> Result<()> {
    output::print_header("Batch Rename");

    // 正则等配置错误在扫描文件之前报告
    let config = args.transform_config()?;
    let rules = RuleSet::from_config(&config)?;

    if rules.is_empty() {
        output::print_warning("No rename rules given; files keep their names.");
    } else {
        let labels: Vec<_> = rules.rules().iter().map(|r| r.label()).collect();
        output::print_info(&format!("Rules: {}", labels.join(" -> ")));
    }

    apply::run(&args.common, rules)?;
    Ok(())
}
