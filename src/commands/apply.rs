//! # 公共批处理流程
//!
//! `rename` 与 `organize` 共用：扫描 → 并行处理 → 汇总报告 → 可选导出计划。
//!
//! ## 依赖关系
//! - 被 `commands/rename.rs`、`commands/organize.rs` 调用
//! - 使用 `cli/common.rs` 的参数
//! - 使用 `batch/` 执行，`utils/` 输出

use crate::batch::{
    BatchResult, BatchRunner, FileCollector, IoAction, OutputLayout, Pipeline, TaskStatus,
};
use crate::cli::common::CommonArgs;
use crate::error::Result;
use crate::rules::{RuleSet, Transformer};
use crate::utils::{export, output};

use std::path::Path;
use tabled::{Table, Tabled};

/// 失败列表最多显示的条数
const MAX_LISTED_FAILURES: usize = 10;

/// 执行一次完整的批处理
pub fn run(common: &CommonArgs, rules: RuleSet) -> Result<BatchResult> {
    // 收集文件
    let collector = FileCollector::new(common.dir.clone())
        .with_extensions(&common.extensions)
        .with_names(&common.file_names)?
        .recursive(common.recursive)
        .exclude(&common.save_dir);

    let tasks = collector.collect()?;

    if tasks.is_empty() {
        output::print_warning(&format!(
            "No matching files found under '{}'",
            common.dir.display()
        ));
        return Ok(BatchResult::default());
    }

    output::print_info(&format!("Found {} files", tasks.len()));

    let mut layout = OutputLayout::new(&common.save_dir, common.keep_structure);
    if common.preserve_own_folder {
        layout = layout.nested_in(&common.dir);
    }

    let action = common.action();
    output::print_info(&format!(
        "Output: '{}' ({})",
        layout.root().display(),
        action
    ));

    let runner = BatchRunner::new(common.threads).with_progress(!common.no_progress);
    output::print_info(&format!("Using {} worker(s)", runner.jobs()));

    let pipeline = Pipeline::new(Transformer::new(rules), layout, action)
        .with_retry(common.retry_policy());
    let result = pipeline.execute(&runner, tasks)?;

    if action == IoAction::DryRun {
        print_plan(&result, &common.dir);
    }

    print_summary(&result, action);

    if let Some(plan_path) = &common.plan {
        export::write_plan(&result, plan_path)?;
        output::print_success(&format!("Plan saved to '{}'", plan_path.display()));
    }

    Ok(result)
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Destination")]
    destination: String,
}

/// 打印 dry-run 计划
fn print_plan(result: &BatchResult, input_dir: &Path) {
    let input_root = input_dir.canonicalize().unwrap_or_else(|_| input_dir.to_path_buf());
    let rows: Vec<PlanRow> = result
        .outcomes
        .iter()
        .filter(|o| o.status == TaskStatus::Planned)
        .map(|o| PlanRow {
            index: o.index + 1,
            source: o
                .source
                .strip_prefix(&input_root)
                .unwrap_or(o.source.as_path())
                .display()
                .to_string(),
            destination: o
                .destination
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
        })
        .collect();

    if !rows.is_empty() {
        output::print_header("Planned Operations (dry run, nothing written)");
        let table = Table::new(&rows);
        println!("{}", table);
    }
}

/// 打印统计
fn print_summary(result: &BatchResult, action: IoAction) {
    output::print_separator();

    let done = match action {
        IoAction::DryRun => format!("{}/{} planned", result.planned, result.total()),
        IoAction::Copy => format!("{}/{} copied", result.succeeded, result.total()),
        IoAction::Move => format!("{}/{} moved", result.succeeded, result.total()),
    };

    if result.failed == 0 {
        output::print_done(&format!("Completed: {}", done));
        return;
    }

    output::print_warning(&format!(
        "Completed with {} failure(s): {}, {} failed",
        result.failed, done, result.failed
    ));
    output::print_warning("Failed files:");
    for (path, err) in result.failures().take(MAX_LISTED_FAILURES) {
        output::print_error(&format!("  {}: {}", path.display(), err));
    }
    if result.failed > MAX_LISTED_FAILURES {
        output::print_warning(&format!(
            "  ... and {} more",
            result.failed - MAX_LISTED_FAILURES
        ));
    }
}
