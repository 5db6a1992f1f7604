//! # 计划导出
//!
//! 将每个文件的 源路径 → 目标路径 映射及处理状态导出为 CSV。
//!
//! ## 依赖关系
//! - 被 `commands/apply.rs` 调用
//! - 使用 `batch/runner.rs` 的 `BatchResult`
//! - 使用 `csv` + `serde` 写入

use crate::batch::{BatchResult, TaskStatus};
use crate::error::{RenkitError, Result};

use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct PlanRow<'a> {
    index: usize,
    source: String,
    destination: String,
    status: &'a str,
    error: &'a str,
}

/// 导出处理计划为 CSV
pub fn write_plan(result: &BatchResult, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for outcome in &result.outcomes {
        let error = match &outcome.status {
            TaskStatus::Failed(err) => err.as_str(),
            _ => "",
        };
        wtr.serialize(PlanRow {
            index: outcome.index,
            source: outcome.source.display().to_string(),
            destination: outcome
                .destination
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
            status: outcome.status.label(),
            error,
        })?;
    }

    wtr.flush().map_err(|e| RenkitError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
