//! # 处理流水线
//!
//! 单个任务：变换文件名 → 计算目标路径 → 复制/移动。
//! 整批任务交给 `BatchRunner` 并行执行。
//!
//! ## 依赖关系
//! - 被 `commands/apply.rs` 调用
//! - 使用 `rules/` 的 `Transformer`
//! - 使用 `batch/layout.rs`、`batch/fsops.rs`、`batch/runner.rs`

use crate::batch::fsops::{self, IoAction, RetryPolicy};
use crate::batch::{BatchResult, BatchRunner, FileTask, OutputLayout, Placement};
use crate::error::Result;
use crate::rules::{SequenceSlot, Transformer};

/// 处理流水线
pub struct Pipeline {
    transformer: Transformer,
    layout: OutputLayout,
    action: IoAction,
    retry: RetryPolicy,
}

impl Pipeline {
    pub fn new(transformer: Transformer, layout: OutputLayout, action: IoAction) -> Self {
        Self {
            transformer,
            layout,
            action,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// 处理单个任务
    pub fn process(&self, task: &FileTask, mut slot: SequenceSlot) -> Result<Placement> {
        let result = self.transformer.transform(task, &mut slot)?;
        let destination = self.layout.destination(&result);

        fsops::with_retry(self.retry, &task.source, || {
            fsops::place_file(self.action, &task.source, &destination, task.index)
        })?;

        Ok(Placement {
            destination,
            written: self.action != IoAction::DryRun,
        })
    }

    /// 并行处理整批任务
    pub fn execute(&self, runner: &BatchRunner, tasks: Vec<FileTask>) -> Result<BatchResult> {
        runner.run(tasks, self.transformer.sequence_uses(), |task, slot| {
            self.process(task, slot)
        })
    }
}
