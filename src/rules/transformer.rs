//! # 文件名变换器
//!
//! 对单个文件应用规则集，得到新的相对输出路径。
//!
//! ## 序号分配
//! `SequenceCounter` 是单次运行内共享的原子计数器。调度器按提交顺序为每个
//! 任务预留一段连续序号（`SequenceSlot`），变换时只消耗自己的那一段，
//! 因此序号与完成顺序无关。
//!
//! ## 依赖关系
//! - 被 `batch/pipeline.rs` 调用
//! - 使用 `rules/mod.rs` 的 `RuleSet`
//! - 使用 `batch/collector.rs` 的 `FileTask`

use super::{RuleSet, TargetMode};
use crate::batch::FileTask;
use crate::error::{RenkitError, Result};

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// 运行期序号计数器，从 1 开始
#[derive(Debug)]
pub struct SequenceCounter {
    next: AtomicU64,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// 原子地预留 `count` 个连续序号
    pub fn reserve(&self, count: u64) -> SequenceSlot {
        let start = self.next.fetch_add(count, Ordering::SeqCst);
        SequenceSlot {
            next: start,
            end: start + count,
        }
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// 单个任务预留的序号段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSlot {
    next: u64,
    end: u64,
}

impl SequenceSlot {
    /// 不含序号的空段
    #[cfg(test)]
    pub fn empty() -> Self {
        Self { next: 0, end: 0 }
    }

    /// 取出下一个序号
    pub fn take(&mut self) -> u64 {
        debug_assert!(self.remaining() > 0, "sequence slot exhausted");
        let value = self.next;
        self.next += 1;
        value
    }

    /// 剩余可用序号数
    pub fn remaining(&self) -> u64 {
        self.end.saturating_sub(self.next)
    }
}

/// 单个文件的变换结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    /// 源文件相对扫描根目录的父目录
    pub relative_dir: PathBuf,
    /// 新名称（文件夹模式下不带扩展名）
    pub name: PathBuf,
}

impl TransformResult {
    /// 保留目录结构时的完整相对路径
    pub fn relative_path(&self) -> PathBuf {
        self.relative_dir.join(&self.name)
    }
}

/// 文件名变换器
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    rules: RuleSet,
}

impl Transformer {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn sequence_uses(&self) -> u64 {
        self.rules.sequence_uses()
    }

    /// 变换单个文件
    pub fn transform(&self, task: &FileTask, slot: &mut SequenceSlot) -> Result<TransformResult> {
        let base_name = task.base_name();
        let new_base = self.rules.apply(&base_name, slot)?;
        let target = self.rules.target();

        if new_base.is_empty() && (task.extension.is_none() || target == TargetMode::FolderOnly) {
            return Err(RenkitError::EmptyName {
                path: task.source.display().to_string(),
            });
        }

        let name = match target {
            TargetMode::FolderOnly => PathBuf::from(&new_base),
            TargetMode::FileOnly | TargetMode::FullName => match &task.extension {
                Some(ext) => PathBuf::from(format!("{}.{}", new_base, ext)),
                None => PathBuf::from(&new_base),
            },
        };

        tracing::debug!(
            source = %task.source.display(),
            renamed = %name.display(),
            "transformed"
        );

        Ok(TransformResult {
            relative_dir: task.relative_dir(),
            name,
        })
    }
}
