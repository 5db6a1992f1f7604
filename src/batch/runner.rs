//! # 批量执行器
//!
//! 在有界线程池中并行执行批量任务。
//!
//! ## 功能
//! - 基于 rayon 的固定大小线程池，最多 `jobs` 个任务同时运行
//! - 按提交顺序预留序号，与完成顺序无关
//! - 每完成一个任务更新一次 `RunStats`，进度条位置取自统计
//! - 单个任务失败只记录，不影响其他任务
//!
//! ## 依赖关系
//! - 被 `batch/pipeline.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rules/transformer.rs` 的 `SequenceCounter`

use crate::batch::FileTask;
use crate::error::Result;
use crate::rules::{SequenceCounter, SequenceSlot};
use crate::utils::progress;

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 单个任务成功时的落点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub destination: PathBuf,
    /// 是否真正写入了文件系统（dry-run 时为 false）
    pub written: bool,
}

/// 任务终态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// 已复制/移动
    Succeeded,
    /// dry-run，仅规划
    Planned,
    /// 失败（错误信息）
    Failed(String),
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Planned => "planned",
            TaskStatus::Failed(_) => "failed",
        }
    }
}

/// 单个任务结果
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub index: usize,
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub status: TaskStatus,
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub succeeded: usize,
    /// 规划数量（dry-run）
    pub planned: usize,
    /// 失败数量
    pub failed: usize,
    /// 按提交顺序排列的全部结果
    pub outcomes: Vec<TaskOutcome>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, outcome: TaskOutcome) {
        match outcome.status {
            TaskStatus::Succeeded => self.succeeded += 1,
            TaskStatus::Planned => self.planned += 1,
            TaskStatus::Failed(_) => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.succeeded + self.planned + self.failed
    }

    /// 失败详情
    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &str)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            TaskStatus::Failed(err) => Some((&o.source, err.as_str())),
            _ => None,
        })
    }
}

/// 运行统计（多个工作线程共享）
#[derive(Debug)]
pub struct RunStats {
    total: usize,
    processed: AtomicUsize,
    failed: AtomicUsize,
}

impl RunStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// 记录一个完成的任务，返回已完成总数
    pub fn record(&self, status: &TaskStatus) -> usize {
        if matches!(status, TaskStatus::Failed(_)) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
        self.processed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }
}

/// 单次运行的共享上下文
pub struct RunContext {
    pub counter: SequenceCounter,
    pub stats: RunStats,
    pub progress: ProgressBar,
}

impl RunContext {
    /// 记录一个到达终态的任务，进度条位置取自 `RunStats`
    pub fn complete(&self, status: &TaskStatus) -> usize {
        let done = self.stats.record(status);
        self.progress.set_position(self.stats.processed() as u64);
        done
    }

    pub fn new(total: usize, show_progress: bool) -> Self {
        let progress = if show_progress {
            progress::create_progress_bar(total as u64, "Processing")
        } else {
            ProgressBar::hidden()
        };
        Self {
            counter: SequenceCounter::new(),
            stats: RunStats::new(total),
            progress,
        }
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
    show_progress: bool,
}

impl BatchRunner {
    /// 创建新的批量执行器（0 = CPU 数 - 1，至少 1）
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { Self::default_jobs() } else { jobs };
        Self {
            jobs,
            show_progress: true,
        }
    }

    pub fn default_jobs() -> usize {
        num_cpus::get().saturating_sub(1).max(1)
    }

    /// 是否显示进度条
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理任务列表
    ///
    /// `sequence_uses` 为每个任务需要的序号个数。所有任务到达终态后返回，
    /// 结果按提交顺序排列。
    pub fn run<F>(&self, tasks: Vec<FileTask>, sequence_uses: u64, processor: F) -> Result<BatchResult>
    where
        F: Fn(&FileTask, SequenceSlot) -> Result<Placement> + Sync + Send,
    {
        if tasks.is_empty() {
            return Ok(BatchResult::default());
        }

        let ctx = RunContext::new(tasks.len(), self.show_progress);

        // 在调度线程上按提交顺序预留序号
        let jobs: Vec<(FileTask, SequenceSlot)> = tasks
            .into_iter()
            .map(|task| {
                let slot = ctx.counter.reserve(sequence_uses);
                (task, slot)
            })
            .collect();

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()?;

        let outcomes: Vec<TaskOutcome> = pool.install(|| {
            jobs.into_par_iter()
                .map(|(task, slot)| {
                    let outcome = match processor(&task, slot) {
                        Ok(placement) => TaskOutcome {
                            index: task.index,
                            source: task.source.clone(),
                            status: if placement.written {
                                TaskStatus::Succeeded
                            } else {
                                TaskStatus::Planned
                            },
                            destination: Some(placement.destination),
                        },
                        Err(e) => {
                            ctx.progress.suspend(|| {
                                tracing::warn!("{}: {}", task.source.display(), e);
                            });
                            TaskOutcome {
                                index: task.index,
                                source: task.source.clone(),
                                destination: None,
                                status: TaskStatus::Failed(e.to_string()),
                            }
                        }
                    };

                    ctx.complete(&outcome.status);
                    outcome
                })
                .collect()
        });

        ctx.progress.set_position(ctx.stats.processed() as u64);
        ctx.progress.finish_with_message("Done");
        tracing::debug!(
            "drained {}/{} tasks ({} failed)",
            ctx.stats.processed(),
            ctx.stats.total(),
            ctx.stats.failed()
        );

        // 汇总结果
        let mut batch_result = BatchResult::default();
        for outcome in outcomes {
            batch_result.merge(outcome);
        }

        Ok(batch_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenkitError;
    use std::path::Path;
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    fn tasks(n: usize) -> Vec<FileTask> {
        (0..n)
            .map(|i| {
                let name = format!("f{:03}.txt", i);
                FileTask::new(i, Path::new("/in").join(&name), PathBuf::from(name))
            })
            .collect()
    }

    fn runner(jobs: usize) -> BatchRunner {
        BatchRunner::new(jobs).with_progress(false)
    }

    #[test]
    fn test_default_jobs_at_least_one() {
        assert!(BatchRunner::default_jobs() >= 1);
        assert_eq!(BatchRunner::new(0).jobs(), BatchRunner::default_jobs());
        assert_eq!(BatchRunner::new(3).jobs(), 3);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let result = runner(4)
            .run(Vec::new(), 1, |_, _| panic!("no task should run"))
            .unwrap();
        assert_eq!(result.total(), 0);
        assert!(result.outcomes.is_empty());
    }

    #[test]
    fn test_sequence_follows_submission_order() {
        // 序号小的任务睡得更久，完成顺序与提交顺序相反
        let seen = Mutex::new(Vec::new());
        let result = runner(4)
            .run(tasks(8), 1, |task, mut slot| {
                thread::sleep(Duration::from_millis(5 * (8 - task.index as u64)));
                seen.lock().unwrap().push((task.index, slot.take()));
                Ok(Placement {
                    destination: task.relative.clone(),
                    written: true,
                })
            })
            .unwrap();

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        let expected: Vec<_> = (0..8).map(|i| (i, i as u64 + 1)).collect();
        assert_eq!(seen, expected);
        assert_eq!(result.succeeded, 8);
    }

    #[test]
    fn test_each_task_runs_once_within_bound() {
        let running = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let calls = Mutex::new(Vec::new());

        let result = runner(3)
            .run(tasks(30), 0, |task, _| {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(2));
                calls.lock().unwrap().push(task.index);
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(Placement {
                    destination: task.relative.clone(),
                    written: false,
                })
            })
            .unwrap();

        let mut calls = calls.into_inner().unwrap();
        calls.sort();
        assert_eq!(calls, (0..30).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(result.planned, 30);
        let order: Vec<_> = result.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(order, (0..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_failures_do_not_stop_siblings() {
        let result = runner(4)
            .run(tasks(10), 0, |task, _| {
                if task.index % 3 == 0 {
                    Err(RenkitError::NoMatch {
                        pattern: "x".into(),
                        name: task.base_name(),
                    })
                } else {
                    Ok(Placement {
                        destination: task.relative.clone(),
                        written: true,
                    })
                }
            })
            .unwrap();

        assert_eq!(result.total(), 10);
        assert_eq!(result.failed, 4);
        assert_eq!(result.succeeded, 6);
        let failed: Vec<_> = result.failures().map(|(p, _)| p.clone()).collect();
        assert_eq!(failed[0], Path::new("/in/f000.txt"));
    }

    #[test]
    fn test_run_stats_counts() {
        let stats = RunStats::new(3);
        assert_eq!(stats.record(&TaskStatus::Succeeded), 1);
        assert_eq!(stats.record(&TaskStatus::Failed("e".into())), 2);
        assert_eq!(stats.record(&TaskStatus::Planned), 3);
        assert_eq!(stats.processed(), stats.total());
        assert_eq!(stats.failed(), 1);
    }

    #[test]
    fn test_progress_follows_run_stats() {
        let ctx = RunContext::new(4, false);
        assert_eq!(ctx.complete(&TaskStatus::Succeeded), 1);
        assert_eq!(ctx.complete(&TaskStatus::Failed("e".into())), 2);
        assert_eq!(ctx.progress.position(), 2);
        assert_eq!(ctx.progress.position() as usize, ctx.stats.processed());
        assert_eq!(ctx.stats.failed(), 1);
    }
}
