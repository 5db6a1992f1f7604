//! # 公共参数定义
//!
//! `rename` 与 `organize` 共用的文件选择、输出与调度参数。
//!
//! ## 依赖关系
//! - 被 `cli/rename.rs`、`cli/organize.rs` 展开（flatten）使用
//! - 参数传递给 `commands/apply.rs`

use crate::batch::{IoAction, RetryPolicy};

use clap::{ArgGroup, Args};
use std::path::PathBuf;
use std::time::Duration;

/// 文件选择、输出与调度参数
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("operation").required(true).args(["copy", "cut"])))]
pub struct CommonArgs {
    /// Root directory to scan
    #[arg(short, long)]
    pub dir: PathBuf,

    /// Output root directory
    #[arg(short = 'o', long, visible_alias = "save", alias = "save_dir", default_value = "output")]
    pub save_dir: PathBuf,

    /// Only process these extensions (comma separated, e.g. 'jpg,png')
    #[arg(short, long = "extension", alias = "extensions", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Only process files whose name matches one of these glob patterns (comma separated)
    #[arg(long = "file-name", alias = "file_name", value_delimiter = ',')]
    pub file_names: Vec<String>,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Keep the input directory structure under the output directory
    #[arg(short, long, aliases = ["keep_structure", "preserve", "preserve-structure"], default_value_t = false)]
    pub keep_structure: bool,

    /// Nest the output under a folder named after the input directory
    #[arg(long, alias = "preserve_own_folder", default_value_t = false)]
    pub preserve_own_folder: bool,

    /// Number of worker threads (0 = CPU count - 1)
    #[arg(short = 'j', long, env = "RENKIT_THREADS", default_value_t = 0)]
    pub threads: usize,

    /// Dry run: print the planned source -> destination mapping without touching files
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Copy files, keeping the source
    #[arg(long, default_value_t = false)]
    pub copy: bool,

    /// Move files, removing the source
    #[arg(long, default_value_t = false)]
    pub cut: bool,

    /// Retries for a failed copy/move
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Delay between retries in milliseconds
    #[arg(long, alias = "retry_delay_ms", default_value_t = 1000)]
    pub retry_delay_ms: u64,

    /// Write the source -> destination plan with per-file status to a CSV file
    #[arg(long, value_name = "CSV")]
    pub plan: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl CommonArgs {
    /// 实际执行的文件操作
    pub fn action(&self) -> IoAction {
        if self.debug {
            IoAction::DryRun
        } else if self.cut {
            IoAction::Move
        } else {
            IoAction::Copy
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}
