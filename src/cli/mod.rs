//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `rename`: 按规则重命名并复制/移动文件
//! - `organize`: 不改名，按原名复制/移动文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, organize, rename

pub mod common;
pub mod organize;
pub mod rename;

use clap::{ArgAction, Parser, Subcommand};

/// renkit - 批量文件重命名与整理工具
#[derive(Parser, Debug)]
#[command(name = "renkit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch file renaming and organizing toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rename matched files with a rule pipeline and copy/move them to the output directory
    Rename(rename::RenameArgs),

    /// Copy or move matched files to the output directory without renaming
    Organize(organize::OrganizeArgs),
}
