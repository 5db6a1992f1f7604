//! # renkit - 批量文件重命名与整理工具
//!
//! 扫描目录，按扩展名或文件名筛选文件，套用一串重命名规则，
//! 再复制或移动到输出目录（可保留目录结构）。
//!
//! ## 子命令
//! - `rename`   - 按规则重命名并复制/移动
//! - `organize` - 按原名复制/移动
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── rules/  (重命名规则与变换器)
//!   │     └── batch/  (文件收集、并行调度、文件操作)
//!   ├── utils/      (输出、进度条、日志、导出)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod rules;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
