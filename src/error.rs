//! # 统一错误处理模块
//!
//! 定义 renkit 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - 配置错误（致命，处理开始前中止）：正则语法、参数格式
//! - 扫描错误（致命）：根目录不存在或不可读
//! - 变换错误（单文件，可恢复）：保留匹配规则未命中
//! - I/O 错误（单文件，可恢复）：建目录、复制、移动失败
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// renkit 统一错误类型
#[derive(Error, Debug)]
pub enum RenkitError {
    // ─────────────────────────────────────────────────────────────
    // 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid regex for {option}: '{pattern}'\nReason: {source}")]
    InvalidRegex {
        option: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 扫描错误
    // ─────────────────────────────────────────────────────────────
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Failed to read directory: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 变换错误
    // ─────────────────────────────────────────────────────────────
    #[error("Pattern '{pattern}' does not match name '{name}'")]
    NoMatch { pattern: String, name: String },

    #[error("Renaming produces an empty name: {path}")]
    EmptyName { path: String },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to create directory: {path}: {source}")]
    CreateDirError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} -> {to}: {source}")]
    CopyError {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} -> {to}: {source}")]
    MoveError {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl RenkitError {
    /// 单文件错误是否值得重试（只有 I/O 类错误）
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RenkitError::CreateDirError { .. }
                | RenkitError::CopyError { .. }
                | RenkitError::MoveError { .. }
                | RenkitError::FileWriteError { .. }
        )
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, RenkitError>;
