//! # 文件操作
//!
//! 复制/移动单个文件到目标路径。
//!
//! ## 保证
//! - 建目录幂等：并发创建同一目录不会报错
//! - 复制先写入同目录下的临时文件，再重命名到目标路径，
//!   目标路径上不会出现写了一半的文件
//! - 移动优先 `rename`，跨设备等失败时退化为复制 + 删除源文件
//! - I/O 失败按 `RetryPolicy` 重试
//!
//! ## 依赖关系
//! - 被 `batch/pipeline.rs` 调用

use crate::error::{RenkitError, Result};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// 对文件执行的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    /// 复制，保留源文件
    Copy,
    /// 移动，删除源文件
    Move,
    /// 只计算目标路径，不写文件系统
    DryRun,
}

impl fmt::Display for IoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoAction::Copy => write!(f, "copy"),
            IoAction::Move => write!(f, "move"),
            IoAction::DryRun => write!(f, "dry-run"),
        }
    }
}

/// 重试策略
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 首次失败后的最大重试次数
    pub retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// 确保目录存在（已存在或被其他线程抢先创建都视为成功）
pub fn ensure_dir(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(_) if path.is_dir() => Ok(()),
        Err(e) => Err(RenkitError::CreateDirError {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

/// 按策略重试执行操作
pub fn with_retry<T, F>(policy: RetryPolicy, what: &Path, mut op: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < policy.retries => {
                attempt += 1;
                tracing::warn!(
                    "{}: {} (retry {}/{})",
                    what.display(),
                    e,
                    attempt,
                    policy.retries
                );
                thread::sleep(policy.delay);
            }
            Err(e) => return Err(e),
        }
    }
}

/// 将源文件放到目标路径
///
/// `tag` 用于区分临时文件名，同一批次内每个任务必须不同。
pub fn place_file(action: IoAction, source: &Path, dest: &Path, tag: usize) -> Result<()> {
    match action {
        IoAction::DryRun => Ok(()),
        IoAction::Copy => {
            ensure_parent(dest)?;
            copy_atomic(source, dest, tag)
        }
        IoAction::Move => {
            ensure_parent(dest)?;
            move_file(source, dest, tag)
        }
    }
}

fn ensure_parent(dest: &Path) -> Result<()> {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// 临时文件路径：与目标同目录，保证最后的 rename 不跨设备
fn temp_path(dest: &Path, tag: usize) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.renkit-{}.tmp", name, tag))
}

fn copy_atomic(source: &Path, dest: &Path, tag: usize) -> Result<()> {
    let tmp = temp_path(dest, tag);
    let copy_err = |e| RenkitError::CopyError {
        from: source.display().to_string(),
        to: dest.display().to_string(),
        source: e,
    };

    if let Err(e) = fs::copy(source, &tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(copy_err(e));
    }
    if let Err(e) = fs::rename(&tmp, dest) {
        let _ = fs::remove_file(&tmp);
        return Err(copy_err(e));
    }
    Ok(())
}

fn move_file(source: &Path, dest: &Path, tag: usize) -> Result<()> {
    let move_err = |e| RenkitError::MoveError {
        from: source.display().to_string(),
        to: dest.display().to_string(),
        source: e,
    };

    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) if !source.exists() => Err(move_err(e)),
        Err(e) => {
            tracing::debug!(
                "rename {} failed ({}), falling back to copy",
                source.display(),
                e
            );
            copy_atomic(source, dest, tag)?;
            fs::remove_file(source).map_err(move_err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_concurrent() {
        let dir = TempDir::new().unwrap();
        let target = Arc::new(dir.path().join("a/b/c/d"));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let target = Arc::clone(&target);
                thread::spawn(move || ensure_dir(&target))
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert!(target.is_dir());
        ensure_dir(&target).unwrap();
    }

    #[test]
    fn test_ensure_dir_over_file_fails() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "x").unwrap();
        let err = ensure_dir(&file.join("sub")).unwrap_err();
        assert!(matches!(err, RenkitError::CreateDirError { .. }));
    }

    #[test]
    fn test_copy_overwrites_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.txt");
        let dest = dir.path().join("out/nested/dest.txt");
        fs::write(&src, "new").unwrap();
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, "old content").unwrap();

        place_file(IoAction::Copy, &src, &dest, 0).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        assert!(src.exists());
        let leftovers: Vec<_> = fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_move_removes_source() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.txt");
        let dest = dir.path().join("moved/dest.txt");
        fs::write(&src, "data").unwrap();

        place_file(IoAction::Move, &src, &dest, 0).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "data");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.txt");
        fs::write(&src, "data").unwrap();
        let dest = dir.path().join("never/dest.txt");

        place_file(IoAction::DryRun, &src, &dest, 0).unwrap();

        assert!(!dir.path().join("never").exists());
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let dir = TempDir::new().unwrap();
        let err = place_file(
            IoAction::Copy,
            &dir.path().join("missing"),
            &dir.path().join("dest"),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, RenkitError::CopyError { .. }));
    }

    #[test]
    fn test_retry_until_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            retries: 3,
            delay: Duration::ZERO,
        };
        let value = with_retry(policy, Path::new("x"), || {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(RenkitError::FileWriteError {
                    path: "x".into(),
                    source: std::io::Error::other("busy"),
                })
            } else {
                Ok(42)
            }
        })
        .unwrap();
        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_no_retry_for_transform_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry(RetryPolicy::default(), Path::new("x"), || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(RenkitError::NoMatch {
                pattern: "p".into(),
                name: "n".into(),
            })
        });
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
