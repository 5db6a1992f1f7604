//! # 文件收集器
//!
//! 扫描输入目录，按扩展名和文件名模式筛选，生成待处理任务列表。
//!
//! ## 功能
//! - 扩展名筛选（不区分大小写，可带或不带 `.`）
//! - 文件名 glob 模式筛选
//! - 递归目录搜索
//! - 排除输出目录，避免处理自己的输出
//! - 结果按路径排序，提交顺序确定
//!
//! ## 依赖关系
//! - 被 `commands/apply.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{RenkitError, Result};

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 待处理文件（创建后不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// 提交序号（扫描顺序）
    pub index: usize,
    /// 源文件绝对路径
    pub source: PathBuf,
    /// 扩展名（不含 `.`）
    pub extension: Option<String>,
    /// 相对扫描根目录的路径
    pub relative: PathBuf,
}

impl FileTask {
    pub fn new(index: usize, source: PathBuf, relative: PathBuf) -> Self {
        let extension = relative
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        Self {
            index,
            source,
            extension,
            relative,
        }
    }

    /// 去掉扩展名后的基名
    pub fn base_name(&self) -> String {
        self.relative
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// 相对父目录
    pub fn relative_dir(&self) -> PathBuf {
        self.relative
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

/// 文件收集器
pub struct FileCollector {
    /// 扫描根目录
    root: PathBuf,
    /// 扩展名（已规范化为小写、无 `.`）
    extensions: Vec<String>,
    /// 文件名模式
    names: Vec<glob::Pattern>,
    /// 是否递归
    recursive: bool,
    /// 跳过的目录
    excluded: Vec<PathBuf>,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extensions: Vec::new(),
            names: Vec::new(),
            recursive: false,
            excluded: Vec::new(),
        }
    }

    /// 设置扩展名筛选（空列表表示不筛选）
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// 设置文件名模式（glob 语法，空列表表示不筛选）
    pub fn with_names(mut self, names: &[String]) -> Result<Self> {
        self.names = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(|n| {
                glob::Pattern::new(n).map_err(|e| {
                    RenkitError::InvalidArgument(format!("Invalid file name pattern '{}': {}", n, e))
                })
            })
            .collect::<Result<_>>()?;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 跳过某个目录（例如位于输入目录内的输出目录；根目录本身不会被跳过）
    pub fn exclude(mut self, dir: &Path) -> Self {
        if let Ok(dir) = dir.canonicalize() {
            self.excluded.push(dir);
        }
        self
    }

    /// 收集所有匹配的文件，按路径排序并编号
    pub fn collect(&self) -> Result<Vec<FileTask>> {
        if !self.root.is_dir() {
            return Err(RenkitError::DirectoryNotFound {
                path: self.root.display().to_string(),
            });
        }

        let root = self
            .root
            .canonicalize()
            .map_err(|e| RenkitError::FileReadError {
                path: self.root.display().to_string(),
                source: e,
            })?;

        // 根目录不可读时直接报错，而不是静默返回空列表
        fs::read_dir(&root).map_err(|e| RenkitError::FileReadError {
            path: root.display().to_string(),
            source: e,
        })?;

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut paths: Vec<PathBuf> = WalkDir::new(&root)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.excluded.iter().any(|x| e.path() == x.as_path()))
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry: {}", err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| e.into_path())
            .collect();

        paths.sort();

        let tasks = paths
            .into_iter()
            .enumerate()
            .map(|(index, source)| {
                let relative = source
                    .strip_prefix(&root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| PathBuf::from(source.file_name().unwrap_or_default()));
                FileTask::new(index, source, relative)
            })
            .collect();

        Ok(tasks)
    }

    /// 检查文件是否通过扩展名与文件名筛选
    fn matches(&self, path: &Path) -> bool {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        let ext_ok = self.extensions.is_empty()
            || path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| self.extensions.contains(&e.to_lowercase()))
                .unwrap_or(false);

        let name_ok = self.names.is_empty() || self.names.iter().any(|p| p.matches(filename));

        ext_ok && name_ok
    }
}
