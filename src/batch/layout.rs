//! # 输出路径布局
//!
//! 把变换结果映射到输出根目录下的目标路径。
//!
//! ## 规则
//! - 保留结构：`输出根/相对父目录/新名称`
//! - 不保留结构：`输出根/新名称`（同名文件后写者覆盖）
//! - `preserve_own_folder`：输出根下再套一层输入目录自身的名字
//!
//! ## 依赖关系
//! - 被 `batch/pipeline.rs` 调用
//! - 使用 `rules/transformer.rs` 的 `TransformResult`

use crate::rules::TransformResult;

use std::path::{Path, PathBuf};

/// 输出路径布局
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    keep_structure: bool,
}

impl OutputLayout {
    pub fn new(save_dir: &Path, keep_structure: bool) -> Self {
        Self {
            root: save_dir.to_path_buf(),
            keep_structure,
        }
    }

    /// 在输出根下嵌套输入目录自身的文件夹
    pub fn nested_in(mut self, input_dir: &Path) -> Self {
        let name = input_dir
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_os_string()))
            .or_else(|| input_dir.file_name().map(|n| n.to_os_string()));
        if let Some(name) = name {
            self.root = self.root.join(name);
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 计算目标路径
    pub fn destination(&self, result: &TransformResult) -> PathBuf {
        if self.keep_structure {
            self.root.join(result.relative_path())
        } else {
            self.root.join(&result.name)
        }
    }
}
