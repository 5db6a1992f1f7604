//! # rename 子命令 CLI 定义
//!
//! 重命名规则参数，以及把参数解析为 `TransformConfig`。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/rename.rs`
//! - 生成 `rules/` 的 `TransformConfig`

use super::common::CommonArgs;
use crate::error::{RenkitError, Result};
use crate::rules::{TargetMode, TransformConfig};

use clap::{ArgGroup, Args};

/// rename 子命令参数
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").args(["folder", "file"])))]
pub struct RenameArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Delete the first N characters
    #[arg(long, alias = "del_first", value_name = "N", default_value_t = 0)]
    pub del_first: usize,

    /// Delete the last N characters
    #[arg(long, alias = "del_last", value_name = "N", default_value_t = 0)]
    pub del_last: usize,

    /// Add a string at the beginning
    #[arg(long, alias = "add_first", value_name = "TEXT")]
    pub add_first: Option<String>,

    /// Add a string at the end
    #[arg(long, alias = "add_last", value_name = "TEXT")]
    pub add_last: Option<String>,

    /// Add a sequence number at the beginning ('{n}_')
    #[arg(long, alias = "add_number_first", default_value_t = false)]
    pub add_number_first: bool,

    /// Add a sequence number at the end ('_{n}')
    #[arg(long, alias = "add_number_last", default_value_t = false)]
    pub add_number_last: bool,

    /// Zero-pad sequence numbers to this width (0 = no padding)
    #[arg(long, alias = "number_width", value_name = "WIDTH", default_value_t = 0)]
    pub number_width: usize,

    /// Replace every regex match: "FROM TO" (or "FROM->TO"); omit TO to delete
    #[arg(long, value_name = "FROM TO")]
    pub replace: Option<String>,

    /// Delete everything from the first occurrence of TOKEN
    #[arg(long, alias = "del_after", value_name = "TOKEN")]
    pub del_after: Option<String>,

    /// Delete everything up to and including the last occurrence of TOKEN
    #[arg(long, alias = "del_before", value_name = "TOKEN")]
    pub del_before: Option<String>,

    /// Insert TEXT after every match of the TOKEN regex
    #[arg(long, alias = "add_after", value_name = "TOKEN,TEXT")]
    pub add_after: Option<String>,

    /// Insert TEXT before every match of the TOKEN regex
    #[arg(long, alias = "add_before", value_name = "TOKEN,TEXT")]
    pub add_before: Option<String>,

    /// Delete every match of a regex
    #[arg(long, alias = "reg_del", value_name = "REGEX")]
    pub reg_del: Option<String>,

    /// Keep only the first match of a regex (files without a match fail)
    #[arg(long, alias = "reg_del_around", value_name = "REGEX")]
    pub reg_del_around: Option<String>,

    /// Folder mode: the result is the renamed base name without an extension
    #[arg(long, default_value_t = false)]
    pub folder: bool,

    /// Rename the file name only (base name + original extension)
    #[arg(long, default_value_t = false)]
    pub file: bool,
}

impl RenameArgs {
    /// 构建变换配置（参数格式错误是致命错误）
    pub fn transform_config(&self) -> Result<TransformConfig> {
        let target = if self.folder {
            TargetMode::FolderOnly
        } else if self.file {
            TargetMode::FileOnly
        } else {
            TargetMode::FullName
        };

        Ok(TransformConfig {
            del_first: self.del_first,
            del_last: self.del_last,
            prefix: self.add_first.clone().unwrap_or_default(),
            suffix: self.add_last.clone().unwrap_or_default(),
            number_first: self.add_number_first,
            number_last: self.add_number_last,
            number_width: self.number_width,
            replace: self.replace.as_deref().map(parse_replace).transpose()?,
            del_after: self.del_after.clone(),
            del_before: self.del_before.clone(),
            insert_after: self
                .add_after
                .as_deref()
                .map(|v| parse_token_pair("--add-after", v))
                .transpose()?,
            insert_before: self
                .add_before
                .as_deref()
                .map(|v| parse_token_pair("--add-before", v))
                .transpose()?,
            delete_regex: self.reg_del.clone(),
            keep_only_regex: self.reg_del_around.clone(),
            target,
        })
    }
}

/// 解析替换参数：`FROM TO`、`FROM->TO`，或仅 `FROM`（删除匹配）
pub fn parse_replace(input: &str) -> Result<(String, String)> {
    let arrow = input
        .split_once("->")
        .map(|(from, to)| (from.trim(), to.trim()))
        .filter(|(from, _)| !from.contains(char::is_whitespace));

    // `FROM TO` 优先；只有 FROM 部分不含空白时才按 `FROM->TO` 解析
    let (from, to) = if let Some((from, to)) = arrow {
        (from, to)
    } else if let Some((from, to)) = input.trim().split_once(char::is_whitespace) {
        (from, to.trim_start())
    } else {
        (input.trim(), "")
    };

    if from.is_empty() {
        return Err(RenkitError::InvalidArgument(format!(
            "--replace expects \"FROM TO\", got '{}'",
            input
        )));
    }

    Ok((from.to_string(), to.to_string()))
}

/// 解析 `TOKEN,TEXT` 形式的参数
pub fn parse_token_pair(option: &str, input: &str) -> Result<(String, String)> {
    match input.split_once(',') {
        Some((token, text)) if !token.is_empty() => Ok((token.to_string(), text.to_string())),
        _ => Err(RenkitError::InvalidArgument(format!(
            "{} expects \"TOKEN,TEXT\", got '{}'",
            option, input
        ))),
    }
}
