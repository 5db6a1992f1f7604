//! # 重命名规则模块
//!
//! 将命令行配置编译为有序、不可变的规则列表，并对文件基名依次应用。
//!
//! ## 规则顺序（固定，后一步作用于前一步的结果）
//! 1. 删除开头 N 个字符
//! 2. 删除末尾 N 个字符
//! 3. 添加前缀
//! 4. 添加后缀
//! 5. 开头添加序号 `{n}_`
//! 6. 末尾添加序号 `_{n}`
//! 7. 正则替换
//! 8. 删除首个标记之后的内容
//! 9. 删除最后一个标记之前的内容
//! 10. 在每个匹配之后插入文本
//! 11. 在每个匹配之前插入文本
//! 12. 删除所有正则匹配
//! 13. 仅保留首个正则匹配（未匹配则报错）
//!
//! 未配置的规则不会出现在列表中。
//!
//! ## 依赖关系
//! - 被 `rules/transformer.rs`、`commands/` 使用
//! - 使用 `regex` 编译模式

pub mod transformer;

pub use transformer::{SequenceCounter, SequenceSlot, TransformResult, Transformer};

use crate::error::{RenkitError, Result};

use regex::{Captures, NoExpand, Regex};

/// 重命名作用对象
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetMode {
    /// 默认：新基名 + 原扩展名
    #[default]
    FullName,
    /// 仅文件名：新基名 + 原扩展名
    FileOnly,
    /// 仅文件夹：新基名作为目录名，不附加扩展名
    FolderOnly,
}

/// 变换配置（由命令行参数构建，构建后不可变）
#[derive(Debug, Clone, Default)]
pub struct TransformConfig {
    pub del_first: usize,
    pub del_last: usize,
    pub prefix: String,
    pub suffix: String,
    pub number_first: bool,
    pub number_last: bool,
    /// 序号补零宽度，0 表示不补零
    pub number_width: usize,
    /// (模式, 替换文本)
    pub replace: Option<(String, String)>,
    pub del_after: Option<String>,
    pub del_before: Option<String>,
    /// (模式, 插入文本)
    pub insert_after: Option<(String, String)>,
    /// (模式, 插入文本)
    pub insert_before: Option<(String, String)>,
    pub delete_regex: Option<String>,
    pub keep_only_regex: Option<String>,
    pub target: TargetMode,
}

/// 单条重命名规则
#[derive(Debug, Clone)]
pub enum Rule {
    DeleteFirst(usize),
    DeleteLast(usize),
    Prefix(String),
    Suffix(String),
    NumberPrefix { width: usize },
    NumberSuffix { width: usize },
    Replace { pattern: Regex, with: String },
    DeleteAfter(String),
    DeleteBefore(String),
    InsertAfter { pattern: Regex, text: String },
    InsertBefore { pattern: Regex, text: String },
    DeleteRegex(Regex),
    KeepOnly(Regex),
}

impl Rule {
    /// 规则名称（用于日志）
    pub fn label(&self) -> &'static str {
        match self {
            Rule::DeleteFirst(_) => "del-first",
            Rule::DeleteLast(_) => "del-last",
            Rule::Prefix(_) => "add-first",
            Rule::Suffix(_) => "add-last",
            Rule::NumberPrefix { .. } => "add-number-first",
            Rule::NumberSuffix { .. } => "add-number-last",
            Rule::Replace { .. } => "replace",
            Rule::DeleteAfter(_) => "del-after",
            Rule::DeleteBefore(_) => "del-before",
            Rule::InsertAfter { .. } => "add-after",
            Rule::InsertBefore { .. } => "add-before",
            Rule::DeleteRegex(_) => "reg-del",
            Rule::KeepOnly(_) => "reg-del-around",
        }
    }

    /// 是否消耗序号
    pub fn uses_sequence(&self) -> bool {
        matches!(self, Rule::NumberPrefix { .. } | Rule::NumberSuffix { .. })
    }

    /// 对名称应用本规则
    pub fn apply(&self, name: String, slot: &mut SequenceSlot) -> Result<String> {
        let renamed = match self {
            Rule::DeleteFirst(n) => name.chars().skip(*n).collect(),
            Rule::DeleteLast(n) => {
                let keep = name.chars().count().saturating_sub(*n);
                name.chars().take(keep).collect()
            }
            Rule::Prefix(prefix) => format!("{}{}", prefix, name),
            Rule::Suffix(suffix) => format!("{}{}", name, suffix),
            Rule::NumberPrefix { width } => {
                format!("{:0width$}_{}", slot.take(), name, width = *width)
            }
            Rule::NumberSuffix { width } => {
                format!("{}_{:0width$}", name, slot.take(), width = *width)
            }
            Rule::Replace { pattern, with } => {
                pattern.replace_all(&name, NoExpand(with)).into_owned()
            }
            Rule::DeleteAfter(token) => match name.find(token.as_str()) {
                Some(pos) => name[..pos].to_string(),
                None => name,
            },
            Rule::DeleteBefore(token) => match name.rsplit_once(token.as_str()) {
                Some((_, tail)) => tail.to_string(),
                None => name,
            },
            Rule::InsertAfter { pattern, text } => pattern
                .replace_all(&name, |caps: &Captures| format!("{}{}", &caps[0], text))
                .into_owned(),
            Rule::InsertBefore { pattern, text } => pattern
                .replace_all(&name, |caps: &Captures| format!("{}{}", text, &caps[0]))
                .into_owned(),
            Rule::DeleteRegex(pattern) => pattern.replace_all(&name, "").into_owned(),
            Rule::KeepOnly(pattern) => match pattern.find(&name) {
                Some(m) if !m.as_str().is_empty() => m.as_str().to_string(),
                _ => {
                    return Err(RenkitError::NoMatch {
                        pattern: pattern.as_str().to_string(),
                        name,
                    })
                }
            },
        };
        Ok(renamed)
    }
}

/// 有序规则集
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    target: TargetMode,
}

impl RuleSet {
    /// 空规则集：保留原文件名
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从配置编译规则集
    ///
    /// 所有正则在此处一次性编译，语法错误是致命配置错误。
    pub fn from_config(config: &TransformConfig) -> Result<Self> {
        let mut rules = Vec::new();

        if config.del_first > 0 {
            rules.push(Rule::DeleteFirst(config.del_first));
        }
        if config.del_last > 0 {
            rules.push(Rule::DeleteLast(config.del_last));
        }
        if !config.prefix.is_empty() {
            rules.push(Rule::Prefix(config.prefix.clone()));
        }
        if !config.suffix.is_empty() {
            rules.push(Rule::Suffix(config.suffix.clone()));
        }
        if config.number_first {
            rules.push(Rule::NumberPrefix {
                width: config.number_width,
            });
        }
        if config.number_last {
            rules.push(Rule::NumberSuffix {
                width: config.number_width,
            });
        }
        if let Some((from, to)) = non_empty_pair(&config.replace) {
            rules.push(Rule::Replace {
                pattern: compile("--replace", from)?,
                with: to.to_string(),
            });
        }
        if let Some(token) = non_empty(&config.del_after) {
            rules.push(Rule::DeleteAfter(token.to_string()));
        }
        if let Some(token) = non_empty(&config.del_before) {
            rules.push(Rule::DeleteBefore(token.to_string()));
        }
        if let Some((token, text)) = non_empty_pair(&config.insert_after) {
            rules.push(Rule::InsertAfter {
                pattern: compile("--add-after", token)?,
                text: text.to_string(),
            });
        }
        if let Some((token, text)) = non_empty_pair(&config.insert_before) {
            rules.push(Rule::InsertBefore {
                pattern: compile("--add-before", token)?,
                text: text.to_string(),
            });
        }
        if let Some(pattern) = non_empty(&config.delete_regex) {
            rules.push(Rule::DeleteRegex(compile("--reg-del", pattern)?));
        }
        if let Some(pattern) = non_empty(&config.keep_only_regex) {
            rules.push(Rule::KeepOnly(compile("--reg-del-around", pattern)?));
        }

        Ok(Self {
            rules,
            target: config.target,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn target(&self) -> TargetMode {
        self.target
    }

    /// 每个文件消耗的序号个数
    pub fn sequence_uses(&self) -> u64 {
        self.rules.iter().filter(|r| r.uses_sequence()).count() as u64
    }

    /// 依次应用所有规则
    pub fn apply(&self, base_name: &str, slot: &mut SequenceSlot) -> Result<String> {
        self.rules
            .iter()
            .try_fold(base_name.to_string(), |name, rule| rule.apply(name, slot))
    }
}

fn compile(option: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| RenkitError::InvalidRegex {
        option,
        pattern: pattern.to_string(),
        source,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn non_empty_pair(value: &Option<(String, String)>) -> Option<(&str, &str)> {
    value
        .as_ref()
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, text)| (key.as_str(), text.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(config: &TransformConfig, name: &str) -> Result<String> {
        let rules = RuleSet::from_config(config)?;
        let mut slot = SequenceCounter::new().reserve(rules.sequence_uses());
        rules.apply(name, &mut slot)
    }

    #[test]
    fn test_delete_then_prefix() {
        let config = TransformConfig {
            del_first: 2,
            prefix: "X_".into(),
            ..Default::default()
        };
        assert_eq!(run(&config, "report").unwrap(), "X_port");
    }

    #[test]
    fn test_order_matters() {
        // 先加前缀再删除开头会得到不同结果
        let prefix_first = TransformConfig {
            prefix: "X_".into(),
            ..Default::default()
        };
        let renamed = run(&prefix_first, "report").unwrap();
        let config = TransformConfig {
            del_first: 2,
            ..Default::default()
        };
        assert_eq!(run(&config, &renamed).unwrap(), "report");
        assert_ne!(run(&config, &renamed).unwrap(), "X_port");
    }

    #[test]
    fn test_delete_clamps_to_empty() {
        let config = TransformConfig {
            del_first: 10,
            ..Default::default()
        };
        assert_eq!(run(&config, "abc").unwrap(), "");

        let config = TransformConfig {
            del_last: 3,
            ..Default::default()
        };
        assert_eq!(run(&config, "abc").unwrap(), "");
    }

    #[test]
    fn test_delete_counts_characters() {
        let config = TransformConfig {
            del_first: 1,
            del_last: 1,
            ..Default::default()
        };
        assert_eq!(run(&config, "写真の名前").unwrap(), "真の名");
    }

    #[test]
    fn test_suffix_and_numbers() {
        let config = TransformConfig {
            suffix: "_v".into(),
            number_first: true,
            number_last: true,
            ..Default::default()
        };
        let rules = RuleSet::from_config(&config).unwrap();
        assert_eq!(rules.sequence_uses(), 2);

        let counter = SequenceCounter::new();
        let mut slot = counter.reserve(rules.sequence_uses());
        assert_eq!(rules.apply("img", &mut slot).unwrap(), "1_img_v_2");
        let mut slot = counter.reserve(rules.sequence_uses());
        assert_eq!(rules.apply("img", &mut slot).unwrap(), "3_img_v_4");
    }

    #[test]
    fn test_number_width() {
        let config = TransformConfig {
            number_first: true,
            number_width: 3,
            ..Default::default()
        };
        assert_eq!(run(&config, "a").unwrap(), "001_a");
    }

    #[test]
    fn test_replace_all_literal() {
        let config = TransformConfig {
            replace: Some(("neko".into(), "$piyo".into())),
            ..Default::default()
        };
        assert_eq!(run(&config, "neko_neko").unwrap(), "$piyo_$piyo");

        let config = TransformConfig {
            replace: Some((r"\d+".into(), String::new())),
            ..Default::default()
        };
        assert_eq!(run(&config, "a1b22c").unwrap(), "abc");
    }

    #[test]
    fn test_delete_after_first_and_before_last() {
        let config = TransformConfig {
            del_after: Some("-".into()),
            ..Default::default()
        };
        assert_eq!(run(&config, "a-b-c").unwrap(), "a");
        assert_eq!(run(&config, "abc").unwrap(), "abc");

        let config = TransformConfig {
            del_before: Some("-".into()),
            ..Default::default()
        };
        assert_eq!(run(&config, "a-b-c").unwrap(), "c");
        assert_eq!(run(&config, "abc").unwrap(), "abc");
    }

    #[test]
    fn test_delete_after_then_before() {
        let config = TransformConfig {
            del_after: Some("#".into()),
            del_before: Some("_".into()),
            ..Default::default()
        };
        assert_eq!(run(&config, "x_y_z#tail").unwrap(), "z");
    }

    #[test]
    fn test_insert_every_match() {
        let config = TransformConfig {
            insert_after: Some(("a".into(), "+".into())),
            insert_before: Some(("b".into(), "-".into())),
            ..Default::default()
        };
        assert_eq!(run(&config, "abab").unwrap(), "a+-ba+-b");
    }

    #[test]
    fn test_delete_regex_removes_all() {
        let config = TransformConfig {
            delete_regex: Some(r"\s*\(\d+\)".into()),
            ..Default::default()
        };
        assert_eq!(run(&config, "photo (1) copy (2)").unwrap(), "photo copy");
    }

    #[test]
    fn test_keep_only_first_match() {
        let config = TransformConfig {
            keep_only_regex: Some(r"\d{4}-\d{2}-\d{2}".into()),
            ..Default::default()
        };
        assert_eq!(
            run(&config, "IMG 2024-01-05 and 2024-02-01").unwrap(),
            "2024-01-05"
        );

        let err = run(&config, "no date here").unwrap_err();
        assert!(matches!(err, RenkitError::NoMatch { .. }));
    }

    #[test]
    fn test_keep_only_empty_match_is_no_match() {
        let config = TransformConfig {
            keep_only_regex: Some(r"\d*".into()),
            ..Default::default()
        };
        let err = run(&config, "photo").unwrap_err();
        assert!(matches!(err, RenkitError::NoMatch { .. }));
        assert_eq!(run(&config, "42photo").unwrap(), "42");
    }

    #[test]
    fn test_invalid_regex_is_config_error() {
        let config = TransformConfig {
            delete_regex: Some("(unclosed".into()),
            ..Default::default()
        };
        let err = RuleSet::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            RenkitError::InvalidRegex {
                option: "--reg-del",
                ..
            }
        ));
    }

    #[test]
    fn test_unset_options_are_omitted() {
        let config = TransformConfig {
            del_after: Some(String::new()),
            replace: Some((String::new(), "x".into())),
            ..Default::default()
        };
        let rules = RuleSet::from_config(&config).unwrap();
        assert!(rules.is_empty());
        assert_eq!(rules.sequence_uses(), 0);
    }

    #[test]
    fn test_rules_keep_fixed_order() {
        let config = TransformConfig {
            keep_only_regex: Some("x".into()),
            del_first: 1,
            number_last: true,
            prefix: "p".into(),
            ..Default::default()
        };
        let labels: Vec<_> = RuleSet::from_config(&config)
            .unwrap()
            .rules()
            .iter()
            .map(Rule::label)
            .collect();
        assert_eq!(
            labels,
            vec!["del-first", "add-first", "add-number-last", "reg-del-around"]
        );
    }
}
