use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 单个 spec 的最终状态
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecStatus {
    Passed,
    Failed,
    /// 开始事件里通常没有状态，按 pending 处理
    #[default]
    Pending,
    Disabled,
    Excluded,
    /// 运行器给出的其他状态，原样计数，JSON 记录里按失败处理
    #[serde(untagged)]
    Other(String),
}

impl SpecStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SpecStatus::Passed => "passed",
            SpecStatus::Failed => "failed",
            SpecStatus::Pending => "pending",
            SpecStatus::Disabled => "disabled",
            SpecStatus::Excluded => "excluded",
            SpecStatus::Other(status) => status,
        }
    }

    /// pending、disabled、excluded 都视为未执行
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            SpecStatus::Pending | SpecStatus::Disabled | SpecStatus::Excluded
        )
    }
}

impl fmt::Display for SpecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一条断言结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expectation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,

    /// 仅失败断言会被填充
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_suspect_line: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspect_line: Option<String>,
}

impl Expectation {
    pub fn new(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            stack: Some(stack.into()),
            ..Self::default()
        }
    }
}

/// 测试运行器提供的 spec 结果
///
/// `stopped`、`prefix`、`duration` 由 reporter 在 spec 结束时计算。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecResult {
    pub id: String,
    pub description: String,
    pub full_name: String,

    #[serde(default)]
    pub status: SpecStatus,

    #[serde(default)]
    pub failed_expectations: Vec<Expectation>,

    #[serde(default)]
    pub passed_expectations: Vec<Expectation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// 耗时 (毫秒)，没有开始时间时为 null
    #[serde(default)]
    pub duration: Option<i64>,
}

impl SpecResult {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        full_name: impl Into<String>,
        status: SpecStatus,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            full_name: full_name.into(),
            status,
            ..Self::default()
        }
    }
}

/// 测试运行器提供的 suite 结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResult {
    pub id: String,
    pub description: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default)]
    pub failed_expectations: Vec<Expectation>,
}

/// 运行开始时的附加信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_specs_defined: Option<usize>,
}

/// 整体运行的起止时间
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunTimer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<DateTime<Utc>>,
}

/// 按状态统计的数量
pub type StatusCounts = BTreeMap<SpecStatus, usize>;
