use crate::reporter::types::{SpecResult, SpecStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const PASSED_MESSAGE: &str = "Passed";
const PENDING_MESSAGE: &str = "Pending";
const FAILED_MESSAGE: &str = "Failed";
const NO_TRACE_MESSAGE: &str = "No Stack trace information";

/// 驱动测试的自动化客户端信息（例如浏览器会话）
///
/// 由调用方注入，缺失时 JSON 记录里直接省略相关字段。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl DriverContext {
    pub fn is_empty(&self) -> bool {
        self.platform_name.is_none()
            && self.browser_name.is_none()
            && self.browser_version.is_none()
            && self.session_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// 单条文本或每个断言一条
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordText {
    Single(String),
    Many(Vec<Option<String>>),
}

impl RecordText {
    fn single(text: &str) -> Self {
        RecordText::Single(text.to_string())
    }
}

/// 每个 spec 一份的扁平 JSON 记录
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRecord {
    /// `<prefix>|<description>`
    pub description: String,
    pub passed: bool,
    pub pending: bool,

    /// 当前进程 ID
    pub instance_id: u32,

    /// spec 开始时间 (毫秒时间戳)
    pub timestamp: Option<i64>,
    pub duration: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<BrowserInfo>,

    pub message: RecordText,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<RecordText>,
}

impl JsonRecord {
    pub fn build(
        spec: &SpecResult,
        started: Option<DateTime<Utc>>,
        driver: Option<&DriverContext>,
    ) -> Self {
        let passed = spec.status == SpecStatus::Passed;
        let pending = spec.status.is_pending();
        let (message, trace) = if passed {
            Self::passed_text(spec)
        } else if pending {
            Self::pending_text(spec)
        } else {
            Self::failed_text(spec)
        };

        JsonRecord {
            description: format!(
                "{}|{}",
                spec.prefix.as_deref().unwrap_or_default(),
                spec.description
            ),
            passed,
            pending,
            instance_id: std::process::id(),
            timestamp: started.map(|t| t.timestamp_millis()),
            duration: spec.duration,
            os: driver.and_then(|d| d.platform_name.clone()),
            session_id: driver.and_then(|d| d.session_id.clone()),
            browser: driver.map(|d| BrowserInfo {
                name: d.browser_name.clone(),
                version: d.browser_version.clone(),
            }),
            message,
            trace,
        }
    }

    fn passed_text(spec: &SpecResult) -> (RecordText, Option<RecordText>) {
        let first = spec.passed_expectations.first();
        let message = first
            .and_then(|e| e.message.as_deref())
            .filter(|m| !m.is_empty())
            .unwrap_or(PASSED_MESSAGE);
        let trace = first.and_then(|e| e.stack.as_deref()).map(RecordText::single);
        (RecordText::single(message), trace)
    }

    fn pending_text(spec: &SpecResult) -> (RecordText, Option<RecordText>) {
        let message = spec
            .pending_reason
            .as_deref()
            .filter(|reason| !reason.is_empty())
            .unwrap_or(PENDING_MESSAGE);
        (RecordText::single(message), None)
    }

    fn failed_text(spec: &SpecResult) -> (RecordText, Option<RecordText>) {
        let failures = &spec.failed_expectations;
        let first = failures.first();

        let message = if first.is_some_and(|e| has_text(e.message.as_deref())) {
            RecordText::Many(failures.iter().map(|e| e.message.clone()).collect())
        } else {
            RecordText::single(FAILED_MESSAGE)
        };

        let trace = if first.is_some_and(|e| has_text(e.stack.as_deref())) {
            RecordText::Many(failures.iter().map(|e| e.stack.clone()).collect())
        } else {
            RecordText::single(NO_TRACE_MESSAGE)
        };

        (message, Some(trace))
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}
