use crate::Result;
use crate::clock::ReplayClock;
use crate::error::SpecReportError;
use crate::reporter::Reporter;
use crate::reporter::types::{RunInfo, SpecResult, SuiteResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// 事件流中的一条生命周期事件
///
/// 每行一个 JSON 对象，用 `event` 字段区分类型，
/// 同时接受 jasmine 风格的回调名（如 `specDone`）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    #[serde(alias = "jasmineStarted")]
    RunStarted {
        #[serde(default)]
        info: RunInfo,
    },

    #[serde(alias = "suiteStarted")]
    SuiteStarted { result: SuiteResult },

    #[serde(alias = "specStarted")]
    SpecStarted { result: SpecResult },

    #[serde(alias = "specDone")]
    SpecDone { result: SpecResult },

    #[serde(alias = "suiteDone")]
    SuiteDone { result: SuiteResult },

    #[serde(alias = "jasmineDone")]
    RunDone,
}

/// 事件发生时间：毫秒时间戳或 RFC 3339 字符串
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    Millis(i64),
    Rfc3339(DateTime<Utc>),
}

impl EventTime {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        match self {
            EventTime::Millis(millis) => DateTime::from_timestamp_millis(millis),
            EventTime::Rfc3339(at) => Some(at),
        }
    }
}

/// 事件行上与类型无关的字段
#[derive(Debug, Default, Deserialize)]
struct EventStamp {
    #[serde(default)]
    at: Option<EventTime>,
}

/// 解析后的一行：事件本身和可选的发生时间
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub at: Option<DateTime<Utc>>,
    pub event: LifecycleEvent,
}

/// 把一条事件分发给 reporter
pub fn dispatch<R: Reporter + ?Sized>(reporter: &mut R, event: LifecycleEvent) -> Result<()> {
    match event {
        LifecycleEvent::RunStarted { info } => reporter.on_run_start(&info),
        LifecycleEvent::SuiteStarted { result } => reporter.on_suite_start(&result),
        LifecycleEvent::SpecStarted { result } => reporter.on_spec_start(&result),
        LifecycleEvent::SpecDone { result } => reporter.on_spec_done(result),
        LifecycleEvent::SuiteDone { result } => reporter.on_suite_done(&result),
        LifecycleEvent::RunDone => reporter.on_run_done(),
    }
}

/// 解析单行事件，`line` 从 1 开始，用于错误信息
///
/// 可选的 `at` 字段给出事件发生时间。
pub fn parse_event(text: &str, line: usize) -> Result<TimedEvent> {
    let event_error = |message: String| SpecReportError::EventError { line, message };

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| event_error(e.to_string()))?;
    let stamp = EventStamp::deserialize(&value).map_err(|e| event_error(e.to_string()))?;
    let at = match stamp.at {
        Some(time) => Some(
            time.to_datetime()
                .ok_or_else(|| event_error(format!("timestamp out of range: {:?}", time)))?,
        ),
        None => None,
    };
    let event = LifecycleEvent::deserialize(value).map_err(|e| event_error(e.to_string()))?;

    Ok(TimedEvent { at, event })
}

/// 逐行读取 NDJSON 事件流并驱动 reporter，忽略事件时间
///
/// 空行会被跳过。返回处理的事件数量。
pub fn replay<B: BufRead, R: Reporter + ?Sized>(input: B, reporter: &mut R) -> Result<usize> {
    replay_lines(input, |timed| dispatch(reporter, timed.event))
}

/// 逐行回放，并用事件时间驱动 `clock`
///
/// `clock` 应该是 reporter 构造时使用的同一个时钟。
/// 带 `at` 的事件把时钟固定在该时间，不带的事件使用系统时间。
pub fn replay_with_clock<B: BufRead, R: Reporter + ?Sized>(
    input: B,
    reporter: &mut R,
    clock: &ReplayClock,
) -> Result<usize> {
    replay_lines(input, |timed| {
        match timed.at {
            Some(at) => clock.pin(at),
            None => clock.follow_system(),
        }
        dispatch(reporter, timed.event)
    })
}

fn replay_lines<B, F>(input: B, mut handle: F) -> Result<usize>
where
    B: BufRead,
    F: FnMut(TimedEvent) -> Result<()>,
{
    let mut count = 0;

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        handle(parse_event(&line, index + 1)?)?;
        count += 1;
    }

    tracing::debug!("Replayed {} events", count);
    Ok(count)
}
