use crate::Result;
use crate::config::ReporterOptions;
use crate::reporter::record::JsonRecord;
use crate::reporter::types::{RunTimer, SpecResult, StatusCounts};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

/// 内置报告模板
const TEMPLATE: &str = include_str!("../../assets/report.html");

/// 模板中唯一的替换点
pub const RESULTS_PLACEHOLDER: &str = "'<Results Replacement>'";

/// 写入报告的完整运行日志
#[derive(Debug, Serialize)]
pub struct ReportLog<'a> {
    pub options: &'a ReporterOptions,
    pub timer: &'a RunTimer,
    pub counts: &'a StatusCounts,
    pub sequence: &'a [SpecResult],
}

/// 报告文件写入器
///
/// 每次写入都输出完整日志并覆盖旧文件，重复调用是幂等的。
#[derive(Debug, Clone)]
pub struct ReportWriter {
    destination: PathBuf,
}

impl ReportWriter {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// 把日志嵌入模板
    ///
    /// `</` 被转义为 `<\/`，防止日志内容提前闭合 `<script>`，结果仍是合法 JSON。
    pub fn render(&self, log: &ReportLog<'_>) -> Result<String> {
        let json = to_pretty_json(log)?.replace("</", "<\\/");
        Ok(TEMPLATE.replacen(RESULTS_PLACEHOLDER, &json, 1))
    }

    /// 覆盖写入报告文件
    pub fn write(&self, log: &ReportLog<'_>) -> Result<()> {
        let html = self.render(log)?;
        fs::write(&self.destination, html)?;
        tracing::debug!(
            "Report written to {} ({} specs)",
            self.destination.display(),
            log.sequence.len()
        );
        Ok(())
    }
}

/// 写入单个 spec 的 JSON 记录，返回文件路径
///
/// 文件名是毫秒时间戳；同一毫秒内的记录会互相覆盖。
pub fn write_json_record(dir: &Path, stamp: i64, record: &JsonRecord) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", stamp));
    fs::write(&path, to_pretty_json(record)?)?;
    Ok(path)
}

/// 4 空格缩进的 JSON
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    // serde_json 只会输出合法 UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartialOptions;
    use crate::reporter::types::SpecStatus;
    use tempfile::TempDir;

    fn options() -> ReporterOptions {
        PartialOptions::with_path("/tmp/out").resolve().unwrap()
    }

    #[test]
    fn test_template_has_single_placeholder() {
        assert_eq!(TEMPLATE.matches(RESULTS_PLACEHOLDER).count(), 1);
    }

    #[test]
    fn test_render_embeds_log() {
        let options = options();
        let timer = RunTimer::default();
        let mut counts = StatusCounts::new();
        counts.insert(SpecStatus::Passed, 1);
        let sequence = vec![SpecResult::new("spec0", "works", "Thing works", SpecStatus::Passed)];

        let writer = ReportWriter::new("/tmp/out/report.html");
        let log = ReportLog {
            options: &options,
            timer: &timer,
            counts: &counts,
            sequence: &sequence,
        };
        let html = writer.render(&log).unwrap();

        assert!(!html.contains(RESULTS_PLACEHOLDER));
        let json = to_pretty_json(&log).unwrap();
        assert!(html.contains(&format!("var logEntry = {};", json)));
        assert!(json.contains("\"fullName\": \"Thing works\""));
    }

    #[test]
    fn test_render_escapes_script_close() {
        let options = options();
        let timer = RunTimer::default();
        let counts = StatusCounts::new();
        let sequence = vec![SpecResult::new(
            "spec0",
            "renders </script>",
            "Html renders </script>",
            SpecStatus::Failed,
        )];

        let html = ReportWriter::new("unused.html")
            .render(&ReportLog {
                options: &options,
                timer: &timer,
                counts: &counts,
                sequence: &sequence,
            })
            .unwrap();

        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains(r#""description": "renders <\/script>""#));
    }

    #[test]
    fn test_write_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let options = options();
        let timer = RunTimer::default();
        let counts = StatusCounts::new();
        let sequence = Vec::new();
        let log = ReportLog {
            options: &options,
            timer: &timer,
            counts: &counts,
            sequence: &sequence,
        };

        let writer = ReportWriter::new(temp_dir.path().join("report.html"));
        writer.write(&log).unwrap();
        let first = fs::read(writer.destination()).unwrap();
        writer.write(&log).unwrap();
        let second = fs::read(writer.destination()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_fails_for_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let options = options();
        let timer = RunTimer::default();
        let counts = StatusCounts::new();
        let writer = ReportWriter::new(temp_dir.path().join("missing").join("report.html"));

        let result = writer.write(&ReportLog {
            options: &options,
            timer: &timer,
            counts: &counts,
            sequence: &[],
        });
        assert!(matches!(result, Err(crate::SpecReportError::IoError(_))));
    }

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let json = to_pretty_json(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(json, "{\n    \"a\": 1\n}");
    }
}
