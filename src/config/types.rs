use crate::Result;
use crate::error::SpecReportError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_TITLE: &str = "Pretty HTML Spec Reporter";
pub const DEFAULT_FILENAME: &str = "report";

/// 判定堆栈行属于第三方依赖的子串
pub const DEFAULT_DEPENDENCY_MARKERS: &[&str] = &["node_modules", ".cargo/registry"];

/// 部分配置，所有字段可选
///
/// 来源可以是配置文件、CLI 参数或调用方代码，
/// 多个来源通过 [`PartialOptions::merge`] 叠加后再 [`PartialOptions::resolve`]。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialOptions {
    /// 报告根目录（必填）
    pub path: Option<PathBuf>,

    #[serde(alias = "writeReportEachSpec")]
    pub write_report_each_spec: Option<bool>,

    #[serde(alias = "showSuspectLine")]
    pub show_suspect_line: Option<bool>,

    #[serde(alias = "highlightSuspectLine")]
    pub highlight_suspect_line: Option<bool>,

    pub title: Option<String>,

    /// 报告文件名（不含 .html 后缀）
    pub filename: Option<String>,

    #[serde(alias = "saveJson")]
    pub save_json: Option<bool>,

    #[serde(alias = "dependencyMarkers")]
    pub dependency_markers: Option<Vec<String>>,
}

impl PartialOptions {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// 叠加配置：`over` 中已设置的字段优先
    pub fn merge(self, over: PartialOptions) -> PartialOptions {
        PartialOptions {
            path: over.path.or(self.path),
            write_report_each_spec: over.write_report_each_spec.or(self.write_report_each_spec),
            show_suspect_line: over.show_suspect_line.or(self.show_suspect_line),
            highlight_suspect_line: over.highlight_suspect_line.or(self.highlight_suspect_line),
            title: over.title.or(self.title),
            filename: over.filename.or(self.filename),
            save_json: over.save_json.or(self.save_json),
            dependency_markers: over.dependency_markers.or(self.dependency_markers),
        }
    }

    /// 用默认值补齐，得到最终配置
    ///
    /// 缺少 `path`（或为空）时返回配置错误，此时不会触碰文件系统。
    pub fn resolve(self) -> Result<ReporterOptions> {
        let path = self
            .path
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| SpecReportError::ConfigError("Please provide options.path".into()))?;

        let filename = self.filename.unwrap_or_else(|| DEFAULT_FILENAME.to_string());
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(SpecReportError::ConfigError(format!(
                "Invalid report filename: {:?}",
                filename
            )));
        }

        Ok(ReporterOptions {
            path,
            write_report_each_spec: self.write_report_each_spec.unwrap_or(true),
            show_suspect_line: self.show_suspect_line.unwrap_or(true),
            highlight_suspect_line: self.highlight_suspect_line.unwrap_or(true),
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            filename,
            save_json: self.save_json.unwrap_or(true),
            dependency_markers: self.dependency_markers.unwrap_or_else(|| {
                DEFAULT_DEPENDENCY_MARKERS
                    .iter()
                    .map(|m| m.to_string())
                    .collect()
            }),
            report_path: None,
        })
    }
}

/// 最终配置，会原样写入报告供模板读取
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterOptions {
    pub path: PathBuf,
    pub write_report_each_spec: bool,
    pub show_suspect_line: bool,
    pub highlight_suspect_line: bool,
    pub title: String,
    pub filename: String,
    pub save_json: bool,
    pub dependency_markers: Vec<String>,

    /// 本次运行的目录 `path/Test_<millis>`，构造 reporter 时填入
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}
