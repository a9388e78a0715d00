#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// 从报告 HTML 中取出嵌入的运行日志
pub fn read_report_log(report: &Path) -> serde_json::Value {
    let html = fs::read_to_string(report).unwrap();
    let marker = "var logEntry = ";
    let start = html.find(marker).expect("log marker missing") + marker.len();
    let end = start + html[start..].find("\n</script>").expect("script end missing");
    let json = html[start..end].trim().trim_end_matches(';');
    serde_json::from_str(json).unwrap()
}

/// 列出目录下的文件（排序后）
pub fn list_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
