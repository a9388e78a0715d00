use crate::Result;
use crate::config::types::PartialOptions;
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    pub const CONFIG_FILE: &'static str = "specreport.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<PartialOptions> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// 解析 TOML 配置内容
    pub fn parse(content: &str) -> Result<PartialOptions> {
        Ok(toml::from_str(content)?)
    }

    /// 查找配置文件
    /// 查找顺序：
    /// 1. 当前目录及父目录
    /// 2. 用户配置目录 ~/.config/specreport/
    pub fn find() -> Option<PathBuf> {
        Self::find_in_ancestors().or_else(Self::find_in_user_dir)
    }

    /// 查找并加载配置文件，找不到时返回空配置
    pub fn find_and_load() -> Result<PartialOptions> {
        match Self::find() {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load_from_path(path)
            }
            None => Ok(PartialOptions::default()),
        }
    }

    fn find_in_ancestors() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    fn find_in_user_dir() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        let config_path = home
            .join(".config")
            .join("specreport")
            .join(Self::CONFIG_FILE);

        config_path.exists().then_some(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpecReportError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_path() {
        let config_content = r#"
path = "reports"
title = "Nightly"
save_json = false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = ConfigLoader::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.path, Some(PathBuf::from("reports")));
        assert_eq!(config.title.as_deref(), Some("Nightly"));
        assert_eq!(config.save_json, Some(false));
        assert_eq!(config.filename, None);
    }

    #[test]
    fn test_parse_accepts_camel_case_keys() {
        let config = ConfigLoader::parse(
            r#"
writeReportEachSpec = false
dependencyMarkers = ["vendor/"]
"#,
        )
        .unwrap();

        assert_eq!(config.write_report_each_spec, Some(false));
        assert_eq!(config.dependency_markers, Some(vec!["vendor/".to_string()]));
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = ConfigLoader::parse("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, SpecReportError::TomlError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigLoader::load_from_path("/definitely/not/here/specreport.toml").unwrap_err();
        assert!(matches!(err, SpecReportError::IoError(_)));
    }
}
