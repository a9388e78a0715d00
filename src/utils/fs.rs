use crate::Result;
use std::fs;
use std::path::Path;

/// 目录不存在时创建（包括缺失的父目录）
///
/// 已存在的目录保持原样，reporter 从不删除它创建的目录。
pub fn make_directory_if_needed(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        tracing::debug!("Created directory {}", path.display());
    }
    Ok(())
}
