//! # 解析器模块
//!
//! 图像来源协作方与指针事件脚本的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: matrix, raster, events

pub mod events;
pub mod matrix;
pub mod raster;

use crate::error::{ProfilerError, Result};
use crate::models::ImageData;
use std::path::Path;

/// 支持的数值矩阵扩展名
pub const MATRIX_EXTENSIONS: &[&str] = &["csv", "tsv", "txt", "dat"];

/// 从文件路径推断格式并读取图像
pub fn parse_image_file(path: &Path) -> Result<ImageData> {
    if !path.exists() {
        return Err(ProfilerError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    if MATRIX_EXTENSIONS.contains(&ext.as_str()) {
        matrix::parse_matrix_file(path)
    } else if raster::RASTER_EXTENSIONS.contains(&ext.as_str()) {
        raster::parse_raster_file(path)
    } else {
        Err(ProfilerError::UnsupportedFormat(format!(
            "Cannot read image format of: {} (supported: {}, {})",
            path.display(),
            MATRIX_EXTENSIONS.join(", "),
            raster::RASTER_EXTENSIONS.join(", ")
        )))
    }
}

/// 默认批量匹配模式
pub fn default_image_pattern() -> String {
    MATRIX_EXTENSIONS
        .iter()
        .chain(raster::RASTER_EXTENSIONS.iter())
        .map(|ext| format!("*.{}", ext))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = parse_image_file(Path::new("/no/such/pattern.csv")).unwrap_err();
        assert!(matches!(err, ProfilerError::FileNotFound { .. }));
    }

    #[test]
    fn test_unsupported_format() {
        let path = std::env::temp_dir().join(format!("lineprofiler_{}.dm4", std::process::id()));
        std::fs::write(&path, b"DM").unwrap();
        let err = parse_image_file(&path).unwrap_err();
        assert!(matches!(err, ProfilerError::UnsupportedFormat(_)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_reads_matrix_by_extension() {
        let path = std::env::temp_dir().join(format!("lineprofiler_{}.csv", std::process::id()));
        std::fs::write(&path, "1,2\n3,4\n").unwrap();
        let image = parse_image_file(&path).unwrap();
        assert_eq!(image.max(), 4.0);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_default_pattern() {
        let pattern = default_image_pattern();
        assert!(pattern.starts_with("*.csv,"));
        assert!(pattern.contains("*.tif"));
    }
}
