//! # 栅格图像读取
//!
//! 通过 `image` 库读取 PNG/TIFF/JPEG/BMP，转换为 16 位灰度强度。
//! 栅格文件不携带物理像素尺寸，默认为 1，由命令行覆盖。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `image` 解码

use crate::error::{ProfilerError, Result};
use crate::models::ImageData;

use image::io::Reader as ImageReader;
use image::DynamicImage;
use std::path::Path;

/// 支持的栅格扩展名
pub const RASTER_EXTENSIONS: &[&str] = &["png", "tif", "tiff", "jpg", "jpeg", "bmp"];

/// 读取栅格图像
pub fn parse_raster_file(path: &Path) -> Result<ImageData> {
    let reader = ImageReader::open(path).map_err(|e| ProfilerError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let decoded = reader.with_guessed_format().map_err(|e| ProfilerError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let image = decoded.decode()?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    from_dynamic(&image, name)
}

/// 转换为灰度强度矩阵
pub fn from_dynamic(image: &DynamicImage, name: &str) -> Result<ImageData> {
    let luma = image.to_luma16();
    let (width, height) = luma.dimensions();
    let data = luma.pixels().map(|p| p[0] as f64).collect();
    ImageData::new(name, height as usize, width as usize, data)
}
