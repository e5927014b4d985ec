//! # 剖面数据导出
//!
//! 将距离轴与强度剖面写成两列、制表符分隔的文本表。
//!
//! ## 格式
//! ```text
//! Reciprocal Distance (1/nm)<TAB>Intensity|Log(Intensity)
//! <distance><TAB><intensity>
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `profile/session.rs`, `commands/` 调用
//! - 使用 `csv` 库写入制表符分隔文件

use crate::error::{ProfilerError, Result};

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 距离列表头
pub const DISTANCE_HEADER: &str = "Reciprocal Distance (1/nm)";
/// 线性强度列表头
pub const INTENSITY_HEADER: &str = "Intensity";
/// 对数强度列表头
pub const LOG_INTENSITY_HEADER: &str = "Log(Intensity)";

/// 导出文件名：图像基名 + `.txt`
pub fn export_file_name(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("profile");
    PathBuf::from(format!("{}.txt", stem))
}

/// 浮点数最短往返形式
///
/// 整数值保留 `.0`；指数带符号且至少两位 (`1e-05`, `1.5e+16`)；
/// 非有限值写作 `nan`, `inf`, `-inf`。
fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

/// 写入任意输出流
pub fn write_table<W: Write>(
    writer: W,
    distance: &[f64],
    profile: &[f64],
    use_log: bool,
) -> std::result::Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    let intensity_header = if use_log {
        LOG_INTENSITY_HEADER
    } else {
        INTENSITY_HEADER
    };
    wtr.write_record([DISTANCE_HEADER, intensity_header])?;

    for (d, i) in distance.iter().zip(profile.iter()) {
        wtr.write_record([format_value(*d), format_value(*i)])?;
    }

    wtr.flush()?;
    Ok(())
}

/// 导出剖面到文件（已存在则覆盖）
pub fn export(path: &Path, distance: &[f64], profile: &[f64], use_log: bool) -> Result<()> {
    if distance.len() != profile.len() {
        return Err(ProfilerError::InvalidArgument(format!(
            "distance axis has {} values but profile has {}",
            distance.len(),
            profile.len()
        )));
    }

    let file = File::create(path).map_err(|e| ProfilerError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    write_table(file, distance, profile, use_log).map_err(|e| ProfilerError::FileWriteError {
        path: path.display().to_string(),
        source: e.into(),
    })
}
