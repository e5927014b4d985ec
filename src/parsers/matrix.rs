//! # 数值矩阵文本解析器
//!
//! 读取以文本保存的二维强度矩阵。
//!
//! ## 格式说明
//! ```text
//! # pixel_size: 0.0125      # 可选，每像素物理尺寸
//! # 其他以 # 开头的行为注释
//! 0.1  0.2  0.3 ...          # 每行一行像素
//! ```
//! - `.csv`: 逗号分隔
//! - `.tsv`: 制表符分隔
//! - `.txt` / `.dat`: 任意空白分隔
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `csv` 读取分隔文件，`regex` 提取像素尺寸

use crate::error::{ProfilerError, Result};
use crate::models::ImageData;

use regex::Regex;
use std::fs;
use std::path::Path;

/// 列分隔方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
    Whitespace,
}

impl Delimiter {
    /// 根据扩展名选择分隔方式
    pub fn for_extension(ext: &str) -> Self {
        match ext {
            "csv" => Delimiter::Comma,
            "tsv" => Delimiter::Tab,
            _ => Delimiter::Whitespace,
        }
    }
}

/// 解析矩阵文件
pub fn parse_matrix_file(path: &Path) -> Result<ImageData> {
    let content = fs::read_to_string(path).map_err(|e| ProfilerError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    parse_matrix_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
        Delimiter::for_extension(&ext),
    )
}

/// 从字符串内容解析矩阵
pub fn parse_matrix_content(content: &str, name: &str, delimiter: Delimiter) -> Result<ImageData> {
    let pixel_size = parse_pixel_size(content);

    let rows = match delimiter {
        Delimiter::Whitespace => parse_whitespace_rows(content, name)?,
        Delimiter::Comma => parse_delimited_rows(content, name, b',')?,
        Delimiter::Tab => parse_delimited_rows(content, name, b'\t')?,
    };

    if rows.is_empty() {
        return Err(parse_error(name, "No numeric rows found".to_string()));
    }

    let image = ImageData::from_rows(name, rows).map_err(|e| parse_error(name, e.to_string()))?;
    Ok(match pixel_size {
        Some(size) => image.with_pixel_size(size),
        None => image,
    })
}

/// 提取 `# pixel_size: v` 注释
fn parse_pixel_size(content: &str) -> Option<f64> {
    let pattern =
        Regex::new(r"(?im)^\s*#\s*pixel[_ ]?size\s*[:=]\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)")
            .ok()?;
    pattern
        .captures(content)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn parse_whitespace_rows(content: &str, name: &str) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| parse_value(token, name, line_no + 1))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

fn parse_delimited_rows(content: &str, name: &str, delimiter: u8) -> Result<Vec<Vec<f64>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line_no = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let row = record
            .iter()
            .map(|field| parse_value(field, name, line_no))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

fn parse_value(token: &str, name: &str, line_no: usize) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| parse_error(name, format!("Invalid number '{}' at line {}", token, line_no)))
}

fn parse_error(name: &str, reason: String) -> ProfilerError {
    ProfilerError::ParseError {
        format: "matrix".to_string(),
        path: name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whitespace_matrix() {
        let content = r#"# pixel_size: 0.0125
# simulated pattern
1 2 3
4   5	6
"#;
        let image = parse_matrix_content(content, "pattern", Delimiter::Whitespace).unwrap();
        assert_eq!(image.rows(), 2);
        assert_eq!(image.cols(), 3);
        assert_eq!(image.get(1, 2), Some(6.0));
        assert_eq!(image.pixel_size, 0.0125);
        assert_eq!(image.name, "pattern");
    }

    #[test]
    fn test_parse_csv_matrix() {
        let content = "# pixel size = 2e-2\n0.5, 1.5\n2.5, 3.5\n";
        let image = parse_matrix_content(content, "csv", Delimiter::Comma).unwrap();
        assert_eq!(image.rows(), 2);
        assert_eq!(image.get(0, 1), Some(1.5));
        assert_eq!(image.pixel_size, 0.02);
    }

    #[test]
    fn test_default_pixel_size() {
        let image = parse_matrix_content("1\t2\n3\t4\n", "tsv", Delimiter::Tab).unwrap();
        assert_eq!(image.pixel_size, 1.0);
        assert_eq!(image.get(1, 0), Some(3.0));
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        let err = parse_matrix_content("1 2 3\n4 5\n", "ragged", Delimiter::Whitespace).unwrap_err();
        assert!(matches!(err, ProfilerError::ParseError { .. }));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let err = parse_matrix_content("1,x\n", "bad", Delimiter::Comma).unwrap_err();
        assert!(matches!(err, ProfilerError::ParseError { .. }));
    }

    #[test]
    fn test_empty_matrix_rejected() {
        assert!(parse_matrix_content("# only comments\n", "empty", Delimiter::Whitespace).is_err());
    }

    #[test]
    fn test_delimiter_for_extension() {
        assert_eq!(Delimiter::for_extension("csv"), Delimiter::Comma);
        assert_eq!(Delimiter::for_extension("tsv"), Delimiter::Tab);
        assert_eq!(Delimiter::for_extension("txt"), Delimiter::Whitespace);
    }
}
