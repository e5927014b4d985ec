//! # 宽松参数解析
//!
//! 命令行与选项对话框中的文本输入可能夹带单位或括号，
//! 这里只提取其中的数字部分。
//!
//! ## 依赖关系
//! - 被 `cli/` 的 `value_parser` 使用
//! - 使用 `regex` crate

use crate::models::settings::validate_line_width;
use crate::profile::geometry::Point;

use regex::Regex;

const NUMBER: &str = r"[-+]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?";

/// 解析剖面宽度：提取所有数字字符，如 `"3 px"` → 3
pub fn parse_line_width(input: &str) -> Result<usize, String> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(format!("Invalid line width '{}': no digits found", input));
    }
    let width = digits
        .parse::<usize>()
        .map_err(|e| format!("Invalid line width '{}': {}", input, e))?;
    validate_line_width(width).map_err(|e| e.to_string())
}

/// 解析坐标点：接受 `x,y`、`(x, y)`、`x y` 等写法
pub fn parse_point(input: &str) -> Result<Point, String> {
    let re = Regex::new(NUMBER).map_err(|e| e.to_string())?;
    let values = re
        .find_iter(input)
        .map(|m| m.as_str().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| format!("Invalid point '{}': {}", input, e))?;

    match values.as_slice() {
        [x, y] => Ok(Point::new(*x, *y)),
        _ => Err(format!(
            "Invalid point '{}': expected two coordinates like '20,20'",
            input
        )),
    }
}

/// 解析正数标量，如像素尺寸 `"0.0125 nm^-1"`
pub fn parse_positive(input: &str) -> Result<f64, String> {
    let re = Regex::new(NUMBER).map_err(|e| e.to_string())?;
    let value = re
        .find(input)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| format!("Invalid number '{}'", input))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("Value must be positive, got '{}'", input))
    }
}
