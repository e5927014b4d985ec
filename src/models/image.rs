//! # 图像数据模型
//!
//! 二维强度矩阵（行优先存储）及其物理像素尺寸。
//!
//! ## 功能
//! - 按 (row, col) 索引
//! - 平移到非负并可选取 log10（显示/剖面所用数据）
//! - 定位最大强度像素（透射束中心）
//!
//! ## 依赖关系
//! - 被 `parsers/`、`profile/sampler.rs`、`profile/session.rs` 使用
//! - 使用 `rayon` 并行预处理

use crate::error::{ProfilerError, Result};
use crate::profile::geometry::Point;

use rayon::prelude::*;

/// 二维强度图像
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// 图像名称（不含扩展名）
    pub name: String,
    /// 行数
    rows: usize,
    /// 列数
    cols: usize,
    /// 行优先数据
    data: Vec<f64>,
    /// 每像素物理尺寸（如 1/nm）
    pub pixel_size: f64,
}

impl ImageData {
    /// 从行优先数据创建图像
    pub fn new(name: impl Into<String>, rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(ProfilerError::InvalidArgument(format!(
                "Image must not be empty (got {}x{})",
                rows, cols
            )));
        }
        if data.len() != rows * cols {
            return Err(ProfilerError::InvalidArgument(format!(
                "Image data length {} does not match {}x{}",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self {
            name: name.into(),
            rows,
            cols,
            data,
            pixel_size: 1.0,
        })
    }

    /// 从行向量创建（要求每行等长）
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|r| r.len() != n_cols) {
            return Err(ProfilerError::InvalidArgument(format!(
                "Row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                n_cols
            )));
        }
        Self::new(name, n_rows, n_cols, rows.into_iter().flatten().collect())
    }

    pub fn with_pixel_size(mut self, pixel_size: f64) -> Self {
        self.pixel_size = pixel_size;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// 读取像素；越界返回 None
    pub fn get(&self, row: isize, col: isize) -> Option<f64> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return None;
        }
        Some(self.data[row as usize * self.cols + col as usize])
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// 生成用于显示和剖面的数据
    ///
    /// 先整体加上 `|min|`，再按需取 log10。非正值的对数以图像中最小的有限对数值替代
    /// （若不存在则为 0）。
    pub fn prepared(&self, use_log: bool) -> ImageData {
        let shift = self.min().abs();
        let shifted: Vec<f64> = self.data.par_iter().map(|v| v + shift).collect();

        let data = if use_log {
            let logged: Vec<f64> = shifted
                .par_iter()
                .map(|&v| if v > 0.0 { v.log10() } else { f64::NAN })
                .collect();
            let floor = logged
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .fold(f64::INFINITY, f64::min);
            let floor = if floor.is_finite() { floor } else { 0.0 };
            logged
                .into_par_iter()
                .map(|v| if v.is_finite() { v } else { floor })
                .collect()
        } else {
            shifted
        };

        ImageData {
            name: self.name.clone(),
            rows: self.rows,
            cols: self.cols,
            data,
            pixel_size: self.pixel_size,
        }
    }

    /// 最大值像素 (row, col)，取行优先顺序中的第一个
    pub fn argmax(&self) -> (usize, usize) {
        let mut best = 0;
        for (i, v) in self.data.iter().enumerate() {
            if *v > self.data[best] {
                best = i;
            }
        }
        (best / self.cols, best % self.cols)
    }

    /// 对称中心：最大强度像素，表示为 (x=col, y=row)
    pub fn center_coord(&self) -> Point {
        let (row, col) = self.argmax();
        Point::new(col as f64, row as f64)
    }
}
