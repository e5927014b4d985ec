//! # 剖面采样器
//!
//! 沿线段进行双线性插值采样，并在垂直于线段的宽度带内取平均。
//!
//! ## 采样约定
//! - 端点按 (row, col) 顺序给出
//! - 采样点数 `n = ceil(hypot(Δrow, Δcol) + 1)`，首尾端点都包含
//! - 宽度带含 `width` 个点，间隔 1 像素，跨度 `±(width-1)/2`
//! - 零长度线段返回单个样本
//! - 采样点数超过 `MAX_SAMPLES` 的线段被拒绝
//!
//! ## 依赖关系
//! - 被 `profile/segment.rs` 使用
//! - 使用 `models/image.rs` 的 ImageData
//! - 使用 `rayon` 并行计算各样本

use crate::error::{ProfilerError, Result};
use crate::models::settings::validate_line_width;
use crate::models::ImageData;

use rayon::prelude::*;
use std::sync::Arc;

/// 单条剖面的最大采样点数
pub const MAX_SAMPLES: usize = 1_000_000;

/// 越界像素的取值方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderMode {
    /// 越界取常数
    Constant(f64),
    /// 钳制到最近的边缘像素
    Clamp,
    /// 半像素对称反射 (d c b a | a b c d | d c b a)
    Reflect,
}

impl Default for BorderMode {
    fn default() -> Self {
        BorderMode::Constant(0.0)
    }
}

/// 线剖面采样器，持有图像的共享引用
#[derive(Debug, Clone)]
pub struct ProfileSampler {
    image: Arc<ImageData>,
    border: BorderMode,
}

impl ProfileSampler {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self {
            image,
            border: BorderMode::default(),
        }
    }

    pub fn with_border(mut self, border: BorderMode) -> Self {
        self.border = border;
        self
    }

    pub fn border(&self) -> BorderMode {
        self.border
    }

    /// 沿 `src` → `dst` 采样，返回每个样本在宽度带内的平均强度
    pub fn sample(&self, src: (f64, f64), dst: (f64, f64), width: usize) -> Result<Vec<f64>> {
        validate_line_width(width)?;
        if !(src.0.is_finite() && src.1.is_finite() && dst.0.is_finite() && dst.1.is_finite()) {
            return Err(ProfilerError::InvalidSegment(format!(
                "endpoints must be finite, got {:?} -> {:?}",
                src, dst
            )));
        }

        let (src_row, src_col) = src;
        let (dst_row, dst_col) = dst;
        let d_row = dst_row - src_row;
        let d_col = dst_col - src_col;
        let theta = d_row.atan2(d_col);

        let n = sample_count(src, dst).ok_or_else(|| {
            ProfilerError::InvalidSegment(format!(
                "segment {:?} -> {:?} needs more than {} samples",
                src, dst, MAX_SAMPLES
            ))
        })?;
        let half = (width as f64 - 1.0) / 2.0;
        let row_width = half * theta.cos();
        let col_width = half * (-theta).sin();

        let samples = (0..n)
            .into_par_iter()
            .map(|i| {
                let row = linspace_at(src_row, dst_row, n, i);
                let col = linspace_at(src_col, dst_col, n, i);
                let sum: f64 = (0..width)
                    .map(|j| {
                        let r = linspace_at(row - row_width, row + row_width, width, j);
                        let c = linspace_at(col - col_width, col + col_width, width, j);
                        self.bilinear(r, c)
                    })
                    .sum();
                sum / width as f64
            })
            .collect();

        Ok(samples)
    }

    /// 双线性插值
    fn bilinear(&self, row: f64, col: f64) -> f64 {
        let r0 = row.floor();
        let c0 = col.floor();
        let dr = row - r0;
        let dc = col - c0;
        let r0 = r0 as isize;
        let c0 = c0 as isize;

        let r1 = r0.saturating_add(1);
        let c1 = c0.saturating_add(1);

        let p00 = self.pixel(r0, c0);
        let p01 = self.pixel(r0, c1);
        let p10 = self.pixel(r1, c0);
        let p11 = self.pixel(r1, c1);

        let top = p00 * (1.0 - dc) + p01 * dc;
        let bottom = p10 * (1.0 - dc) + p11 * dc;
        top * (1.0 - dr) + bottom * dr
    }

    /// 取像素值，越界按边界模式处理
    fn pixel(&self, row: isize, col: isize) -> f64 {
        if let Some(v) = self.image.get(row, col) {
            return v;
        }
        let rows = self.image.rows();
        let cols = self.image.cols();
        match self.border {
            BorderMode::Constant(c) => c,
            BorderMode::Clamp => {
                let r = row.clamp(0, rows as isize - 1);
                let c = col.clamp(0, cols as isize - 1);
                self.image.get(r, c).unwrap_or(0.0)
            }
            BorderMode::Reflect => {
                let r = reflect_index(row, rows);
                let c = reflect_index(col, cols);
                self.image.get(r, c).unwrap_or(0.0)
            }
        }
    }
}

/// 采样点数（含首尾端点），超过 `MAX_SAMPLES` 时返回 `None`
pub fn sample_count(src: (f64, f64), dst: (f64, f64)) -> Option<usize> {
    let count = ((dst.0 - src.0).hypot(dst.1 - src.1) + 1.0).ceil();
    if count.is_finite() && count <= MAX_SAMPLES as f64 {
        Some(count as usize)
    } else {
        None
    }
}

/// `linspace(a, b, n)` 的第 `i` 个值
fn linspace_at(a: f64, b: f64, n: usize, i: usize) -> f64 {
    if n <= 1 {
        return a;
    }
    a + (b - a) * i as f64 / (n - 1) as f64
}

/// 半像素对称反射索引
fn reflect_index(index: isize, len: usize) -> isize {
    let len = len as isize;
    let period = 2 * len;
    let mut i = index.rem_euclid(period);
    if i >= len {
        i = period - 1 - i;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5x5 图像，像素值 = 列号
    fn column_ramp() -> Arc<ImageData> {
        let data = (0..5).flat_map(|_| (0..5).map(|c| c as f64)).collect();
        Arc::new(ImageData::new("ramp", 5, 5, data).unwrap())
    }

    /// 5x5 图像，像素值 = 行号
    fn row_ramp() -> Arc<ImageData> {
        let data = (0..5).flat_map(|r| (0..5).map(move |_| r as f64)).collect();
        Arc::new(ImageData::new("rows", 5, 5, data).unwrap())
    }

    #[test]
    fn test_sample_count_is_endpoint_inclusive() {
        assert_eq!(sample_count((0.0, 0.0), (0.0, 4.0)), Some(5));
        assert_eq!(sample_count((0.0, 0.0), (3.0, 4.0)), Some(6));
        assert_eq!(sample_count((2.0, 2.0), (2.0, 2.0)), Some(1));
    }

    #[test]
    fn test_sample_count_limit() {
        let last = (MAX_SAMPLES - 1) as f64;
        assert_eq!(sample_count((0.0, 0.0), (0.0, last)), Some(MAX_SAMPLES));
        assert_eq!(sample_count((0.0, 0.0), (0.0, last + 1.0)), None);
        assert_eq!(sample_count((0.0, 0.0), (1e12, 1e12)), None);
        assert_eq!(sample_count((0.0, 0.0), (1e300, 0.0)), None);
        assert_eq!(sample_count((-1e308, 0.0), (1e308, 0.0)), None);
    }

    #[test]
    fn test_far_segment_rejected() {
        let sampler = ProfileSampler::new(column_ramp());
        let err = sampler.sample((0.0, 0.0), (1e12, 1e12), 1).unwrap_err();
        assert!(matches!(err, ProfilerError::InvalidSegment(_)));
        assert!(sampler.sample((0.0, 0.0), (1e300, 0.0), 3).is_err());
    }

    #[test]
    fn test_far_point_uses_border() {
        let zero = ProfileSampler::new(column_ramp());
        let profile = zero.sample((1e19, 1e19), (1e19, 1e19), 1).unwrap();
        assert_eq!(profile, vec![0.0]);

        let clamp = ProfileSampler::new(column_ramp()).with_border(BorderMode::Clamp);
        let profile = clamp.sample((1e19, 1e19), (1e19, 1e19), 3).unwrap();
        assert_eq!(profile, vec![4.0]);

        let reflect = ProfileSampler::new(column_ramp()).with_border(BorderMode::Reflect);
        let profile = reflect.sample((-1e19, -1e19), (-1e19, -1e19), 1).unwrap();
        assert_eq!(profile.len(), 1);
        assert!(profile[0].is_finite());
    }

    #[test]
    fn test_horizontal_line_follows_ramp() {
        let sampler = ProfileSampler::new(column_ramp());
        let profile = sampler.sample((1.0, 0.0), (1.0, 4.0), 1).unwrap();
        assert_eq!(profile, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_bilinear_between_pixels() {
        let sampler = ProfileSampler::new(column_ramp());
        let profile = sampler.sample((1.0, 0.5), (1.0, 2.5), 1).unwrap();
        assert_eq!(profile, vec![0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_width_averages_perpendicular_band() {
        let sampler = ProfileSampler::new(row_ramp());
        let profile = sampler.sample((2.0, 0.0), (2.0, 4.0), 3).unwrap();
        assert_eq!(profile.len(), 5);
        for v in profile {
            assert!((v - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_degenerate_segment_returns_single_sample() {
        let sampler = ProfileSampler::new(column_ramp());
        let profile = sampler.sample((3.0, 2.0), (3.0, 2.0), 1).unwrap();
        assert_eq!(profile, vec![2.0]);
    }

    #[test]
    fn test_out_of_bounds_uses_border() {
        let zero = ProfileSampler::new(column_ramp());
        let profile = zero.sample((1.0, 4.0), (1.0, 6.0), 1).unwrap();
        assert_eq!(profile, vec![4.0, 0.0, 0.0]);

        let clamp = ProfileSampler::new(column_ramp()).with_border(BorderMode::Clamp);
        let profile = clamp.sample((1.0, 4.0), (1.0, 6.0), 1).unwrap();
        assert_eq!(profile, vec![4.0, 4.0, 4.0]);

        let constant = ProfileSampler::new(column_ramp()).with_border(BorderMode::Constant(-1.0));
        let profile = constant.sample((1.0, 5.0), (1.0, 5.0), 1).unwrap();
        assert_eq!(profile, vec![-1.0]);
    }

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 5), 0);
        assert_eq!(reflect_index(-2, 5), 1);
        assert_eq!(reflect_index(5, 5), 4);
        assert_eq!(reflect_index(6, 5), 3);
        assert_eq!(reflect_index(2, 5), 2);
    }

    #[test]
    fn test_invalid_width_rejected() {
        let sampler = ProfileSampler::new(column_ramp());
        let err = sampler.sample((0.0, 0.0), (0.0, 4.0), 0).unwrap_err();
        assert!(matches!(err, ProfilerError::InvalidConfiguration(_)));
        assert!(sampler.sample((0.0, 0.0), (0.0, 4.0), 1001).is_err());
    }

    #[test]
    fn test_non_finite_endpoint_rejected() {
        let sampler = ProfileSampler::new(column_ramp());
        let err = sampler
            .sample((0.0, f64::NAN), (0.0, 4.0), 1)
            .unwrap_err();
        assert!(matches!(err, ProfilerError::InvalidSegment(_)));
    }
}
