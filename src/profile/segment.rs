//! # 可拖动线段模型
//!
//! 持有两个端点、居中标志、对称中心、像素标尺和最近一次计算的剖面。
//! 每次编辑后重新采样，剖面与距离轴总是一起更新；出错时保持调用前状态。
//!
//! ## 依赖关系
//! - 被 `profile/controller.rs`, `profile/session.rs` 使用
//! - 使用 `profile/geometry.rs` 计算镜像端点
//! - 使用 `profile/sampler.rs` 采样

use crate::error::{ProfilerError, Result};
use crate::models::settings::validate_line_width;
use crate::profile::geometry::{reflect_through_center, Point};
use crate::profile::plot::ProfileFrame;
use crate::profile::sampler::ProfileSampler;

/// 端点索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexIndex {
    Start = 0,
    End = 1,
}

impl std::fmt::Display for VertexIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VertexIndex::Start => write!(f, "start"),
            VertexIndex::End => write!(f, "end"),
        }
    }
}

/// 线段的固定参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSettings {
    /// 终点是否约束为起点关于中心的镜像
    pub centered: bool,
    /// 对称中心
    pub center: Point,
    /// 每像素物理单位，仅用于缩放距离轴
    pub pixel_scale: f64,
    /// 垂直平均宽度 [1, 1000]
    pub sample_width: usize,
}

/// 计算距离轴
///
/// 居中时为 `scale * (i - n/2)`，否则为 `scale * i`。
pub fn distance_axis(len: usize, pixel_scale: f64, centered: bool) -> Vec<f64> {
    let half = len as f64 / 2.0;
    (0..len)
        .map(|i| {
            if centered {
                pixel_scale * (i as f64 - half)
            } else {
                pixel_scale * i as f64
            }
        })
        .collect()
}

/// 可拖动的剖面线段
#[derive(Debug, Clone)]
pub struct LineSegment {
    sampler: ProfileSampler,
    start: Point,
    end: Point,
    settings: LineSettings,
    profile: Vec<f64>,
    distance: Vec<f64>,
}

impl LineSegment {
    /// 创建线段并计算初始剖面
    ///
    /// 居中模式下调用方给出的 `end` 被丢弃，改为 `start` 关于中心的镜像。
    pub fn initialize(
        sampler: ProfileSampler,
        start: Point,
        end: Point,
        settings: LineSettings,
    ) -> Result<Self> {
        validate_line_width(settings.sample_width)?;
        if !settings.pixel_scale.is_finite() {
            return Err(ProfilerError::InvalidConfiguration(format!(
                "pixel scale must be finite, got {}",
                settings.pixel_scale
            )));
        }
        if !settings.center.is_finite() {
            return Err(ProfilerError::InvalidConfiguration(format!(
                "center must be finite, got {}",
                settings.center
            )));
        }

        let end = if settings.centered {
            reflect_through_center(start, settings.center)
        } else {
            end
        };

        let mut segment = Self {
            sampler,
            start,
            end,
            settings,
            profile: Vec::new(),
            distance: Vec::new(),
        };
        let (distance, profile) = segment.compute(start, end, settings.sample_width)?;
        segment.distance = distance;
        segment.profile = profile;
        Ok(segment)
    }

    /// 移动端点；居中模式下另一个端点随之镜像
    ///
    /// 越界坐标不会被拒绝，由采样器的边界模式处理；
    /// 采样点数超过 `MAX_SAMPLES` 时返回 `InvalidSegment`，线段保持原状。
    pub fn move_endpoint(&mut self, index: VertexIndex, new_point: Point) -> Result<()> {
        let (start, end) = match index {
            VertexIndex::Start => (new_point, self.partner_of(new_point, self.end)),
            VertexIndex::End => (self.partner_of(new_point, self.start), new_point),
        };

        let (distance, profile) = self.compute(start, end, self.settings.sample_width)?;
        self.start = start;
        self.end = end;
        self.distance = distance;
        self.profile = profile;
        Ok(())
    }

    /// 修改平均宽度并重新采样
    pub fn set_sample_width(&mut self, width: usize) -> Result<()> {
        validate_line_width(width)?;
        let (distance, profile) = self.compute(self.start, self.end, width)?;
        self.settings.sample_width = width;
        self.distance = distance;
        self.profile = profile;
        Ok(())
    }

    /// 当前剖面 `(distance, profile)`
    pub fn current_profile(&self) -> (&[f64], &[f64]) {
        (&self.distance, &self.profile)
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn endpoint(&self, index: VertexIndex) -> Point {
        match index {
            VertexIndex::Start => self.start,
            VertexIndex::End => self.end,
        }
    }

    pub fn settings(&self) -> &LineSettings {
        &self.settings
    }

    pub fn sampler(&self) -> &ProfileSampler {
        &self.sampler
    }

    /// 线段像素长度
    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    /// 距离轴范围：居中时 `±scale*n/2`，否则 `0..scale*n`
    pub fn distance_bounds(&self) -> (f64, f64) {
        let extent = self.settings.pixel_scale * self.profile.len() as f64;
        if self.settings.centered {
            (-extent / 2.0, extent / 2.0)
        } else {
            (0.0, extent)
        }
    }

    /// 强度范围 `min..max`
    pub fn intensity_bounds(&self) -> (f64, f64) {
        let min = self.profile.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self
            .profile
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    }

    /// 供渲染层读取的快照
    pub fn frame(&self) -> ProfileFrame {
        ProfileFrame {
            start: self.start,
            end: self.end,
            distance: self.distance.clone(),
            profile: self.profile.clone(),
            distance_bounds: self.distance_bounds(),
            intensity_bounds: self.intensity_bounds(),
        }
    }

    /// 被移动端点的伙伴：居中时为镜像，否则保持原值
    fn partner_of(&self, moved: Point, current: Point) -> Point {
        if self.settings.centered {
            reflect_through_center(moved, self.settings.center)
        } else {
            current
        }
    }

    /// 计算剖面与距离轴，不修改自身
    fn compute(&self, start: Point, end: Point, width: usize) -> Result<(Vec<f64>, Vec<f64>)> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ProfilerError::InvalidSegment(format!(
                "endpoints must be finite, got {} -> {}",
                start, end
            )));
        }
        let profile = self
            .sampler
            .sample(start.to_row_col(), end.to_row_col(), width)?;
        let distance = distance_axis(profile.len(), self.settings.pixel_scale, self.settings.centered);
        Ok((distance, profile))
    }
}
