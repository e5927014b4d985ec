//! # 剖面渲染
//!
//! 渲染协作方的接口，以及使用 `plotters` 生成剖面曲线图的实现。
//!
//! ## 功能
//! - 每次模型更新后接收 `ProfileFrame` 快照（只读）
//! - `ChartRenderer` 保存最新快照并统计重绘次数
//! - 输出 PNG 或 SVG 曲线图
//!
//! ## 依赖关系
//! - 被 `profile/controller.rs`, `profile/session.rs`, `commands/` 使用
//! - 使用 `plotters` 渲染图表

use crate::error::{ProfilerError, Result};
use crate::profile::export::{DISTANCE_HEADER, INTENSITY_HEADER, LOG_INTENSITY_HEADER};
use crate::profile::geometry::Point;

use plotters::prelude::*;
use std::path::Path;

/// 模型更新后交给渲染层的快照
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileFrame {
    pub start: Point,
    pub end: Point,
    pub distance: Vec<f64>,
    pub profile: Vec<f64>,
    /// 距离轴范围
    pub distance_bounds: (f64, f64),
    /// 强度轴范围
    pub intensity_bounds: (f64, f64),
}

/// 渲染协作方
pub trait Renderer {
    /// 模型更新后调用；实现不得修改模型
    fn redraw(&mut self, frame: ProfileFrame) -> Result<()>;
}

/// 图表输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Png,
    Svg,
}

impl ChartFormat {
    /// 根据扩展名推断，默认 PNG
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("svg") => ChartFormat::Svg,
            _ => ChartFormat::Png,
        }
    }
}

/// 保存最新快照的图表渲染器
#[derive(Debug, Default)]
pub struct ChartRenderer {
    latest: Option<ProfileFrame>,
    redraws: usize,
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最新快照
    pub fn latest(&self) -> Option<&ProfileFrame> {
        self.latest.as_ref()
    }

    /// 已接收的重绘次数
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// 将最新快照绘制到文件
    pub fn present(
        &self,
        output_path: &Path,
        title: &str,
        use_log: bool,
        format: ChartFormat,
        width: u32,
        height: u32,
    ) -> Result<()> {
        let frame = self
            .latest
            .as_ref()
            .ok_or_else(|| ProfilerError::Other("No profile to plot yet".to_string()))?;

        match format {
            ChartFormat::Svg => {
                let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
                draw_profile_chart(&root, frame, title, use_log)?;
                root.present()
                    .map_err(|e| ProfilerError::Other(e.to_string()))?;
            }
            ChartFormat::Png => {
                let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
                draw_profile_chart(&root, frame, title, use_log)?;
                root.present()
                    .map_err(|e| ProfilerError::Other(e.to_string()))?;
            }
        }
        Ok(())
    }
}

impl Renderer for ChartRenderer {
    fn redraw(&mut self, frame: ProfileFrame) -> Result<()> {
        self.latest = Some(frame);
        self.redraws += 1;
        Ok(())
    }
}

/// 零宽度范围两侧各扩 0.5，避免坐标轴退化
fn padded(bounds: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = bounds;
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo <= f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

/// 绘制剖面曲线
fn draw_profile_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    frame: &ProfileFrame,
    title: &str,
    use_log: bool,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| ProfilerError::Other(format!("{:?}", e)))?;

    let (x_min, x_max) = padded(frame.distance_bounds);
    let (y_min, y_max) = padded(frame.intensity_bounds);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| ProfilerError::Other(format!("{:?}", e)))?;

    let y_desc = if use_log {
        LOG_INTENSITY_HEADER
    } else {
        INTENSITY_HEADER
    };

    chart
        .configure_mesh()
        .x_desc(DISTANCE_HEADER)
        .y_desc(y_desc)
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| ProfilerError::Other(format!("{:?}", e)))?;

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(LineSeries::new(
            frame
                .distance
                .iter()
                .zip(frame.profile.iter())
                .map(|(x, y)| (*x, *y)),
            line_color.stroke_width(2),
        ))
        .map_err(|e| ProfilerError::Other(format!("{:?}", e)))?;

    let endpoints = format!("{} → {}", frame.start, frame.end);
    chart
        .draw_series(std::iter::once(Text::new(
            endpoints,
            (x_min + (x_max - x_min) * 0.02, y_max - (y_max - y_min) * 0.03),
            ("sans-serif", 14).into_font().color(&BLACK),
        )))
        .map_err(|e| ProfilerError::Other(format!("{:?}", e)))?;

    Ok(())
}
