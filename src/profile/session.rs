//! # 剖面会话
//!
//! 显式的会话上下文：持有选项、图像、线段模型与交互控制器，
//! 取代散落在模块级的全局绘图状态。
//!
//! ## 生命周期
//! 1. 由选项与预处理后的图像创建，计算对称中心与初始剖面
//! 2. 指针事件经控制器编辑线段
//! 3. 随时导出当前剖面
//!
//! ## 依赖关系
//! - 被 `commands/profile.rs`, `commands/replay.rs` 使用
//! - 使用 `profile/` 各子模块与 `models/`

use crate::error::Result;
use crate::models::{ImageData, SetupOptions};
use crate::profile::controller::{InteractionController, PointerEvent, Transition, ViewTransform};
use crate::profile::export::{self, export_file_name};
use crate::profile::geometry::Point;
use crate::profile::plot::Renderer;
use crate::profile::sampler::{BorderMode, ProfileSampler};
use crate::profile::segment::{LineSegment, LineSettings};

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 默认初始起点
pub const DEFAULT_START: Point = Point { x: 20.0, y: 20.0 };
/// 默认初始终点（居中模式下被镜像点取代）
pub const DEFAULT_END: Point = Point { x: 1000.0, y: 2000.0 };

/// 一次剖面提取会话
pub struct ProfileSession {
    options: SetupOptions,
    image: Arc<ImageData>,
    source_path: PathBuf,
    segment: LineSegment,
    controller: InteractionController<ViewTransform>,
}

impl ProfileSession {
    /// 创建会话
    ///
    /// `raw` 为原始图像；按选项平移/取对数后作为剖面数据，
    /// 对称中心取最大强度像素，像素标尺取自图像的像素尺寸。
    pub fn new(
        options: SetupOptions,
        raw: &ImageData,
        source_path: &Path,
        start: Point,
        end: Point,
        border: BorderMode,
    ) -> Result<Self> {
        options.validate()?;

        let image = Arc::new(raw.prepared(options.use_log_data));
        let settings = LineSettings {
            centered: options.use_centered_line,
            center: image.center_coord(),
            pixel_scale: image.pixel_size,
            sample_width: options.profile_line_width,
        };
        let sampler = ProfileSampler::new(Arc::clone(&image)).with_border(border);
        let segment = LineSegment::initialize(sampler, start, end, settings)?;

        Ok(Self {
            options,
            image,
            source_path: source_path.to_path_buf(),
            segment,
            controller: InteractionController::new(ViewTransform::identity()),
        })
    }

    /// 替换交互控制器（如设置视图变换或命中容差）
    pub fn with_controller(mut self, controller: InteractionController<ViewTransform>) -> Self {
        self.controller = controller;
        self
    }

    /// 把一个指针事件交给控制器
    pub fn handle_event<R: Renderer + ?Sized>(
        &mut self,
        event: &PointerEvent,
        renderer: &mut R,
    ) -> Result<Transition> {
        self.controller
            .handle_event(&mut self.segment, event, renderer)
    }

    /// 将当前状态推送给渲染层
    pub fn refresh<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<()> {
        renderer.redraw(self.segment.frame())
    }

    /// 导出到 `dir/<图像基名>.txt`，返回写入路径
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.export_file_name());
        self.export_to(&path)?;
        Ok(path)
    }

    /// 导出到指定路径
    pub fn export_to(&self, path: &Path) -> Result<()> {
        let (distance, profile) = self.segment.current_profile();
        export::export(path, distance, profile, self.options.use_log_data)
    }

    pub fn export_file_name(&self) -> PathBuf {
        export_file_name(&self.source_path)
    }

    /// 图表标题：图像基名
    pub fn title(&self) -> String {
        self.source_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.image.name.clone())
    }

    pub fn options(&self) -> &SetupOptions {
        &self.options
    }

    pub fn image(&self) -> &ImageData {
        &self.image
    }

    pub fn segment(&self) -> &LineSegment {
        &self.segment
    }

    pub fn controller(&self) -> &InteractionController<ViewTransform> {
        &self.controller
    }

    pub fn center(&self) -> Point {
        self.segment.settings().center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::controller::PointerButton;
    use crate::profile::plot::ChartRenderer;

    /// 以 (8, 6) 为峰值的 16x16 高斯斑
    fn spot() -> ImageData {
        let mut data = Vec::with_capacity(256);
        for row in 0..16 {
            for col in 0..16 {
                let dx = col as f64 - 8.0;
                let dy = row as f64 - 6.0;
                data.push(1000.0 * (-(dx * dx + dy * dy) / 8.0).exp());
            }
        }
        ImageData::new("spot", 16, 16, data)
            .unwrap()
            .with_pixel_size(0.05)
    }

    fn options(centered: bool, use_log: bool) -> SetupOptions {
        SetupOptions {
            image_file_path: "/data/spot.tif".to_string(),
            use_centered_line: centered,
            use_log_data: use_log,
            profile_line_width: 1,
        }
    }

    #[test]
    fn test_center_is_brightest_pixel() {
        let session = ProfileSession::new(
            options(true, true),
            &spot(),
            Path::new("/data/spot.tif"),
            Point::new(2.0, 2.0),
            Point::new(0.0, 0.0),
            BorderMode::default(),
        )
        .unwrap();
        assert_eq!(session.center(), Point::new(8.0, 6.0));
        assert_eq!(session.segment().end(), Point::new(14.0, 10.0));
        assert_eq!(session.segment().settings().pixel_scale, 0.05);
    }

    #[test]
    fn test_invalid_width_rejected() {
        let mut opts = options(true, true);
        opts.profile_line_width = 0;
        let result = ProfileSession::new(
            opts,
            &spot(),
            Path::new("spot.tif"),
            DEFAULT_START,
            DEFAULT_END,
            BorderMode::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_events_then_export() {
        let mut session = ProfileSession::new(
            options(false, false),
            &spot(),
            Path::new("/data/spot.tif"),
            Point::new(2.0, 6.0),
            Point::new(12.0, 6.0),
            BorderMode::default(),
        )
        .unwrap();
        let mut renderer = ChartRenderer::new();

        let events = [
            PointerEvent::press(Point::new(12.0, 6.0), Some(Point::new(12.0, 6.0)), PointerButton::Primary),
            PointerEvent::motion(
                Point::new(14.0, 6.0),
                Some(Point::new(14.0, 6.0)),
                Some(PointerButton::Primary),
            ),
            PointerEvent::release(Point::new(14.0, 6.0), PointerButton::Primary),
        ];
        for event in &events {
            session.handle_event(event, &mut renderer).unwrap();
        }
        assert_eq!(session.segment().end(), Point::new(14.0, 6.0));
        assert_eq!(renderer.redraw_count(), 1);

        let dir = std::env::temp_dir().join(format!("lineprofiler_session_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = session.export_to_dir(&dir).unwrap();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("spot.txt"));

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Reciprocal Distance (1/nm)\tIntensity"));
        assert_eq!(lines.count(), session.segment().current_profile().1.len());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_title_from_source_path() {
        let session = ProfileSession::new(
            options(true, false),
            &spot(),
            Path::new("/runs/sample_07.csv"),
            DEFAULT_START,
            DEFAULT_END,
            BorderMode::Clamp,
        )
        .unwrap();
        assert_eq!(session.title(), "sample_07");
        assert_eq!(session.export_file_name(), PathBuf::from("sample_07.txt"));
    }
}
