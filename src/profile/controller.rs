//! # 交互控制器
//!
//! 将指针事件（按下 / 拖动 / 释放 / 离开）翻译为线段端点编辑的状态机。
//!
//! ## 状态
//! - `Idle`：无端点被抓取
//! - `Dragging(i)`：端点 `i` 正在被拖动
//!
//! ## 转移
//! - `Idle` + 主键按下且在绘图区内，且最近端点的设备空间距离 `< epsilon` → `Dragging(i)`
//! - `Dragging(i)` + 带数据坐标的主键拖动 → 移动端点并通知渲染层
//! - `Dragging(i)` + 任意键释放 / 指针离开绘图区 → `Idle`
//! - 其他事件忽略
//!
//! 两端点距离相等时取索引 0。
//!
//! ## 依赖关系
//! - 被 `profile/session.rs` 使用
//! - 使用 `profile/segment.rs` 编辑端点
//! - 使用 `profile/plot.rs` 的 Renderer 通知重绘

use crate::error::Result;
use crate::profile::geometry::Point;
use crate::profile::plot::Renderer;
use crate::profile::segment::{LineSegment, VertexIndex};

use serde::{Deserialize, Serialize};

/// 默认命中容差（设备像素）
pub const DEFAULT_EPSILON: f64 = 10.0;

/// 指针事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEventKind {
    Press,
    Motion,
    Release,
    /// 指针离开绘图区
    Leave,
}

/// 指针按键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

impl PointerButton {
    /// 1 = 主键, 2 = 中键, 3 = 副键
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => PointerButton::Primary,
            2 => PointerButton::Middle,
            3 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }
}

/// 与界面工具包无关的指针事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// 设备空间位置
    pub device: Point,
    /// 数据空间位置；None 表示指针不在绘图区内
    pub data: Option<Point>,
    pub button: Option<PointerButton>,
}

impl PointerEvent {
    pub fn press(device: Point, data: Option<Point>, button: PointerButton) -> Self {
        Self {
            kind: PointerEventKind::Press,
            device,
            data,
            button: Some(button),
        }
    }

    pub fn motion(device: Point, data: Option<Point>, button: Option<PointerButton>) -> Self {
        Self {
            kind: PointerEventKind::Motion,
            device,
            data,
            button,
        }
    }

    pub fn release(device: Point, button: PointerButton) -> Self {
        Self {
            kind: PointerEventKind::Release,
            device,
            data: None,
            button: Some(button),
        }
    }

    pub fn leave(device: Point) -> Self {
        Self {
            kind: PointerEventKind::Leave,
            device,
            data: None,
            button: None,
        }
    }

    fn is_primary(&self) -> bool {
        self.button == Some(PointerButton::Primary)
    }
}

/// 数据坐标 → 设备坐标
pub trait ScreenTransform {
    fn to_device(&self, p: Point) -> Point;
}

/// 轴对齐仿射变换 `device = data * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: Point,
    pub offset: Point,
}

impl ViewTransform {
    pub fn new(scale: Point, offset: Point) -> Self {
        Self { scale, offset }
    }

    pub fn identity() -> Self {
        Self::new(Point::new(1.0, 1.0), Point::new(0.0, 0.0))
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ScreenTransform for ViewTransform {
    fn to_device(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale.x + self.offset.x,
            p.y * self.scale.y + self.offset.y,
        )
    }
}

/// 控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging(VertexIndex),
}

/// 一次事件处理的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 状态未变且模型未修改
    Ignored,
    /// 抓取端点
    Grabbed(VertexIndex),
    /// 端点已移动并重绘
    Moved(VertexIndex),
    /// 释放端点
    Released,
}

/// 指针交互状态机
#[derive(Debug, Clone)]
pub struct InteractionController<T: ScreenTransform = ViewTransform> {
    transform: T,
    epsilon: f64,
    state: DragState,
}

impl<T: ScreenTransform> InteractionController<T> {
    pub fn new(transform: T) -> Self {
        Self {
            transform,
            epsilon: DEFAULT_EPSILON,
            state: DragState::Idle,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// 当前被抓取的端点
    pub fn active_vertex(&self) -> Option<VertexIndex> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging(i) => Some(i),
        }
    }

    /// 命中测试：返回设备空间距离 `< epsilon` 的最近端点，距离相等取索引 0
    pub fn vertex_under(&self, segment: &LineSegment, device: Point) -> Option<VertexIndex> {
        let d_start = self.transform.to_device(segment.start()).distance_to(device);
        let d_end = self.transform.to_device(segment.end()).distance_to(device);

        let (index, distance) = if d_end < d_start {
            (VertexIndex::End, d_end)
        } else {
            (VertexIndex::Start, d_start)
        };

        if distance < self.epsilon {
            Some(index)
        } else {
            None
        }
    }

    /// 处理单个事件
    pub fn handle_event<R: Renderer + ?Sized>(
        &mut self,
        segment: &mut LineSegment,
        event: &PointerEvent,
        renderer: &mut R,
    ) -> Result<Transition> {
        match (self.state, event.kind) {
            (DragState::Idle, PointerEventKind::Press) => {
                if event.data.is_none() || !event.is_primary() {
                    return Ok(Transition::Ignored);
                }
                match self.vertex_under(segment, event.device) {
                    Some(index) => {
                        self.state = DragState::Dragging(index);
                        Ok(Transition::Grabbed(index))
                    }
                    None => Ok(Transition::Ignored),
                }
            }
            (DragState::Dragging(index), PointerEventKind::Motion) => {
                let target = match event.data {
                    Some(p) if event.is_primary() => p,
                    _ => return Ok(Transition::Ignored),
                };
                segment.move_endpoint(index, target)?;
                renderer.redraw(segment.frame())?;
                Ok(Transition::Moved(index))
            }
            (DragState::Dragging(_), PointerEventKind::Release)
            | (DragState::Dragging(_), PointerEventKind::Leave) => {
                self.state = DragState::Idle;
                Ok(Transition::Released)
            }
            _ => Ok(Transition::Ignored),
        }
    }
}
