//! # 坐标几何
//!
//! 原始图像坐标与“中心偏移”坐标之间的变换，以及中心对称线的端点镜像规则。
//! 全部为无状态纯函数。
//!
//! ## 依赖关系
//! - 被 `profile/segment.rs`, `profile/controller.rs` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 图像像素空间中的点，`x` 为列、`y` 为行
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 两坐标均为有限值
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// 欧氏距离
    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// 两点中点
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// 转换为采样器使用的 (row, col) 顺序
    pub fn to_row_col(self) -> (f64, f64) {
        (self.y, self.x)
    }
}

impl std::ops::Neg for Point {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// 原始坐标 → 以 `center` 为原点的偏移坐标
pub fn to_offset(p: Point, center: Point) -> Point {
    Point::new(p.x - center.x, p.y - center.y)
}

/// 偏移坐标 → 原始坐标
pub fn to_original(p: Point, center: Point) -> Point {
    Point::new(p.x + center.x, p.y + center.y)
}

/// 关于 `center` 的点反射：`center` 为 `p` 与结果的中点
pub fn reflect_through_center(p: Point, center: Point) -> Point {
    to_original(-to_offset(p, center), center)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<(Point, Point)> {
        vec![
            (Point::new(20.0, 20.0), Point::new(512.0, 512.0)),
            (Point::new(-3.5, 7.25), Point::new(0.0, 0.0)),
            (Point::new(1023.0, 0.0), Point::new(511.0, 498.0)),
            (Point::new(0.5, 0.25), Point::new(0.75, 1.5)),
        ]
    }

    #[test]
    fn test_offset_round_trip() {
        for (p, c) in samples() {
            assert_eq!(to_original(to_offset(p, c), c), p);
        }
    }

    #[test]
    fn test_reflect_is_involution() {
        for (p, c) in samples() {
            let once = reflect_through_center(p, c);
            assert_eq!(reflect_through_center(once, c), p);
        }
    }

    #[test]
    fn test_center_reflects_to_itself() {
        for (_, c) in samples() {
            assert_eq!(reflect_through_center(c, c), c);
        }
    }

    #[test]
    fn test_reflect_midpoint_is_center() {
        let c = Point::new(512.0, 512.0);
        let p = Point::new(20.0, 20.0);
        let r = reflect_through_center(p, c);
        assert_eq!(r, Point::new(1004.0, 1004.0));
        assert_eq!(p.midpoint(r), c);
    }

    #[test]
    fn test_row_col_swap() {
        assert_eq!(Point::new(3.0, 9.0).to_row_col(), (9.0, 3.0));
    }
}
