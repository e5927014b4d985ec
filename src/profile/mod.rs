//! # 交互式线剖面引擎
//!
//! 在二维衍射图/显微图上沿可拖动线段提取一维强度剖面。
//!
//! ## 子模块
//! - `geometry`: 坐标变换与中心镜像
//! - `sampler`: 双线性宽度平均采样
//! - `segment`: 线段模型（端点、居中约束、剖面与距离轴）
//! - `controller`: 指针事件状态机
//! - `export`: 两列文本表导出
//! - `plot`: 渲染协作方与 `plotters` 图表
//! - `session`: 会话上下文
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/` 的 ImageData, SetupOptions

pub mod controller;
pub mod export;
pub mod geometry;
pub mod plot;
pub mod sampler;
pub mod segment;
pub mod session;

pub use session::ProfileSession;
