//! # 数据模型模块
//!
//! 定义图像数据与会话选项模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`profile/` 和 `commands/` 使用
//! - 子模块: image, settings

pub mod image;
pub mod settings;

pub use image::ImageData;
pub use settings::{SettingsSource, SetupOptions};
