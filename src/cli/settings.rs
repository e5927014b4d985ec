//! # settings 子命令 CLI 定义
//!
//! 查看、重置与修改持久化的会话选项文件。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/settings.rs`

use crate::cli::profile::{LineMode, Scaling};
use crate::models::settings::SETTINGS_FILE_NAME;
use crate::utils::parse::parse_line_width;

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// settings 主命令参数
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Options file
    #[arg(long, global = true, default_value = SETTINGS_FILE_NAME)]
    pub options: PathBuf,

    #[command(subcommand)]
    pub command: SettingsCommands,
}

/// settings 子命令
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the current options
    Show,

    /// Restore the default options
    Reset,

    /// Change one or more options
    Set(SetArgs),
}

/// settings set 参数
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Default image file
    #[arg(long)]
    pub image: Option<String>,

    /// Intensity scaling
    #[arg(long, value_enum)]
    pub scaling: Option<Scaling>,

    /// Line constraint
    #[arg(long, value_enum)]
    pub line: Option<LineMode>,

    /// Perpendicular averaging width in pixels, 1-1000
    #[arg(long, value_parser = parse_line_width)]
    pub width: Option<usize>,
}

impl SetArgs {
    /// 是否未给出任何修改
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.scaling.is_none() && self.line.is_none() && self.width.is_none()
    }
}
