//! # replay 子命令 CLI 定义
//!
//! 把录制的指针事件脚本送入交互控制器，回放拖动后导出剖面。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 复用 `cli/profile.rs` 的共享参数组
//! - 参数传递给 `commands/replay.rs`

use crate::cli::profile::{EndpointOptions, OutputOptions, SessionOptions};
use crate::profile::controller::DEFAULT_EPSILON;
use crate::profile::geometry::Point;
use crate::utils::parse::parse_point;

use clap::Args;
use std::path::PathBuf;

/// replay 子命令参数
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Input image file (default: image path from the options file)
    pub input: Option<PathBuf>,

    /// Pointer-event script (CSV: kind,x,y,xdata,ydata,button)
    #[arg(short, long)]
    pub events: PathBuf,

    /// Grab radius around an endpoint, in device pixels
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Data-to-device scale as "sx,sy"
    #[arg(long, value_parser = parse_point, default_value = "1,1", allow_hyphen_values = true)]
    pub view_scale: Point,

    /// Data-to-device offset as "ox,oy"
    #[arg(long, value_parser = parse_point, default_value = "0,0", allow_hyphen_values = true)]
    pub view_offset: Point,

    /// Print every state transition
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    #[command(flatten)]
    pub session: SessionOptions,

    #[command(flatten)]
    pub endpoints: EndpointOptions,

    #[command(flatten)]
    pub output: OutputOptions,
}
