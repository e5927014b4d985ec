//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `profile`: 提取剖面并导出（目录输入时批量处理）
//! - `replay`: 回放指针事件脚本后导出
//! - `settings`: 查看/重置/修改持久化选项（嵌套子命令）
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: profile, replay, settings

pub mod profile;
pub mod replay;
pub mod settings;

use clap::{Parser, Subcommand};

/// LineProfiler - 衍射图交互式线剖面工具
#[derive(Parser)]
#[command(name = "lineprofiler")]
#[command(version)]
#[command(about = "Extract intensity line profiles from diffraction patterns", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Extract a line profile and export it as a two-column table
    Profile(profile::ProfileArgs),

    /// Replay a recorded pointer-event script, then export the profile
    Replay(replay::ReplayArgs),

    /// Inspect or edit the persisted setup options
    Settings(settings::SettingsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
