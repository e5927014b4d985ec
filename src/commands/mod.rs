//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `profile/`, `utils/`
//! - 子模块: profile, replay, settings, setup

pub mod profile;
pub mod replay;
pub mod settings;
pub mod setup;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Profile(args) => profile::execute(args),
        Commands::Replay(args) => replay::execute(args),
        Commands::Settings(args) => settings::execute(args),
    }
}
