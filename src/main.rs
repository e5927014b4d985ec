//! # LineProfiler - 衍射图交互式线剖面工具
//!
//! 在二维衍射图上沿可拖动线段提取一维强度剖面并导出为两列文本表。
//!
//! ## 子命令
//! - `profile`  - 提取剖面并导出（目录输入时批量处理）
//! - `replay`   - 回放指针事件脚本后导出
//! - `settings` - 查看/重置/修改持久化选项
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (图像与事件脚本解析器)
//!   │     ├── profile/   (几何、采样、线段、控制器、导出)
//!   │     ├── batch/     (批量处理)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod profile;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
