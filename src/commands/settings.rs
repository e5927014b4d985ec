//! # settings 命令实现
//!
//! 查看、重置与修改持久化的会话选项。
//!
//! ## 依赖关系
//! - 使用 `cli/settings.rs` 定义的参数
//! - 使用 `models/settings.rs` 读写选项文件

use crate::cli::profile::{LineMode, Scaling};
use crate::cli::settings::{SetArgs, SettingsArgs, SettingsCommands};
use crate::error::Result;
use crate::models::{SettingsSource, SetupOptions};
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 执行 settings 命令
pub fn execute(args: SettingsArgs) -> Result<()> {
    match args.command {
        SettingsCommands::Show => show(&args.options),
        SettingsCommands::Reset => reset(&args.options),
        SettingsCommands::Set(set) => update(&args.options, &set),
    }
}

fn show(path: &Path) -> Result<()> {
    let (options, source) = SetupOptions::load(path);
    output::print_header(&format!("Options ({})", path.display()));
    match source {
        SettingsSource::File => {}
        SettingsSource::Missing => output::print_info("File not found, showing defaults"),
        SettingsSource::Corrupt(reason) => {
            output::print_warning(&format!("File is unreadable ({}), showing defaults", reason))
        }
    }
    print_options(&options);
    Ok(())
}

fn reset(path: &Path) -> Result<()> {
    let options = SetupOptions::default();
    options.save(path)?;
    output::print_success(&format!("Options reset in '{}'", path.display()));
    print_options(&options);
    Ok(())
}

fn update(path: &Path, set: &SetArgs) -> Result<()> {
    if set.is_empty() {
        output::print_warning("Nothing to change");
        return show(path);
    }

    let (mut options, source) = SetupOptions::load(path);
    if let SettingsSource::Corrupt(reason) = source {
        output::print_warning(&format!("Replacing unreadable options file ({})", reason));
    }

    apply_set(&mut options, set);
    options.save(path)?;
    output::print_success(&format!("Options saved to '{}'", path.display()));
    print_options(&options);
    Ok(())
}

fn apply_set(options: &mut SetupOptions, set: &SetArgs) {
    if let Some(image) = &set.image {
        options.image_file_path = image.clone();
    }
    if let Some(scaling) = set.scaling {
        options.use_log_data = scaling == Scaling::Log;
    }
    if let Some(line) = set.line {
        options.use_centered_line = line == LineMode::Centered;
    }
    if let Some(width) = set.width {
        options.profile_line_width = width;
    }
}

fn print_options(options: &SetupOptions) {
    #[derive(Tabled)]
    struct OptionRow {
        #[tabled(rename = "Option")]
        name: &'static str,
        #[tabled(rename = "Value")]
        value: String,
    }

    let image = if options.image_file_path.is_empty() {
        "-".to_string()
    } else {
        options.image_file_path.clone()
    };
    let rows = [
        OptionRow {
            name: "imageFilePath",
            value: image,
        },
        OptionRow {
            name: "useCenteredLine",
            value: options.use_centered_line.to_string(),
        },
        OptionRow {
            name: "useLogData",
            value: options.use_log_data.to_string(),
        },
        OptionRow {
            name: "profileLineWidth",
            value: options.profile_line_width.to_string(),
        },
    ];
    println!("{}", Table::new(&rows));
}
