//! # 会话准备
//!
//! `profile` 与 `replay` 共用的步骤：读取并覆盖选项、确定输入图像、
//! 带 spinner 读取图像、导出与绘图。
//!
//! ## 依赖关系
//! - 被 `commands/profile.rs`, `commands/replay.rs` 使用
//! - 使用 `models/settings.rs`, `parsers/`, `profile/`

use crate::cli::profile::{OutputOptions, SessionOptions};
use crate::error::{ProfilerError, Result};
use crate::models::{ImageData, SettingsSource, SetupOptions};
use crate::parsers;
use crate::profile::plot::{ChartFormat, ChartRenderer};
use crate::profile::ProfileSession;
use crate::utils::{output, progress};

use std::fs;
use std::path::{Path, PathBuf};

/// 读取选项文件并应用命令行覆盖
pub fn load_options(session: &SessionOptions) -> Result<SetupOptions> {
    let (mut options, source) = SetupOptions::load(&session.options);
    match source {
        SettingsSource::File => {
            output::print_info(&format!("Options loaded from '{}'", session.options.display()))
        }
        SettingsSource::Missing => output::print_info("No options file found, using defaults"),
        SettingsSource::Corrupt(reason) => output::print_warning(&format!(
            "Options file '{}' is unreadable ({}), using defaults",
            session.options.display(),
            reason
        )),
    }

    session.apply(&mut options);
    options.validate()?;
    Ok(options)
}

/// 写回选项文件（`--no-save` 时跳过）
pub fn persist_options(options: &SetupOptions, session: &SessionOptions) {
    if session.no_save {
        return;
    }
    if let Err(e) = options.save(&session.options) {
        output::print_warning(&format!("Could not save options: {}", e));
    }
}

/// 确定输入路径：命令行优先，其次为选项文件中的图像路径
pub fn resolve_input(input: Option<&Path>, options: &SetupOptions) -> Result<PathBuf> {
    let path = match input {
        Some(path) => path.to_path_buf(),
        None => options.image_path().ok_or_else(|| {
            ProfilerError::InvalidArgument(
                "No input image given and none stored in the options file".to_string(),
            )
        })?,
    };

    if !path.exists() {
        return Err(ProfilerError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(path)
}

/// 读取图像，可覆盖像素尺寸
pub fn load_image(path: &Path, pixel_size: Option<f64>) -> Result<ImageData> {
    let image = parsers::parse_image_file(path)?;
    Ok(match pixel_size {
        Some(size) => image.with_pixel_size(size),
        None => image,
    })
}

/// 带 spinner 读取图像
pub fn load_image_with_progress(path: &Path, pixel_size: Option<f64>) -> Result<ImageData> {
    let spinner = progress::create_spinner(&format!("Reading '{}'", path.display()));
    let result = load_image(path, pixel_size);
    spinner.finish_and_clear();

    let image = result?;
    output::print_success(&format!(
        "Loaded {} x {} image '{}' (pixel size {})",
        image.cols(),
        image.rows(),
        image.name,
        image.pixel_size
    ));
    Ok(image)
}

/// 确保输出目录存在
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| ProfilerError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })
}

/// 绘制剖面图，返回图表路径
pub fn render_chart(
    session: &ProfileSession,
    renderer: &mut ChartRenderer,
    target: (PathBuf, ChartFormat),
    out: &OutputOptions,
) -> Result<PathBuf> {
    if renderer.latest().is_none() {
        session.refresh(renderer)?;
    }
    let (path, format) = target;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    renderer.present(
        &path,
        &session.title(),
        session.options().use_log_data,
        format,
        out.plot_width,
        out.plot_height,
    )?;
    Ok(path)
}
