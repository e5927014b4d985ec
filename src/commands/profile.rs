//! # profile 命令实现
//!
//! 从衍射图提取线剖面并导出。
//!
//! ## 功能
//! - 单文件：按初始端点建立线段，导出 `<图像名>.txt`，可选绘图
//! - 目录：批量并行处理，跳过已存在的输出
//!
//! ## 依赖关系
//! - 使用 `cli/profile.rs` 定义的参数
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `commands/setup.rs` 的共享步骤

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::profile::{OutputOptions, ProfileArgs};
use crate::commands::setup;
use crate::error::{ProfilerError, Result};
use crate::models::SetupOptions;
use crate::parsers;
use crate::profile::export::export_file_name;
use crate::profile::geometry::Point;
use crate::profile::plot::ChartRenderer;
use crate::profile::sampler::BorderMode;
use crate::profile::ProfileSession;
use crate::utils::output;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::{Table, Tabled};

/// 执行 profile 命令
pub fn execute(args: ProfileArgs) -> Result<()> {
    output::print_header("Line Profile Extraction");

    let mut options = setup::load_options(&args.session)?;
    let input = setup::resolve_input(args.input.as_deref(), &options)?;

    if input.is_dir() {
        setup::persist_options(&options, &args.session);
        return execute_batch(&args, &input, options);
    }

    options.image_file_path = input.display().to_string();
    setup::persist_options(&options, &args.session);
    execute_single_file(&args, &input, options)
}

/// 单文件模式
fn execute_single_file(args: &ProfileArgs, input: &Path, options: SetupOptions) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", input.display()));

    let image = setup::load_image_with_progress(input, args.session.pixel_size)?;
    let session = ProfileSession::new(
        options,
        &image,
        input,
        args.endpoints.start,
        args.endpoints.end,
        args.session.border_mode(),
    )?;

    print_session_summary(&session);

    setup::ensure_dir(&args.output.output_dir)?;
    let exported = session.export_to_dir(&args.output.output_dir)?;
    output::print_export(&input.display().to_string(), &exported.display().to_string());

    if args.output.wants_plot() {
        let mut renderer = ChartRenderer::new();
        let target = args.output.chart_target(&session.title());
        let chart = setup::render_chart(&session, &mut renderer, target, &args.output)?;
        output::print_success(&format!("Chart saved to '{}'", chart.display()));
    }

    output::print_done("Profile exported");
    Ok(())
}

/// 批量处理配置
struct BatchProfileConfig {
    options: SetupOptions,
    start: Point,
    end: Point,
    border: BorderMode,
    pixel_size: Option<f64>,
    output: OutputOptions,
    overwrite: bool,
}

/// 批量处理模式
fn execute_batch(args: &ProfileArgs, input: &Path, options: SetupOptions) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", input.display()));

    let pattern = args
        .pattern
        .clone()
        .unwrap_or_else(parsers::default_image_pattern);
    let files = FileCollector::new(input.to_path_buf())
        .with_pattern(&pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        return Err(ProfilerError::NoFilesFound { pattern });
    }

    output::print_info(&format!("Found {} image files", files.len()));
    setup::ensure_dir(&args.output.output_dir)?;

    let config = Arc::new(BatchProfileConfig {
        options,
        start: args.endpoints.start,
        end: args.endpoints.end,
        border: args.session.border_mode(),
        pixel_size: args.session.pixel_size,
        output: args.output.clone(),
        overwrite: args.overwrite,
    });

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |file| process_batch_file(file, &config))?;

    for path in &result.skipped_files {
        output::print_skip(&format!("{} (output exists, use --overwrite)", path));
    }

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} success, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 批量模式下处理单个文件
fn process_batch_file(file: &PathBuf, config: &BatchProfileConfig) -> ProcessResult {
    let target = config.output.output_dir.join(export_file_name(file));
    if target.exists() && !config.overwrite {
        return ProcessResult::Skipped(file.display().to_string());
    }

    match profile_file(file, &target, config) {
        Ok(()) => ProcessResult::Success(target.display().to_string()),
        Err(e) => ProcessResult::Failed(file.display().to_string(), e.to_string()),
    }
}

fn profile_file(file: &Path, target: &Path, config: &BatchProfileConfig) -> Result<()> {
    let image = setup::load_image(file, config.pixel_size)?;
    let session = ProfileSession::new(
        config.options.clone(),
        &image,
        file,
        config.start,
        config.end,
        config.border,
    )?;
    session.export_to(target)?;

    if config.output.wants_plot() {
        let mut renderer = ChartRenderer::new();
        let chart_target = config
            .output
            .batch_chart_target(&config.output.output_dir, &session.title());
        setup::render_chart(&session, &mut renderer, chart_target, &config.output)?;
    }
    Ok(())
}

/// 打印会话概要表
pub fn print_session_summary(session: &ProfileSession) {
    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "Property")]
        property: &'static str,
        #[tabled(rename = "Value")]
        value: String,
    }

    let segment = session.segment();
    let options = session.options();
    let (_, profile) = segment.current_profile();
    let (d_min, d_max) = segment.distance_bounds();
    let (i_min, i_max) = segment.intensity_bounds();

    let image = session.image();

    let rows = vec![
        SummaryRow {
            property: "Image",
            value: format!("{} x {} px", image.cols(), image.rows()),
        },
        SummaryRow {
            property: "Centre",
            value: session.center().to_string(),
        },
        SummaryRow {
            property: "Start",
            value: segment.start().to_string(),
        },
        SummaryRow {
            property: "End",
            value: segment.end().to_string(),
        },
        SummaryRow {
            property: "Length (px)",
            value: format!("{:.2}", segment.length()),
        },
        SummaryRow {
            property: "Line",
            value: if options.use_centered_line { "centered" } else { "free" }.to_string(),
        },
        SummaryRow {
            property: "Scaling",
            value: if options.use_log_data { "log" } else { "linear" }.to_string(),
        },
        SummaryRow {
            property: "Width (px)",
            value: options.profile_line_width.to_string(),
        },
        SummaryRow {
            property: "Border",
            value: format!("{:?}", segment.sampler().border()),
        },
        SummaryRow {
            property: "Samples",
            value: profile.len().to_string(),
        },
        SummaryRow {
            property: "Distance range",
            value: format!("{:.4} .. {:.4}", d_min, d_max),
        },
        SummaryRow {
            property: "Intensity range",
            value: format!("{:.4} .. {:.4}", i_min, i_max),
        },
    ];

    output::print_header(&format!("Profile of '{}'", session.title()));
    println!("{}", Table::new(&rows));
}
