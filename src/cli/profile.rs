//! # profile 子命令 CLI 定义
//!
//! 读取图像、按初始端点建立线段并导出剖面。
//! 输入为目录时进入批量模式。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用，共享参数组被 `cli/replay.rs` 复用
//! - 参数传递给 `commands/profile.rs`

use crate::models::settings::{SetupOptions, SETTINGS_FILE_NAME};
use crate::profile::geometry::Point;
use crate::profile::plot::ChartFormat;
use crate::profile::sampler::BorderMode;
use crate::profile::session::{DEFAULT_END, DEFAULT_START};
use crate::utils::parse::{parse_line_width, parse_point, parse_positive};

use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────
// 选项枚举
// ─────────────────────────────────────────────────────────────

/// 强度标度
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Scaling {
    /// Logarithmic intensity (log10)
    Log,
    /// Linear intensity
    Linear,
}

/// 线段约束
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LineMode {
    /// Endpoints mirror each other through the pattern centre
    Centered,
    /// Endpoints move independently
    Free,
}

/// 越界采样策略
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum Border {
    /// Use a constant fill value outside the image
    #[default]
    Constant,
    /// Clamp to the nearest edge pixel
    Clamp,
    /// Mirror the image at its edges
    Reflect,
}

/// 图表格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PlotFormat {
    /// PNG bitmap
    Png,
    /// SVG vector image
    Svg,
}

impl From<PlotFormat> for ChartFormat {
    fn from(format: PlotFormat) -> Self {
        match format {
            PlotFormat::Png => ChartFormat::Png,
            PlotFormat::Svg => ChartFormat::Svg,
        }
    }
}

impl std::fmt::Display for PlotFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotFormat::Png => write!(f, "png"),
            PlotFormat::Svg => write!(f, "svg"),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// 共享参数组
// ─────────────────────────────────────────────────────────────

/// 会话选项（覆盖持久化的选项文件）
#[derive(Args, Debug, Clone)]
pub struct SessionOptions {
    /// Intensity scaling (default: from the options file)
    #[arg(long, value_enum)]
    pub scaling: Option<Scaling>,

    /// Line constraint (default: from the options file)
    #[arg(long, value_enum)]
    pub line: Option<LineMode>,

    /// Perpendicular averaging width in pixels, 1-1000 (e.g. "3" or "3 px")
    #[arg(long, value_parser = parse_line_width)]
    pub width: Option<usize>,

    /// Physical size of one pixel (distance axis scale)
    #[arg(long, value_parser = parse_positive)]
    pub pixel_size: Option<f64>,

    /// Sampling behaviour outside the image
    #[arg(long, value_enum, default_value = "constant")]
    pub border: Border,

    /// Fill value for `--border constant`
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub fill_value: f64,

    /// Options file to read and update
    #[arg(long, default_value = SETTINGS_FILE_NAME)]
    pub options: PathBuf,

    /// Do not write the updated options back
    #[arg(long, default_value_t = false)]
    pub no_save: bool,
}

impl SessionOptions {
    /// 将命令行覆盖应用到选项
    pub fn apply(&self, options: &mut SetupOptions) {
        if let Some(scaling) = self.scaling {
            options.use_log_data = scaling == Scaling::Log;
        }
        if let Some(line) = self.line {
            options.use_centered_line = line == LineMode::Centered;
        }
        if let Some(width) = self.width {
            options.profile_line_width = width;
        }
    }

    pub fn border_mode(&self) -> BorderMode {
        match self.border {
            Border::Constant => BorderMode::Constant(self.fill_value),
            Border::Clamp => BorderMode::Clamp,
            Border::Reflect => BorderMode::Reflect,
        }
    }
}

/// 初始端点
#[derive(Args, Debug, Clone)]
pub struct EndpointOptions {
    /// Initial start point as "x,y" in image pixels
    #[arg(long, value_parser = parse_point, default_value_t = DEFAULT_START, allow_hyphen_values = true)]
    pub start: Point,

    /// Initial end point as "x,y" (replaced by the mirror of start when centered)
    #[arg(long, value_parser = parse_point, default_value_t = DEFAULT_END, allow_hyphen_values = true)]
    pub end: Point,
}

/// 输出参数
#[derive(Args, Debug, Clone)]
pub struct OutputOptions {
    /// Directory receiving `<image name>.txt`
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Also render the profile chart
    #[arg(long, default_value_t = false)]
    pub plot: bool,

    /// Chart file path (single-file mode; default: `<output-dir>/<image name>.<format>`)
    #[arg(long)]
    pub plot_file: Option<PathBuf>,

    /// Chart format (auto-detected from --plot-file extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<PlotFormat>,

    /// Chart width in pixels
    #[arg(long, default_value_t = 1200)]
    pub plot_width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 800)]
    pub plot_height: u32,
}

impl OutputOptions {
    /// 是否需要绘图
    pub fn wants_plot(&self) -> bool {
        self.plot || self.plot_file.is_some()
    }

    /// 图表路径与格式
    pub fn chart_target(&self, stem: &str) -> (PathBuf, ChartFormat) {
        match &self.plot_file {
            Some(path) => {
                let format = self
                    .format
                    .map(ChartFormat::from)
                    .unwrap_or_else(|| ChartFormat::from_path(path));
                (path.clone(), format)
            }
            None => self.batch_chart_target(&self.output_dir, stem),
        }
    }

    /// 批量模式下的图表路径与格式
    pub fn batch_chart_target(&self, dir: &Path, stem: &str) -> (PathBuf, ChartFormat) {
        let format = self.format.unwrap_or(PlotFormat::Png);
        (dir.join(format!("{}.{}", stem, format)), format.into())
    }
}

// ─────────────────────────────────────────────────────────────
// profile 子命令
// ─────────────────────────────────────────────────────────────

/// profile 子命令参数
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Input: image file or directory (default: image path from the options file)
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub session: SessionOptions,

    #[command(flatten)]
    pub endpoints: EndpointOptions,

    #[command(flatten)]
    pub output: OutputOptions,

    /// Glob pattern(s) for batch mode, comma separated (default: all readable images)
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
