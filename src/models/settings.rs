//! # 会话选项
//!
//! 启动时收集的固定选项记录，以 JSON 形式在会话之间保存。
//!
//! ## 功能
//! - 默认值：居中线、对数强度、平均宽度 3、空图像路径
//! - 读取失败（文件不存在或损坏）时回退到默认值
//! - 校验平均宽度范围 [1, 1000]
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `profile/session.rs` 使用
//! - 使用 `serde_json` 持久化

use crate::error::{ProfilerError, Result};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 选项文件的固定文件名
pub const SETTINGS_FILE_NAME: &str = "LineProfilerSetupOptions.json";

/// 平均宽度下限
pub const MIN_LINE_WIDTH: usize = 1;
/// 平均宽度上限
pub const MAX_LINE_WIDTH: usize = 1000;

/// 校验剖面平均宽度
pub fn validate_line_width(width: usize) -> Result<usize> {
    if (MIN_LINE_WIDTH..=MAX_LINE_WIDTH).contains(&width) {
        Ok(width)
    } else {
        Err(ProfilerError::InvalidConfiguration(format!(
            "profile line width must be in [{}, {}], got {}",
            MIN_LINE_WIDTH, MAX_LINE_WIDTH, width
        )))
    }
}

/// 选项读取来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// 从文件读取
    File,
    /// 文件不存在，使用默认值
    Missing,
    /// 文件损坏，使用默认值（附原因）
    Corrupt(String),
}

/// 会话选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetupOptions {
    /// 图像文件路径
    pub image_file_path: String,
    /// 将线段中心约束到透射束
    pub use_centered_line: bool,
    /// 使用对数强度
    pub use_log_data: bool,
    /// 垂直方向平均宽度（像素）
    pub profile_line_width: usize,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            image_file_path: String::new(),
            use_centered_line: true,
            use_log_data: true,
            profile_line_width: 3,
        }
    }
}

impl SetupOptions {
    /// 读取选项文件；不存在或损坏时返回默认值
    pub fn load(path: &Path) -> (Self, SettingsSource) {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return (Self::default(), SettingsSource::Missing),
        };

        match serde_json::from_str::<SetupOptions>(&content) {
            Ok(options) => match validate_line_width(options.profile_line_width) {
                Ok(_) => (options, SettingsSource::File),
                Err(e) => (Self::default(), SettingsSource::Corrupt(e.to_string())),
            },
            Err(e) => (Self::default(), SettingsSource::Corrupt(e.to_string())),
        }
    }

    /// 保存选项文件（覆盖）
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ProfilerError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 校验字段
    pub fn validate(&self) -> Result<()> {
        validate_line_width(self.profile_line_width).map(|_| ())
    }

    /// 展开 `~` 后的图像路径；路径为空时返回 None
    pub fn image_path(&self) -> Option<PathBuf> {
        let raw = self.image_file_path.trim();
        if raw.is_empty() {
            return None;
        }
        Some(expand_home(raw))
    }
}

/// 默认选项文件路径（当前工作目录）
pub fn default_settings_path() -> PathBuf {
    PathBuf::from(SETTINGS_FILE_NAME)
}

/// 将开头的 `~` 替换为用户主目录
pub fn expand_home(raw: &str) -> PathBuf {
    let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"));
    match (raw.strip_prefix('~'), home) {
        (Some(rest), Ok(home)) => {
            let rest = rest.trim_start_matches(|c| c == '/' || c == '\\');
            if rest.is_empty() {
                PathBuf::from(home)
            } else {
                Path::new(&home).join(rest)
            }
        }
        _ => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lineprofiler_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults() {
        let options = SetupOptions::default();
        assert!(options.use_centered_line);
        assert!(options.use_log_data);
        assert_eq!(options.profile_line_width, 3);
        assert_eq!(options.image_file_path, "");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let (options, source) = SetupOptions::load(&temp_path("does_not_exist.json"));
        assert_eq!(options, SetupOptions::default());
        assert_eq!(source, SettingsSource::Missing);
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "{ not json").unwrap();
        let (options, source) = SetupOptions::load(&path);
        assert_eq!(options, SetupOptions::default());
        assert!(matches!(source, SettingsSource::Corrupt(_)));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_out_of_range_width_in_file_is_corrupt() {
        let path = temp_path("wide.json");
        fs::write(&path, r#"{"profileLineWidth": 5000}"#).unwrap();
        let (options, source) = SetupOptions::load(&path);
        assert_eq!(options.profile_line_width, 3);
        assert!(matches!(source, SettingsSource::Corrupt(_)));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("saved.json");
        let options = SetupOptions {
            image_file_path: "/data/pattern.tif".to_string(),
            use_centered_line: false,
            use_log_data: false,
            profile_line_width: 7,
        };
        options.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"profileLineWidth\": 7"));
        assert!(content.contains("\"useCenteredLine\": false"));

        let (loaded, source) = SetupOptions::load(&path);
        assert_eq!(loaded, options);
        assert_eq!(source, SettingsSource::File);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_validate_width_bounds() {
        assert!(validate_line_width(0).is_err());
        assert!(validate_line_width(1).is_ok());
        assert!(validate_line_width(1000).is_ok());
        assert!(validate_line_width(1001).is_err());
    }

    #[test]
    fn test_image_path_empty() {
        assert_eq!(SetupOptions::default().image_path(), None);
    }

    #[test]
    fn test_expand_home_plain_path() {
        assert_eq!(expand_home("/tmp/a.tif"), PathBuf::from("/tmp/a.tif"));
    }
}
