//! # 指针事件脚本解析器
//!
//! 读取录制的指针事件序列，用于在无界面环境下回放交互。
//!
//! ## 格式说明
//! ```text
//! kind,x,y,xdata,ydata,button
//! press,120,85,20,20,1
//! motion,130,90,25,24,1
//! motion,900,90,,,1
//! release,130,90,,,1
//! leave,0,0,,,
//! ```
//! - `kind`: press / motion / release / leave
//! - `xdata`/`ydata` 为空：指针不在绘图区
//! - `button`: 1 = 主键, 2 = 中键, 3 = 副键，空 = 无
//! - 以 `#` 开头的行为注释
//!
//! ## 依赖关系
//! - 被 `commands/replay.rs` 使用
//! - 使用 `csv` + `serde` 反序列化

use crate::error::{ProfilerError, Result};
use crate::profile::controller::{PointerButton, PointerEvent, PointerEventKind};
use crate::profile::geometry::Point;

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 脚本中的一行
#[derive(Debug, Clone, Deserialize)]
struct EventRecord {
    kind: PointerEventKind,
    x: f64,
    y: f64,
    xdata: Option<f64>,
    ydata: Option<f64>,
    button: Option<u8>,
}

impl From<EventRecord> for PointerEvent {
    fn from(record: EventRecord) -> Self {
        let data = match (record.xdata, record.ydata) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        };
        PointerEvent {
            kind: record.kind,
            device: Point::new(record.x, record.y),
            data,
            button: record.button.map(PointerButton::from_code),
        }
    }
}

/// 解析事件脚本文件
pub fn parse_event_file(path: &Path) -> Result<Vec<PointerEvent>> {
    let content = fs::read_to_string(path).map_err(|e| ProfilerError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_event_content(&content, &path.display().to_string())
}

/// 从字符串内容解析事件脚本
pub fn parse_event_content(content: &str, name: &str) -> Result<Vec<PointerEvent>> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    reader
        .deserialize::<EventRecord>()
        .map(|record| {
            record
                .map(PointerEvent::from)
                .map_err(|e| ProfilerError::ParseError {
                    format: "event script".to_string(),
                    path: name.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect()
}
