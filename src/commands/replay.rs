//! # replay 命令实现
//!
//! 在无界面环境下回放指针交互：读取事件脚本，逐个送入控制器，
//! 最后导出拖动后的剖面。
//!
//! ## 依赖关系
//! - 使用 `cli/replay.rs` 定义的参数
//! - 使用 `parsers/events.rs` 读取脚本
//! - 使用 `profile/` 的会话与控制器

use crate::cli::replay::ReplayArgs;
use crate::commands::profile::print_session_summary;
use crate::commands::setup;
use crate::error::{ProfilerError, Result};
use crate::parsers::events::parse_event_file;
use crate::profile::controller::{InteractionController, PointerEvent, Transition, ViewTransform};
use crate::profile::plot::ChartRenderer;
use crate::profile::ProfileSession;
use crate::utils::{output, progress};

use tabled::{Table, Tabled};

/// 回放统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayStats {
    pub grabbed: usize,
    pub moved: usize,
    pub released: usize,
    pub ignored: usize,
    pub rejected: usize,
}

impl ReplayStats {
    fn record(&mut self, transition: Transition) {
        match transition {
            Transition::Grabbed(_) => self.grabbed += 1,
            Transition::Moved(_) => self.moved += 1,
            Transition::Released => self.released += 1,
            Transition::Ignored => self.ignored += 1,
        }
    }
}

/// 执行 replay 命令
pub fn execute(args: ReplayArgs) -> Result<()> {
    output::print_header("Pointer Event Replay");

    if !args.epsilon.is_finite() || args.epsilon <= 0.0 {
        return Err(ProfilerError::InvalidArgument(format!(
            "Grab radius must be positive, got {}",
            args.epsilon
        )));
    }

    let mut options = setup::load_options(&args.session)?;
    let input = setup::resolve_input(args.input.as_deref(), &options)?;
    if !input.is_file() {
        return Err(ProfilerError::InvalidArgument(format!(
            "Replay needs a single image file, got '{}'",
            input.display()
        )));
    }
    options.image_file_path = input.display().to_string();
    setup::persist_options(&options, &args.session);

    let events = parse_event_file(&args.events)?;
    output::print_info(&format!(
        "Loaded {} pointer events from '{}'",
        events.len(),
        args.events.display()
    ));

    let image = setup::load_image_with_progress(&input, args.session.pixel_size)?;
    let controller =
        InteractionController::new(ViewTransform::new(args.view_scale, args.view_offset))
            .with_epsilon(args.epsilon);
    let mut session = ProfileSession::new(
        options,
        &image,
        &input,
        args.endpoints.start,
        args.endpoints.end,
        args.session.border_mode(),
    )?
    .with_controller(controller);

    output::print_info(&format!(
        "Grab radius {} px, view scale {}, offset {}",
        session.controller().epsilon(),
        args.view_scale,
        args.view_offset
    ));

    let mut renderer = ChartRenderer::new();
    session.refresh(&mut renderer)?;

    let stats = replay_events(&mut session, &events, &mut renderer, args.verbose)?;
    if let Some(vertex) = session.controller().active_vertex() {
        output::print_warning(&format!("Script ended while dragging the {} point", vertex));
    }
    print_replay_summary(&stats, renderer.redraw_count());
    print_session_summary(&session);

    setup::ensure_dir(&args.output.output_dir)?;
    let exported = session.export_to_dir(&args.output.output_dir)?;
    output::print_export(&input.display().to_string(), &exported.display().to_string());

    if args.output.wants_plot() {
        let target = args.output.chart_target(&session.title());
        let chart = setup::render_chart(&session, &mut renderer, target, &args.output)?;
        output::print_success(&format!("Chart saved to '{}'", chart.display()));
    }

    output::print_done("Replay finished");
    Ok(())
}

/// 逐个处理事件；被拒绝的编辑不改变线段，回放继续
pub fn replay_events(
    session: &mut ProfileSession,
    events: &[PointerEvent],
    renderer: &mut ChartRenderer,
    verbose: bool,
) -> Result<ReplayStats> {
    let pb = progress::create_progress_bar(events.len() as u64, "Replaying");
    let mut stats = ReplayStats::default();

    for (i, event) in events.iter().enumerate() {
        match session.handle_event(event, renderer) {
            Ok(transition) => {
                stats.record(transition);
                if verbose && transition != Transition::Ignored {
                    let detail = match transition {
                        Transition::Moved(vertex) => {
                            format!("{} -> {}", vertex, session.segment().endpoint(vertex))
                        }
                        other => format!("{:?}", other),
                    };
                    pb.suspend(|| {
                        output::print_info(&format!(
                            "#{} {:?} at {}: {}",
                            i + 1,
                            event.kind,
                            event.device,
                            detail
                        ))
                    });
                }
            }
            Err(e) if matches!(e, ProfilerError::InvalidSegment(_)) => {
                stats.rejected += 1;
                pb.suspend(|| output::print_warning(&format!("Event #{} rejected: {}", i + 1, e)));
            }
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(stats)
}

fn print_replay_summary(stats: &ReplayStats, redraws: usize) {
    #[derive(Tabled)]
    struct StatRow {
        #[tabled(rename = "Grabbed")]
        grabbed: usize,
        #[tabled(rename = "Moved")]
        moved: usize,
        #[tabled(rename = "Released")]
        released: usize,
        #[tabled(rename = "Ignored")]
        ignored: usize,
        #[tabled(rename = "Rejected")]
        rejected: usize,
        #[tabled(rename = "Redraws")]
        redraws: usize,
    }

    let rows = [StatRow {
        grabbed: stats.grabbed,
        moved: stats.moved,
        released: stats.released,
        ignored: stats.ignored,
        rejected: stats.rejected,
        redraws,
    }];
    output::print_header("Replay Summary");
    println!("{}", Table::new(&rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageData, SetupOptions};
    use crate::profile::controller::PointerButton;
    use crate::profile::geometry::Point;
    use crate::profile::sampler::BorderMode;
    use std::path::Path;

    fn session() -> ProfileSession {
        let data = (0..40 * 40).map(|i| ((i % 40) + 1) as f64).collect();
        let image = ImageData::new("ramp", 40, 40, data).unwrap();
        let options = SetupOptions {
            use_centered_line: false,
            use_log_data: false,
            profile_line_width: 1,
            ..SetupOptions::default()
        };
        ProfileSession::new(
            options,
            &image,
            Path::new("ramp.csv"),
            Point::new(5.0, 5.0),
            Point::new(30.0, 5.0),
            BorderMode::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_replay_drag() {
        let mut session = session();
        let mut renderer = ChartRenderer::new();
        let events = vec![
            PointerEvent::press(Point::new(6.0, 5.0), Some(Point::new(6.0, 5.0)), PointerButton::Primary),
            PointerEvent::motion(
                Point::new(10.0, 20.0),
                Some(Point::new(10.0, 20.0)),
                Some(PointerButton::Primary),
            ),
            PointerEvent::motion(Point::new(99.0, 99.0), None, Some(PointerButton::Primary)),
            PointerEvent::release(Point::new(10.0, 20.0), PointerButton::Primary),
            PointerEvent::motion(
                Point::new(0.0, 0.0),
                Some(Point::new(0.0, 0.0)),
                Some(PointerButton::Primary),
            ),
        ];

        let stats = replay_events(&mut session, &events, &mut renderer, false).unwrap();
        assert_eq!(
            stats,
            ReplayStats {
                grabbed: 1,
                moved: 1,
                released: 1,
                ignored: 2,
                rejected: 0,
            }
        );
        assert_eq!(session.segment().start(), Point::new(10.0, 20.0));
        assert_eq!(session.segment().end(), Point::new(30.0, 5.0));
        assert_eq!(renderer.redraw_count(), 1);
    }

    #[test]
    fn test_rejected_move_keeps_segment() {
        let mut session = session();
        let mut renderer = ChartRenderer::new();
        let events = vec![
            PointerEvent::press(Point::new(30.0, 5.0), Some(Point::new(30.0, 5.0)), PointerButton::Primary),
            PointerEvent::motion(
                Point::new(31.0, 5.0),
                Some(Point::new(f64::NAN, 5.0)),
                Some(PointerButton::Primary),
            ),
        ];

        let stats = replay_events(&mut session, &events, &mut renderer, false).unwrap();
        assert_eq!(stats.rejected, 1);
        assert_eq!(session.segment().end(), Point::new(30.0, 5.0));
        assert_eq!(renderer.redraw_count(), 0);
    }

    #[test]
    fn test_far_drag_is_skipped() {
        let mut session = session();
        let mut renderer = ChartRenderer::new();
        let before = session.segment().frame();
        let events = vec![
            PointerEvent::press(Point::new(30.0, 5.0), Some(Point::new(30.0, 5.0)), PointerButton::Primary),
            PointerEvent::motion(
                Point::new(31.0, 5.0),
                Some(Point::new(1e12, 1e12)),
                Some(PointerButton::Primary),
            ),
            PointerEvent::motion(
                Point::new(31.0, 5.0),
                Some(Point::new(1e300, 0.0)),
                Some(PointerButton::Primary),
            ),
            PointerEvent::motion(
                Point::new(32.0, 6.0),
                Some(Point::new(32.0, 6.0)),
                Some(PointerButton::Primary),
            ),
        ];

        let stats = replay_events(&mut session, &events, &mut renderer, false).unwrap();
        assert_eq!(stats.rejected, 2);
        assert_eq!(stats.moved, 1);
        assert_eq!(session.segment().start(), before.start);
        assert_eq!(session.segment().end(), Point::new(32.0, 6.0));
    }

    #[test]
    fn test_execute_replays_script() {
        use crate::cli::{Cli, Commands};
        use clap::Parser;
        use std::fs;

        let dir = std::env::temp_dir().join(format!("lineprofiler_replay_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let image = dir.join("ramp.tsv");
        let rows: Vec<String> = (0..20)
            .map(|_| (1..=20).map(|c| c.to_string()).collect::<Vec<_>>().join("\t"))
            .collect();
        fs::write(&image, rows.join("\n")).unwrap();
        let script = dir.join("drag.csv");
        fs::write(
            &script,
            "kind,x,y,xdata,ydata,button\npress,2,2,2,2,1\nmotion,4,10,4,10,1\nrelease,4,10,,,1\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "lineprofiler",
            "replay",
            image.to_str().unwrap(),
            "--events",
            script.to_str().unwrap(),
            "--line",
            "free",
            "--scaling",
            "linear",
            "--start",
            "2,2",
            "--end",
            "15,2",
            "--no-save",
            "--options",
            dir.join("missing.json").to_str().unwrap(),
            "-o",
            dir.to_str().unwrap(),
        ]);
        let Commands::Replay(args) = cli.command else {
            panic!("expected replay");
        };
        execute(args).unwrap();

        let table = fs::read_to_string(dir.join("ramp.txt")).unwrap();
        assert!(table.starts_with("Reciprocal Distance (1/nm)\tIntensity\n"));
        // (4,10) -> (15,2): ceil(hypot(8, 11) + 1) = 15 samples
        assert_eq!(table.lines().count(), 16);
        assert!(!dir.join("missing.json").exists());
        fs::remove_dir_all(&dir).ok();
    }
}
