//! Integration tests for the complete monitoring pipeline.
//! Drives realistic frame sequences through posture evaluation, movement
//! tracking and session aggregation together, including file-backed streams
//! and the paced frame loop.

use std::io::Write;
use std::time::Duration;

use crate::config::MonitorConfig;
use crate::pipeline::*;
use crate::report::OutputFormat;
use crate::runner::{LoopOptions, MonitorLoop, StopReason};
use crate::source::{Frame, LandmarkStream, MemorySource, ReplaySource};
use crate::types::*;

/// Helper: Build a full landmark set from a handful of y positions.
fn pose(x: f32, head_y: f32, shoulder_y: f32, hip_y: f32, ankle_y: f32) -> LandmarkSet {
    LandmarkSet::empty()
        .with(LandmarkId::Nose, Landmark::new(x, head_y))
        .with(LandmarkId::LeftShoulder, Landmark::new(x - 0.06, shoulder_y))
        .with(LandmarkId::RightShoulder, Landmark::new(x + 0.06, shoulder_y))
        .with(LandmarkId::LeftHip, Landmark::new(x - 0.04, hip_y))
        .with(LandmarkId::RightHip, Landmark::new(x + 0.04, hip_y))
        .with(LandmarkId::LeftAnkle, Landmark::new(x - 0.04, ankle_y))
        .with(LandmarkId::RightAnkle, Landmark::new(x + 0.04, ankle_y))
}

/// Helper: Upright subject, drifting sideways with `x`.
fn standing(x: f32) -> LandmarkSet {
    pose(x, 0.15, 0.3, 0.55, 0.9)
}

/// Helper: Collapsed subject, head 0.2 above the ankles, torso still upright.
fn collapsed(x: f32) -> LandmarkSet {
    pose(x, 0.7, 0.72, 0.85, 0.9)
}

/// Helper: Walking profile alternating between two positions.
fn walking_profile(frames: usize) -> Vec<Frame> {
    (0..frames)
        .map(|i| Some(standing(if i % 2 == 0 { 0.4 } else { 0.45 })))
        .collect()
}

fn run_statuses(monitor: &mut FallMonitor, frames: &[Frame]) -> Vec<DisplayStatus> {
    frames
        .iter()
        .map(|f| monitor.process_frame(f.as_ref()).unwrap())
        .collect()
}

#[test]
fn test_standing_then_collapse_scenario() {
    let mut frames: Vec<Frame> = (0..5).map(|_| Some(standing(0.5))).collect();
    frames.extend((0..10).map(|_| Some(collapsed(0.5))));

    let mut monitor = FallMonitor::default();
    let mut alerts_seen = Vec::new();

    for (i, frame) in frames.iter().enumerate() {
        let status = monitor.process_frame(frame.as_ref()).unwrap();
        let frame_no = i + 1;

        if frame_no <= 5 {
            assert_eq!(status.severity, Severity::Normal, "frame {}", frame_no);
        } else {
            assert_eq!(status.severity, Severity::Fall, "frame {}", frame_no);
            assert_eq!(status.headline, FallReason::LowHeightRatio.message());
        }
        alerts_seen.push(monitor.state().total_alerts);
    }

    // One alert per collapsed frame.
    assert_eq!(alerts_seen, vec![0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    assert_eq!(monitor.state().consecutive_fall_frames, 10);

    // The run has to exceed ten frames before escalating.
    let status = monitor.process_frame(Some(&collapsed(0.5))).unwrap();
    assert_eq!(status.severity, Severity::Emergency);
    assert_eq!(status.subline, Some(crate::session::EMERGENCY_SUBLINE));
}

#[test]
fn test_single_normal_frame_ends_emergency() {
    let mut monitor = FallMonitor::default();
    for _ in 0..20 {
        monitor.process_frame(Some(&collapsed(0.5))).unwrap();
    }
    assert_eq!(monitor.state().consecutive_fall_frames, 20);

    let status = monitor.process_frame(Some(&standing(0.5))).unwrap();
    assert_ne!(status.severity, Severity::Emergency);
    assert_eq!(monitor.state().consecutive_fall_frames, 0);
    assert_eq!(monitor.state().total_alerts, 20);
}

#[test]
fn test_still_subject_becomes_stationary() {
    let mut monitor = FallMonitor::default();
    let statuses = run_statuses(&mut monitor, &vec![Some(standing(0.5)); 12]);

    for status in &statuses[..9] {
        assert_eq!(status.severity, Severity::Normal);
        assert_eq!(status.subline, Some(MovementReading::WARMING_UP));
    }
    for status in &statuses[9..] {
        assert_eq!(status.severity, Severity::Stationary);
        assert_eq!(status.headline, MovementReading::MOTIONLESS);
    }
}

#[test]
fn test_walking_subject_stays_normal() {
    let mut monitor = FallMonitor::default();
    let statuses = run_statuses(&mut monitor, &walking_profile(40));

    assert!(statuses.iter().all(|s| s.severity == Severity::Normal));
    assert_eq!(statuses.last().unwrap().subline, Some(MovementReading::MOVING));
    assert_eq!(monitor.state().total_alerts, 0);
}

#[test]
fn test_subject_leaves_and_returns() {
    let mut frames = walking_profile(15);
    frames.extend(std::iter::repeat(None).take(40));
    frames.extend(walking_profile(3));

    let mut monitor = FallMonitor::default();
    let statuses = run_statuses(&mut monitor, &frames);

    let absent = &statuses[15..55];
    assert!(absent[..30].iter().all(|s| s.severity == Severity::AbsentShort));
    assert!(absent[30..].iter().all(|s| s.severity == Severity::AbsentLong));

    // Back in view: absence cleared, movement judged from scratch.
    let returned = &statuses[55..];
    assert!(returned.iter().all(|s| s.severity == Severity::Normal));
    assert_eq!(returned[0].subline, Some(MovementReading::WARMING_UP));
    assert_eq!(monitor.state().frames_without_subject, 0);
    assert_eq!(monitor.state().frame_counter, 58);
}

#[test]
fn test_reset_mid_session() {
    let mut monitor = FallMonitor::default();
    run_statuses(&mut monitor, &vec![Some(collapsed(0.5)); 12]);
    run_statuses(&mut monitor, &[None, None]);
    assert_eq!(monitor.state().total_alerts, 12);

    monitor.reset();
    let state = monitor.state();
    assert_eq!(state.total_alerts, 0);
    assert_eq!(state.consecutive_fall_frames, 0);
    assert_eq!(state.frames_without_subject, 2);
    assert_eq!(state.frame_counter, 14);
    assert_eq!(monitor.movement_samples(), 0);
}

#[test]
fn test_sessions_are_independent() {
    let mut first = FallMonitor::default();
    let mut second = FallMonitor::default();

    run_statuses(&mut first, &vec![Some(collapsed(0.5)); 5]);
    run_statuses(&mut second, &walking_profile(5));

    assert_eq!(first.summary().total_alerts, 5);
    assert_eq!(second.summary().total_alerts, 0);
}

#[test]
fn test_pacing_does_not_change_decisions() {
    let mut frames = walking_profile(12);
    frames.extend(vec![Some(collapsed(0.5)); 14]);
    frames.extend(vec![None; 33]);
    frames.extend(vec![Some(standing(0.5)); 12]);

    let run = |budget: Duration| {
        let mut source = MemorySource::new(frames.clone());
        let mut runner = MonitorLoop::new(
            FallMonitor::default(),
            LoopOptions {
                frame_budget: budget,
                max_frames: None,
                format: OutputFormat::Json,
            },
        );
        let mut out = Vec::new();
        let outcome = runner.run(&mut source, || None, &mut out);
        (String::from_utf8(out).unwrap(), outcome.summary)
    };

    let (fast_output, fast_summary) = run(Duration::ZERO);
    let (slow_output, slow_summary) = run(Duration::from_millis(1));

    assert_eq!(fast_output, slow_output);
    assert_eq!(fast_summary, slow_summary);
    assert_eq!(fast_summary.total_alerts, 14);
    assert!(fast_output.contains("\"EMERGENCY\""));
    assert!(fast_output.contains("\"ABSENT_LONG\""));
}

#[test]
fn test_jsonl_stream_replay() {
    let standing_line = {
        let mut points = vec!["null".to_string(); LANDMARK_COUNT];
        let set = standing(0.5);
        for id in LandmarkId::REQUIRED {
            let p = set.get(id).unwrap();
            points[id.index()] = format!(r#"{{"x": {}, "y": {}, "visibility": 0.9}}"#, p.x, p.y);
        }
        format!(r#"{{"landmarks": [{}]}}"#, points.join(", "))
    };

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{}", standing_line).unwrap();
    writeln!(file, "null").unwrap();
    writeln!(file, "{}", standing_line).unwrap();
    file.flush().unwrap();

    let mut source = ReplaySource::new(LandmarkStream::open(file.path()).unwrap());
    let mut runner = MonitorLoop::new(
        FallMonitor::new(MonitorConfig::default()),
        LoopOptions {
            frame_budget: Duration::ZERO,
            max_frames: Some(9),
            format: OutputFormat::Text,
        },
    );
    let mut out = Vec::new();
    let outcome = runner.run(&mut source, || None, &mut out);

    assert!(matches!(outcome.stop_reason, StopReason::FrameLimit));
    assert_eq!(outcome.summary.frames_processed, 9);
    assert_eq!(outcome.summary.total_alerts, 0);
    assert_eq!(source.restarts(), 2);

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().filter(|l| l.contains("ABSENT_SHORT")).count(), 3);
}

#[test]
fn test_contract_violation_mid_stream() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "null").unwrap();
    writeln!(file, r#"{{"landmarks": [{{"x": 0.5, "y": 0.2}}]}}"#).unwrap();
    file.flush().unwrap();

    let mut source = LandmarkStream::open(file.path()).unwrap();
    let mut runner = MonitorLoop::new(
        FallMonitor::default(),
        LoopOptions {
            frame_budget: Duration::ZERO,
            ..LoopOptions::default()
        },
    );
    let mut out = Vec::new();
    let outcome = runner.run(&mut source, || None, &mut out);

    match outcome.stop_reason {
        StopReason::Failed(crate::error::MonitorError::MissingLandmark { id }) => {
            assert_eq!(id, LandmarkId::LeftShoulder)
        }
        other => panic!("expected missing landmark, got {:?}", other),
    }
    assert_eq!(outcome.summary.frames_processed, 1);
}
