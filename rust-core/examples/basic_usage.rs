/// Basic usage example: feed synthetic landmark frames, watch the alerts escalate
use fallwatch::{FallMonitor, Landmark, LandmarkId, LandmarkSet, MonitorConfig};

fn main() {
    println!("=== Fallwatch: Basic Example ===\n");

    let mut monitor = FallMonitor::new(MonitorConfig::default());

    // Simulated pose estimator output, one entry per video frame.
    let mut frames: Vec<(&str, Option<LandmarkSet>)> = Vec::new();

    // Standing and swaying (frames 1-12)
    for i in 0..12 {
        let x = if i % 2 == 0 { 0.48 } else { 0.52 };
        frames.push(("standing", Some(body(x, 0.15, 0.3, 0.55, 0.9))));
    }

    // Collapsed on the floor (frames 13-26)
    for _ in 0..14 {
        frames.push(("collapsed", Some(body(0.5, 0.75, 0.8, 0.92, 0.95))));
    }

    // Out of view (frames 27-60)
    for _ in 0..34 {
        frames.push(("absent", None));
    }

    println!("Processing {} frames...\n", frames.len());

    for (label, frame) in &frames {
        let status = match monitor.process_frame(frame.as_ref()) {
            Ok(status) => status,
            Err(e) => {
                eprintln!("frame rejected: {}", e);
                break;
            }
        };
        let state = monitor.state();

        print!(
            "frame {:>3} {:<10} {:<12} {}",
            state.frame_counter,
            label,
            status.severity.label(),
            status.headline
        );
        if let Some(subline) = status.subline {
            print!(" | {}", subline);
        }
        println!();
    }

    let summary = monitor.summary();
    println!("\n=== Summary ===");
    println!("Frames processed: {}", summary.frames_processed);
    println!("Total fall alerts: {}", summary.total_alerts);
}

fn body(x: f32, head_y: f32, shoulder_y: f32, hip_y: f32, ankle_y: f32) -> LandmarkSet {
    LandmarkSet::empty()
        .with(LandmarkId::Nose, Landmark::new(x, head_y))
        .with(LandmarkId::LeftShoulder, Landmark::new(x - 0.06, shoulder_y))
        .with(LandmarkId::RightShoulder, Landmark::new(x + 0.06, shoulder_y))
        .with(LandmarkId::LeftHip, Landmark::new(x - 0.04, hip_y))
        .with(LandmarkId::RightHip, Landmark::new(x + 0.04, hip_y))
        .with(LandmarkId::LeftAnkle, Landmark::new(x - 0.04, ankle_y))
        .with(LandmarkId::RightAnkle, Landmark::new(x + 0.04, ankle_y))
}
