//! Fallwatch Fall Monitoring Engine Library
//!
//! A temporal heuristic engine that turns a per-frame stream of human body
//! landmarks into a persistent alert state: normal, fallen, immobile or
//! absent. Landmarks come from an external pose estimator; this crate owns
//! the decisions made on top of them.
//!
//! # Design Philosophy
//!
//! - **Frame counts, not clocks**: every escalation threshold counts frames, so
//!   behaviour does not depend on playback or processing speed.
//! - **Fail fast on bad input**: a landmark set missing a required point is a
//!   contract violation and is reported, never silently defaulted.
//! - **Owned session state**: counters and history live in one [`FallMonitor`]
//!   per session. Nothing is global and nothing is persisted.
//!
//! # Example
//!
//! ```
//! use fallwatch::{FallMonitor, Landmark, LandmarkId, LandmarkSet, Severity};
//!
//! let mut monitor = FallMonitor::default();
//!
//! // Nobody in view.
//! let status = monitor.process_frame(None).unwrap();
//! assert_eq!(status.severity, Severity::AbsentShort);
//!
//! // Someone lying on the floor.
//! let lying = LandmarkSet::empty()
//!     .with(LandmarkId::Nose, Landmark::new(0.2, 0.8))
//!     .with(LandmarkId::LeftShoulder, Landmark::new(0.3, 0.78))
//!     .with(LandmarkId::RightShoulder, Landmark::new(0.3, 0.84))
//!     .with(LandmarkId::LeftHip, Landmark::new(0.55, 0.8))
//!     .with(LandmarkId::RightHip, Landmark::new(0.55, 0.84))
//!     .with(LandmarkId::LeftAnkle, Landmark::new(0.85, 0.8))
//!     .with(LandmarkId::RightAnkle, Landmark::new(0.85, 0.84));
//! let status = monitor.process_frame(Some(&lying)).unwrap();
//! assert_eq!(status.severity, Severity::Fall);
//! assert_eq!(monitor.summary().total_alerts, 1);
//! ```

pub mod config;
pub mod error;
pub mod movement;
pub mod pipeline;
pub mod posture;
pub mod report;
pub mod runner;
pub mod session;
pub mod source;
pub mod types;

#[cfg(test)]
mod integration_tests;

// Re-export commonly used types
pub use config::{MonitorConfig, MovementConfig, PostureConfig, SessionConfig};
pub use error::MonitorError;
pub use movement::MovementTracker;
pub use pipeline::FallMonitor;
pub use posture::{PostureEvaluator, PostureFeatures};
pub use runner::{ControlCommand, LoopOptions, MonitorLoop, SessionOutcome, StopReason};
pub use session::{SessionState, SessionStateMachine};
pub use source::{Frame, FrameSource, LandmarkStream, MemorySource, ReplaySource};
pub use types::{
    DisplayStatus, FallReason, Landmark, LandmarkId, LandmarkSet, MovementReading,
    PostureAssessment, Severity, SessionSummary, SubjectObservation,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
