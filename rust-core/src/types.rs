//! Core data types for the fall monitoring engine.
//!
//! This module defines the values that flow between the posture evaluator,
//! the movement tracker and the session state machine. Landmark data arrives
//! from an external pose estimator once per frame and is never retained past
//! that frame; everything else here is either a transient per-frame result or
//! a small summary.
//!
//! Coordinates are normalized to the frame: `x` and `y` lie in [0, 1] with
//! `y` growing towards the bottom of the image.

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// Number of points in the body topology produced by the pose estimator.
pub const LANDMARK_COUNT: usize = 33;

/// Identifier of a body landmark.
///
/// Variants follow the MediaPipe Pose topology, so `id as usize` is the index
/// of the point in the estimator's output list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkId {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkId {
    /// All identifiers in estimator index order.
    pub const ALL: [LandmarkId; LANDMARK_COUNT] = [
        LandmarkId::Nose,
        LandmarkId::LeftEyeInner,
        LandmarkId::LeftEye,
        LandmarkId::LeftEyeOuter,
        LandmarkId::RightEyeInner,
        LandmarkId::RightEye,
        LandmarkId::RightEyeOuter,
        LandmarkId::LeftEar,
        LandmarkId::RightEar,
        LandmarkId::MouthLeft,
        LandmarkId::MouthRight,
        LandmarkId::LeftShoulder,
        LandmarkId::RightShoulder,
        LandmarkId::LeftElbow,
        LandmarkId::RightElbow,
        LandmarkId::LeftWrist,
        LandmarkId::RightWrist,
        LandmarkId::LeftPinky,
        LandmarkId::RightPinky,
        LandmarkId::LeftIndex,
        LandmarkId::RightIndex,
        LandmarkId::LeftThumb,
        LandmarkId::RightThumb,
        LandmarkId::LeftHip,
        LandmarkId::RightHip,
        LandmarkId::LeftKnee,
        LandmarkId::RightKnee,
        LandmarkId::LeftAnkle,
        LandmarkId::RightAnkle,
        LandmarkId::LeftHeel,
        LandmarkId::RightHeel,
        LandmarkId::LeftFootIndex,
        LandmarkId::RightFootIndex,
    ];

    /// Points the posture rules cannot work without.
    pub const REQUIRED: [LandmarkId; 7] = [
        LandmarkId::Nose,
        LandmarkId::LeftShoulder,
        LandmarkId::RightShoulder,
        LandmarkId::LeftHip,
        LandmarkId::RightHip,
        LandmarkId::LeftAnkle,
        LandmarkId::RightAnkle,
    ];

    /// Index of this point in the estimator output.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up an identifier by estimator index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// A single body landmark as reported by the pose estimator.
///
/// The estimator always supplies a position, even for low-confidence points,
/// so `visibility` is informational only and never gates the heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0 = left edge.
    pub x: f32,
    /// Vertical position, 0 = top edge.
    pub y: f32,
    /// Relative depth. Unused by the heuristics.
    #[serde(default)]
    pub z: f32,
    /// Estimator confidence in [0, 1].
    #[serde(default)]
    pub visibility: f32,
}

impl Landmark {
    /// Creates a fully visible landmark at (x, y).
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    /// Creates a landmark with explicit visibility.
    pub fn with_visibility(x: f32, y: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility,
        }
    }
}

/// The landmarks of one tracked subject in one frame.
///
/// Immutable once built; the engine only ever reads from it.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: [Option<Landmark>; LANDMARK_COUNT],
}

impl LandmarkSet {
    /// Starts an empty set for use with [`LandmarkSet::with`].
    pub fn empty() -> Self {
        Self {
            points: [None; LANDMARK_COUNT],
        }
    }

    /// Builds a set from estimator-ordered points. Entries past
    /// [`LANDMARK_COUNT`] are ignored; `None` marks an unreported point.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Option<Landmark>>,
    {
        let mut set = Self::empty();
        for (slot, point) in set.points.iter_mut().zip(points) {
            *slot = point;
        }
        set
    }

    /// Returns a copy of the set with `id` set to `landmark`.
    pub fn with(mut self, id: LandmarkId, landmark: Landmark) -> Self {
        self.points[id.index()] = Some(landmark);
        self
    }

    pub fn get(&self, id: LandmarkId) -> Option<Landmark> {
        self.points[id.index()]
    }

    /// Fetches a point the caller cannot proceed without.
    ///
    /// A missing required point is a contract violation by the estimator and
    /// surfaces as [`MonitorError::MissingLandmark`].
    pub fn require(&self, id: LandmarkId) -> Result<Landmark, MonitorError> {
        self.get(id).ok_or(MonitorError::MissingLandmark { id })
    }

    /// Number of points present.
    pub fn len(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Why a frame was classified as fall-like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallReason {
    /// No rule fired.
    None,
    /// Head-to-ankle span is short relative to the frame.
    LowHeightRatio,
    /// Head is in the bottom part of the frame.
    HeadTooLow,
    /// Shoulders are at clearly different heights.
    ShoulderTilt,
    /// Shoulders and hips are at almost the same height.
    LyingDown,
}

impl FallReason {
    /// Human-readable alert text for this reason.
    pub fn message(&self) -> &'static str {
        match self {
            FallReason::None => "Normal",
            FallReason::LowHeightRatio => "ALERT: person may have fallen!",
            FallReason::HeadTooLow => "ALERT: head too low!",
            FallReason::ShoulderTilt => "ALERT: person leaning heavily!",
            FallReason::LyingDown => "ALERT: person appears to be lying down!",
        }
    }
}

/// Result of evaluating one frame's posture.
///
/// `fall_detected` is true exactly when `reason` is not [`FallReason::None`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureAssessment {
    pub fall_detected: bool,
    pub reason: FallReason,
    pub message: &'static str,
}

impl PostureAssessment {
    /// Assessment for a frame where no rule fired.
    pub fn normal() -> Self {
        Self::from_reason(FallReason::None)
    }

    pub fn from_reason(reason: FallReason) -> Self {
        Self {
            fall_detected: reason != FallReason::None,
            reason,
            message: reason.message(),
        }
    }
}

impl Default for PostureAssessment {
    fn default() -> Self {
        Self::normal()
    }
}

/// Stillness judgement for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementReading {
    pub is_immobile: bool,
    pub message: &'static str,
    /// Samples in the history when the judgement was made.
    pub sample_count: usize,
}

impl MovementReading {
    pub const WARMING_UP: &'static str = "Analyzing movement...";
    pub const MOTIONLESS: &'static str = "ALERT: person appears motionless!";
    pub const MOVING: &'static str = "Person moving normally";

    pub fn warming_up(sample_count: usize) -> Self {
        Self {
            is_immobile: false,
            message: Self::WARMING_UP,
            sample_count,
        }
    }

    pub fn motionless(sample_count: usize) -> Self {
        Self {
            is_immobile: true,
            message: Self::MOTIONLESS,
            sample_count,
        }
    }

    pub fn moving(sample_count: usize) -> Self {
        Self {
            is_immobile: false,
            message: Self::MOVING,
            sample_count,
        }
    }
}

/// Everything the session state machine needs about a present subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectObservation {
    pub posture: PostureAssessment,
    pub movement: MovementReading,
}

/// Priority class of a frame's display status.
///
/// Ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Subject present, upright and moving.
    Normal,
    /// Subject missing for a short while.
    AbsentShort,
    /// Subject missing long enough to warrant a check.
    AbsentLong,
    /// Subject present but not moving.
    Stationary,
    /// Fall-like posture in this frame.
    Fall,
    /// Fall-like posture sustained over many consecutive frames.
    Emergency,
}

impl Severity {
    /// Overlay colour as RGB.
    pub fn color_rgb(&self) -> [u8; 3] {
        match self {
            Severity::Normal => [0, 255, 0],
            Severity::AbsentShort => [255, 255, 255],
            Severity::AbsentLong => [255, 255, 0],
            Severity::Stationary => [255, 165, 0],
            Severity::Fall | Severity::Emergency => [255, 0, 0],
        }
    }

    /// Short label for console output.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Normal => "NORMAL",
            Severity::AbsentShort => "ABSENT_SHORT",
            Severity::AbsentLong => "ABSENT_LONG",
            Severity::Stationary => "STATIONARY",
            Severity::Fall => "FALL",
            Severity::Emergency => "EMERGENCY",
        }
    }

    /// True for statuses that ask a human to look.
    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            Severity::AbsentLong | Severity::Stationary | Severity::Fall | Severity::Emergency
        )
    }
}

/// What the monitor shows for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayStatus {
    pub headline: &'static str,
    pub severity: Severity,
    pub subline: Option<&'static str>,
}

impl DisplayStatus {
    pub fn new(severity: Severity, headline: &'static str, subline: Option<&'static str>) -> Self {
        Self {
            headline,
            severity,
            subline,
        }
    }
}

/// Read-only report produced when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frames_processed: u64,
    pub total_alerts: u64,
}
