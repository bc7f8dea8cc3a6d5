//! Posture Evaluation Module.
//!
//! Classifies a single frame's body landmarks as fall-like or not, using
//! cheap 2D proxies for body orientation instead of a full 3D pose:
//!
//! 1. Collapsed height: the head-to-ankle span is short, or failing that the
//!    head sits low in the frame.
//! 2. Shoulder tilt: one shoulder is much higher than the other.
//! 3. Horizontal torso: shoulders and hips are at nearly the same height.
//!
//! Rules run in that order. Once any rule fires the frame is fall-like, and
//! each later rule that fires replaces the reported reason, so a horizontal
//! torso always wins the message when it is present.
//!
//! Evaluation is stateless; the same landmarks always give the same result.

use tracing::debug;

use crate::config::PostureConfig;
use crate::error::Result;
use crate::types::{FallReason, LandmarkId, LandmarkSet, PostureAssessment};

/// Intermediate measurements taken from a landmark set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureFeatures {
    /// Nose y.
    pub head_y: f32,
    /// Vertical head-to-lowest-ankle span, or the configured default when
    /// the ankles cannot be placed.
    pub person_height: f32,
    /// Vertical offset between the shoulders.
    pub shoulder_diff: f32,
    /// Vertical gap between the shoulder midpoint and the hip midpoint.
    pub shoulder_hip_gap: f32,
}

/// Rule-based posture classifier.
#[derive(Debug, Clone, Default)]
pub struct PostureEvaluator {
    config: PostureConfig,
}

impl PostureEvaluator {
    pub fn new(config: PostureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PostureConfig {
        &self.config
    }

    /// Extract the measurements the rules operate on.
    ///
    /// Fails if any of [`LandmarkId::REQUIRED`] is absent.
    pub fn features(&self, landmarks: &LandmarkSet) -> Result<PostureFeatures> {
        let nose = landmarks.require(LandmarkId::Nose)?;
        let left_shoulder = landmarks.require(LandmarkId::LeftShoulder)?;
        let right_shoulder = landmarks.require(LandmarkId::RightShoulder)?;
        let left_hip = landmarks.require(LandmarkId::LeftHip)?;
        let right_hip = landmarks.require(LandmarkId::RightHip)?;
        let left_ankle = landmarks.require(LandmarkId::LeftAnkle)?;
        let right_ankle = landmarks.require(LandmarkId::RightAnkle)?;

        let head_y = nose.y;

        // A non-positive ankle y means the estimator could not place the foot.
        let person_height = if left_ankle.y > 0.0 && right_ankle.y > 0.0 {
            (head_y - left_ankle.y.max(right_ankle.y)).abs()
        } else {
            self.config.default_person_height
        };

        let shoulder_y = (left_shoulder.y + right_shoulder.y) / 2.0;
        let hip_y = (left_hip.y + right_hip.y) / 2.0;

        Ok(PostureFeatures {
            head_y,
            person_height,
            shoulder_diff: (left_shoulder.y - right_shoulder.y).abs(),
            shoulder_hip_gap: (shoulder_y - hip_y).abs(),
        })
    }

    /// Classify one frame.
    pub fn evaluate(&self, landmarks: &LandmarkSet) -> Result<PostureAssessment> {
        let features = self.features(landmarks)?;
        Ok(self.classify(&features))
    }

    /// Apply the rules to precomputed measurements.
    pub fn classify(&self, features: &PostureFeatures) -> PostureAssessment {
        let cfg = &self.config;
        let mut fall_detected = false;
        let mut reason = FallReason::None;

        if features.person_height < cfg.min_person_height {
            fall_detected = true;
            reason = FallReason::LowHeightRatio;
        } else if features.head_y > cfg.max_head_y {
            fall_detected = true;
            reason = FallReason::HeadTooLow;
        }

        if features.shoulder_diff > cfg.max_shoulder_tilt {
            fall_detected = true;
            reason = FallReason::ShoulderTilt;
        }

        if features.shoulder_hip_gap < cfg.min_shoulder_hip_gap {
            fall_detected = true;
            reason = FallReason::LyingDown;
        }

        if fall_detected {
            debug!(
                ?reason,
                person_height = features.person_height,
                head_y = features.head_y,
                shoulder_diff = features.shoulder_diff,
                shoulder_hip_gap = features.shoulder_hip_gap,
                "fall-like posture"
            );
        }

        PostureAssessment {
            fall_detected,
            reason,
            message: reason.message(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
