//! Movement Tracking Module.
//!
//! Tracks the subject's approximate horizontal position across frames and
//! flags prolonged stillness, which after a fall can indicate the person is
//! unconscious.
//!
//! Each frame contributes one sample: the mean x of the nose and both
//! shoulders. A bounded FIFO history keeps the most recent samples, and the
//! mean absolute frame-to-frame drift over that history decides whether the
//! subject is moving. Nothing is judged until a warm-up number of samples
//! has been collected.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::config::MovementConfig;
use crate::error::Result;
use crate::types::{LandmarkId, LandmarkSet, MovementReading};

/// Stateful stillness detector over a bounded sample history.
#[derive(Debug, Clone)]
pub struct MovementTracker {
    config: MovementConfig,
    history: VecDeque<f32>,
}

impl MovementTracker {
    pub fn new(config: MovementConfig) -> Self {
        let capacity = config.history_len;
        Self {
            config,
            history: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Horizontal position sample for one frame.
    pub fn sample(landmarks: &LandmarkSet) -> Result<f32> {
        let nose = landmarks.require(LandmarkId::Nose)?;
        let left_shoulder = landmarks.require(LandmarkId::LeftShoulder)?;
        let right_shoulder = landmarks.require(LandmarkId::RightShoulder)?;
        Ok((nose.x + left_shoulder.x + right_shoulder.x) / 3.0)
    }

    /// Record the frame's position and judge stillness.
    pub fn observe(&mut self, landmarks: &LandmarkSet) -> Result<MovementReading> {
        let sample = Self::sample(landmarks)?;
        Ok(self.push_sample(sample))
    }

    /// Record a precomputed position sample and judge stillness.
    pub fn push_sample(&mut self, sample: f32) -> MovementReading {
        self.history.push_back(sample);
        while self.history.len() > self.config.history_len {
            self.history.pop_front();
        }

        let count = self.history.len();
        if count < self.config.warmup_samples {
            trace!(samples = count, "movement warm-up");
            return MovementReading::warming_up(count);
        }

        let drift = self.mean_drift();
        if drift < self.config.stillness_threshold {
            debug!(drift, samples = count, "subject appears motionless");
            MovementReading::motionless(count)
        } else {
            MovementReading::moving(count)
        }
    }

    /// Mean absolute difference between consecutive retained samples.
    ///
    /// Zero when fewer than two samples are held.
    pub fn mean_drift(&self) -> f32 {
        if self.history.len() < 2 {
            return 0.0;
        }

        let mut total = 0.0_f32;
        let mut deltas = 0_usize;
        let mut previous = self.history[0];
        for &current in self.history.iter().skip(1) {
            total += (current - previous).abs();
            previous = current;
            deltas += 1;
        }
        total / deltas as f32
    }

    /// Forget all collected samples; the warm-up starts over.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Number of samples currently retained.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// True once enough samples are held to judge stillness.
    pub fn is_warmed_up(&self) -> bool {
        self.history.len() >= self.config.warmup_samples
    }
}

impl Default for MovementTracker {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
