//! Session state machine.
//!
//! Aggregates per-frame posture and movement judgements into a prioritized
//! display status, keeping the counters that turn isolated detections into
//! escalating alerts:
//!
//! - `total_alerts`: every fall-like frame since the last reset
//! - `consecutive_fall_frames`: length of the current uninterrupted fall run
//! - `frames_without_subject`: length of the current absence
//! - `frame_counter`: every frame processed this session
//!
//! Priority per frame is absence, then fall, then stillness, then normal.
//! All limits are frame counts.

use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::movement::MovementTracker;
use crate::types::{DisplayStatus, Severity, SessionSummary, SubjectObservation};

pub const NORMAL_HEADLINE: &str = "Subject detected - status normal";
pub const STATIONARY_SUBLINE: &str = "Monitor the subject's consciousness";
pub const EMERGENCY_SUBLINE: &str = "EMERGENCY: check immediately!";
pub const ABSENT_SHORT_HEADLINE: &str = "Searching for a subject in the area...";
pub const ABSENT_LONG_HEADLINE: &str = "ATTENTION: no person detected!";
pub const ABSENT_LONG_SUBLINE: &str = "Check whether someone needs help";

/// Counters owned by one monitoring session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    pub total_alerts: u64,
    pub consecutive_fall_frames: u32,
    pub frames_without_subject: u32,
    pub frame_counter: u64,
}

/// Per-frame alert aggregation.
#[derive(Debug, Clone, Default)]
pub struct SessionStateMachine {
    config: SessionConfig,
    state: SessionState,
}

impl SessionStateMachine {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::default(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Snapshot of the counters.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Consume one frame's signals and produce its display status.
    ///
    /// `subject` is `None` when the pose estimator found nobody.
    pub fn step(&mut self, subject: Option<SubjectObservation>) -> DisplayStatus {
        self.state.frame_counter += 1;

        match subject {
            None => self.step_absent(),
            Some(observation) => self.step_present(observation),
        }
    }

    fn step_absent(&mut self) -> DisplayStatus {
        let state = &mut self.state;
        state.frames_without_subject = state.frames_without_subject.saturating_add(1);
        state.consecutive_fall_frames = 0;

        if state.frames_without_subject > self.config.absence_alarm_frames {
            if state.frames_without_subject == self.config.absence_alarm_frames + 1 {
                info!(
                    frames = state.frames_without_subject,
                    "subject missing beyond alarm limit"
                );
            }
            DisplayStatus::new(
                Severity::AbsentLong,
                ABSENT_LONG_HEADLINE,
                Some(ABSENT_LONG_SUBLINE),
            )
        } else {
            DisplayStatus::new(Severity::AbsentShort, ABSENT_SHORT_HEADLINE, None)
        }
    }

    fn step_present(&mut self, observation: SubjectObservation) -> DisplayStatus {
        let SubjectObservation { posture, movement } = observation;
        let state = &mut self.state;
        state.frames_without_subject = 0;

        if posture.fall_detected {
            state.total_alerts += 1;
            state.consecutive_fall_frames = state.consecutive_fall_frames.saturating_add(1);

            if state.consecutive_fall_frames > self.config.emergency_fall_frames {
                if state.consecutive_fall_frames == self.config.emergency_fall_frames + 1 {
                    warn!(
                        consecutive = state.consecutive_fall_frames,
                        reason = ?posture.reason,
                        "sustained fall, escalating to emergency"
                    );
                }
                return DisplayStatus::new(
                    Severity::Emergency,
                    posture.message,
                    Some(EMERGENCY_SUBLINE),
                );
            }
            return DisplayStatus::new(Severity::Fall, posture.message, None);
        }

        state.consecutive_fall_frames = 0;

        if movement.is_immobile {
            DisplayStatus::new(
                Severity::Stationary,
                movement.message,
                Some(STATIONARY_SUBLINE),
            )
        } else {
            DisplayStatus::new(Severity::Normal, NORMAL_HEADLINE, Some(movement.message))
        }
    }

    /// Clear alert bookkeeping and the movement history.
    ///
    /// The absence counter and frame counter keep running.
    pub fn reset(&mut self, tracker: &mut MovementTracker) {
        self.state.total_alerts = 0;
        self.state.consecutive_fall_frames = 0;
        tracker.reset();
        info!(frame = self.state.frame_counter, "counters reset");
    }

    /// Final report for the session.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            frames_processed: self.state.frame_counter,
            total_alerts: self.state.total_alerts,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
