/// Complete per-frame monitoring pipeline.
///
/// This module wires the three decision stages together in the order the
/// frame loop needs them:
/// 1. **Posture Evaluation**: classify the frame's landmarks as fall-like or not
/// 2. **Movement Tracking**: append the subject's position, judge stillness
/// 3. **Session Aggregation**: fold both judgements and presence into counters
///    and a display status
///
/// Frames without a subject skip the first two stages. The pipeline owns the
/// only mutable state of a session, so several independent sessions can run
/// side by side.
///
/// # Resource Model
/// - Single-threaded and synchronous: nothing here blocks or waits
/// - Fixed memory: the movement history is the only buffer and it is bounded
/// - No landmark data outlives the frame that produced it

use tracing::debug;

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::movement::MovementTracker;
use crate::posture::PostureEvaluator;
use crate::session::{SessionState, SessionStateMachine};
use crate::types::{DisplayStatus, LandmarkSet, SessionSummary, SubjectObservation};

/// Fall monitor for one subject stream.
#[derive(Debug, Clone)]
pub struct FallMonitor {
    evaluator: PostureEvaluator,
    tracker: MovementTracker,
    session: SessionStateMachine,
    reset_history_after_absence: bool,
    absence_alarm_frames: u32,
}

impl FallMonitor {
    /// Creates a monitor with the given configuration.
    pub fn new(config: MonitorConfig) -> Self {
        let MonitorConfig {
            posture,
            movement,
            session,
        } = config;

        Self {
            reset_history_after_absence: session.reset_history_after_absence,
            absence_alarm_frames: session.absence_alarm_frames,
            evaluator: PostureEvaluator::new(posture),
            tracker: MovementTracker::new(movement),
            session: SessionStateMachine::new(session),
        }
    }

    /// Processes one frame.
    ///
    /// `landmarks` is `None` when the pose estimator found no subject. A
    /// landmark set lacking a required point is rejected and leaves the
    /// session counters untouched.
    pub fn process_frame(&mut self, landmarks: Option<&LandmarkSet>) -> Result<DisplayStatus> {
        let Some(landmarks) = landmarks else {
            return Ok(self.session.step(None));
        };

        let posture = self.evaluator.evaluate(landmarks)?;

        // Positions from before a long absence say nothing about the
        // person who is in view now.
        if self.reset_history_after_absence
            && self.session.state().frames_without_subject > self.absence_alarm_frames
            && !self.tracker.is_empty()
        {
            debug!(
                absent_frames = self.session.state().frames_without_subject,
                "subject back after long absence, clearing movement history"
            );
            self.tracker.reset();
        }

        let movement = self.tracker.observe(landmarks)?;
        Ok(self.session.step(Some(SubjectObservation { posture, movement })))
    }

    /// Handles the user's reset command.
    pub fn reset(&mut self) {
        self.session.reset(&mut self.tracker);
    }

    /// Current session counters.
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Final report for the session.
    pub fn summary(&self) -> SessionSummary {
        self.session.summary()
    }

    /// Samples held in the movement history.
    pub fn movement_samples(&self) -> usize {
        self.tracker.len()
    }
}

impl Default for FallMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}
