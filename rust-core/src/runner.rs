//! Frame loop driving a [`FallMonitor`] from a [`FrameSource`].
//!
//! Each iteration pulls one frame, runs it through the monitor, renders the
//! status, then polls the control surface for a quit or reset command. The
//! loop paces itself to a fixed frame budget. Any error inside the loop ends
//! the session, but the summary is still produced from whatever the monitor
//! had accumulated.

use std::io::Write;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::error::MonitorError;
use crate::pipeline::FallMonitor;
use crate::report::{self, OutputFormat};
use crate::source::FrameSource;
use crate::types::SessionSummary;

/// User commands accepted while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Quit,
    Reset,
}

impl ControlCommand {
    /// Parse a typed command; anything other than `q` or `r` is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "q" | "Q" => Some(ControlCommand::Quit),
            "r" | "R" => Some(ControlCommand::Reset),
            _ => None,
        }
    }
}

/// Why a session stopped.
#[derive(Debug)]
pub enum StopReason {
    /// The user asked to quit.
    Quit,
    /// The configured frame limit was reached.
    FrameLimit,
    /// The source ran dry (only for sources that do not loop).
    EndOfStream,
    /// Processing failed.
    Failed(MonitorError),
}

/// Result of a finished session.
#[derive(Debug)]
pub struct SessionOutcome {
    pub summary: SessionSummary,
    pub stop_reason: StopReason,
}

/// Loop settings.
#[derive(Debug, Clone)]
pub struct LoopOptions {
    /// Minimum wall time per iteration. Zero disables pacing.
    pub frame_budget: Duration,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
    pub format: OutputFormat,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            frame_budget: Duration::from_millis(30),
            max_frames: None,
            format: OutputFormat::Text,
        }
    }
}

/// Paced frame loop.
pub struct MonitorLoop {
    monitor: FallMonitor,
    options: LoopOptions,
    deadline_misses: u64,
}

impl MonitorLoop {
    pub fn new(monitor: FallMonitor, options: LoopOptions) -> Self {
        Self {
            monitor,
            options,
            deadline_misses: 0,
        }
    }

    pub fn monitor(&self) -> &FallMonitor {
        &self.monitor
    }

    /// Iterations that took longer than the frame budget.
    pub fn deadline_misses(&self) -> u64 {
        self.deadline_misses
    }

    /// Run until quit, frame limit, end of stream or failure.
    pub fn run<S, C, W>(&mut self, source: &mut S, mut poll_command: C, out: &mut W) -> SessionOutcome
    where
        S: FrameSource,
        C: FnMut() -> Option<ControlCommand>,
        W: Write,
    {
        info!(source = %source.name(), "monitoring started");

        let stop_reason = loop {
            if let Some(limit) = self.options.max_frames {
                if self.monitor.state().frame_counter >= limit {
                    break StopReason::FrameLimit;
                }
            }

            let cycle_start = Instant::now();

            match self.tick(source, out) {
                Ok(true) => {}
                Ok(false) => break StopReason::EndOfStream,
                Err(e) => {
                    error!(error = %e, "frame processing failed, ending session");
                    break StopReason::Failed(e);
                }
            }

            match poll_command() {
                Some(ControlCommand::Quit) => break StopReason::Quit,
                Some(ControlCommand::Reset) => self.monitor.reset(),
                None => {}
            }

            let elapsed = cycle_start.elapsed();
            if elapsed < self.options.frame_budget {
                std::thread::sleep(self.options.frame_budget - elapsed);
            } else if !self.options.frame_budget.is_zero() {
                self.deadline_misses += 1;
            }
        };

        let summary = self.monitor.summary();
        info!(
            frames = summary.frames_processed,
            alerts = summary.total_alerts,
            deadline_misses = self.deadline_misses,
            "monitoring stopped"
        );

        SessionOutcome {
            summary,
            stop_reason,
        }
    }

    /// Process one frame. Returns `Ok(false)` when the source is exhausted.
    fn tick<S, W>(&mut self, source: &mut S, out: &mut W) -> Result<bool, MonitorError>
    where
        S: FrameSource,
        W: Write,
    {
        let Some(frame) = source.next_frame()? else {
            return Ok(false);
        };

        let status = self.monitor.process_frame(frame.as_ref())?;
        report::write_status(out, &status, &self.monitor.state(), self.options.format)
            .map_err(|e| MonitorError::io("<output>", e))?;
        Ok(true)
    }
}
