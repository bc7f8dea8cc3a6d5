//! Console reporting.
//!
//! Renders per-frame statuses and the end-of-session report. Output goes to
//! any [`Write`] so the binary can target stdout while tests capture into a
//! buffer. Two formats are supported: a human-readable text line per frame,
//! and one JSON object per frame for downstream tooling.

use std::io::{self, Write};

use serde::Serialize;

use crate::session::SessionState;
use crate::types::{DisplayStatus, Severity, SessionSummary};

const RULE_WIDTH: usize = 50;

/// Output format for statuses and the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One frame's status as emitted in JSON mode.
#[derive(Debug, Clone, Serialize)]
pub struct StatusRecord<'a> {
    pub frame: u64,
    pub severity: Severity,
    pub headline: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subline: Option<&'a str>,
    pub total_alerts: u64,
    pub color: [u8; 3],
}

impl<'a> StatusRecord<'a> {
    pub fn new(status: &'a DisplayStatus, state: &SessionState) -> Self {
        Self {
            frame: state.frame_counter,
            severity: status.severity,
            headline: status.headline,
            subline: status.subline,
            total_alerts: state.total_alerts,
            color: status.severity.color_rgb(),
        }
    }
}

/// Startup banner.
pub fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH + 10);
    writeln!(out, "{}", rule)?;
    writeln!(out, "FALL DETECTION SYSTEM FOR POWER-OUTAGE EMERGENCIES")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Watches a landmark stream and raises alerts when the subject:")?;
    writeln!(out, "- shows a fall-like posture")?;
    writeln!(out, "- stays motionless")?;
    writeln!(out, "- disappears from view")?;
    writeln!(out)?;
    writeln!(out, "Commands: 'q' + Enter to quit, 'r' + Enter to reset counters")?;
    Ok(())
}

/// Render one frame's status.
pub fn write_status<W: Write>(
    out: &mut W,
    status: &DisplayStatus,
    state: &SessionState,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            write!(
                out,
                "[frame {:>6}] {:<12} {}",
                state.frame_counter,
                status.severity.label(),
                status.headline
            )?;
            if let Some(subline) = status.subline {
                write!(out, " | {}", subline)?;
            }
            writeln!(out, " (total alerts: {})", state.total_alerts)
        }
        OutputFormat::Json => {
            let record = StatusRecord::new(status, state);
            serde_json::to_writer(&mut *out, &record)?;
            writeln!(out)
        }
    }
}

/// End-of-session report.
pub fn write_summary<W: Write>(
    out: &mut W,
    summary: &SessionSummary,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            let rule = "=".repeat(RULE_WIDTH);
            writeln!(out, "{}", rule)?;
            writeln!(out, "FINAL MONITORING REPORT")?;
            writeln!(out, "{}", rule)?;
            writeln!(out, "Frames processed: {}", summary.frames_processed)?;
            writeln!(out, "Total fall alerts: {}", summary.total_alerts)?;
            Ok(())
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, summary)?;
            writeln!(out)
        }
    }
}
