//! Thresholds and tuning knobs for the monitoring engine.
//!
//! Every heuristic constant lives in one of the structs below. Defaults match
//! the values the detector was tuned with; a JSON file may override any subset
//! of them.
//!
//! ```rust
//! use fallwatch::config::MonitorConfig;
//!
//! let cfg = MonitorConfig::default();
//! cfg.validate().expect("default config is valid");
//! assert_eq!(cfg.movement.history_len, 20);
//! ```
//!
//! All temporal limits are counted in frames, not wall-clock time, so the
//! engine behaves identically regardless of playback speed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

/// Posture rule thresholds, in normalized frame units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Head-to-ankle span below which the subject is considered collapsed.
    pub min_person_height: f32,
    /// Head y beyond which the head is considered too close to the floor.
    pub max_head_y: f32,
    /// Largest tolerated vertical offset between the two shoulders.
    pub max_shoulder_tilt: f32,
    /// Shoulder-to-hip vertical gap below which the torso is horizontal.
    pub min_shoulder_hip_gap: f32,
    /// Span assumed when the ankles cannot be placed.
    pub default_person_height: f32,
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            min_person_height: 0.4,
            max_head_y: 0.7,
            max_shoulder_tilt: 0.15,
            min_shoulder_hip_gap: 0.1,
            default_person_height: 1.0,
        }
    }
}

/// Stillness tracking parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Samples retained in the movement history.
    pub history_len: usize,
    /// Samples needed before stillness is judged at all.
    pub warmup_samples: usize,
    /// Mean per-frame horizontal drift below which the subject is motionless.
    pub stillness_threshold: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            history_len: 20,
            warmup_samples: 10,
            stillness_threshold: 0.01,
        }
    }
}

/// Session escalation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Absent frames tolerated before the long-absence alarm.
    pub absence_alarm_frames: u32,
    /// Consecutive fall frames tolerated before escalating to emergency.
    pub emergency_fall_frames: u32,
    /// Clear the movement history when a subject reappears after a
    /// long absence.
    pub reset_history_after_absence: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            absence_alarm_frames: 30,
            emergency_fall_frames: 10,
            reset_history_after_absence: true,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub posture: PostureConfig,
    pub movement: MovementConfig,
    pub session: SessionConfig,
}

impl MonitorConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MonitorError::io(path, e))?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let cfg: MonitorConfig = serde_json::from_str(contents)
            .map_err(|e| MonitorError::config("(file)", e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        let p = &self.posture;
        for (field, value) in [
            ("posture.min_person_height", p.min_person_height),
            ("posture.max_head_y", p.max_head_y),
            ("posture.max_shoulder_tilt", p.max_shoulder_tilt),
            ("posture.min_shoulder_hip_gap", p.min_shoulder_hip_gap),
            ("posture.default_person_height", p.default_person_height),
            ("movement.stillness_threshold", self.movement.stillness_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MonitorError::config(
                    field,
                    format!("must be finite and non-negative, got {}", value),
                ));
            }
        }

        let m = &self.movement;
        if m.history_len < 2 {
            return Err(MonitorError::config(
                "movement.history_len",
                "must be at least 2 to measure drift",
            ));
        }
        if m.warmup_samples == 0 || m.warmup_samples > m.history_len {
            return Err(MonitorError::config(
                "movement.warmup_samples",
                format!("must be in 1..={}", m.history_len),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = MonitorConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.posture.min_person_height, 0.4);
        assert_eq!(cfg.session.absence_alarm_frames, 30);
        assert_eq!(cfg.session.emergency_fall_frames, 10);
        assert_eq!(cfg.movement.warmup_samples, 10);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = MonitorConfig::from_json_str(r#"{"session": {"absence_alarm_frames": 60}}"#)
            .unwrap();
        assert_eq!(cfg.session.absence_alarm_frames, 60);
        assert_eq!(cfg.session.emergency_fall_frames, 10);
        assert_eq!(cfg.posture, PostureConfig::default());
    }

    #[test]
    fn test_rejects_short_history() {
        let err = MonitorConfig::from_json_str(r#"{"movement": {"history_len": 1, "warmup_samples": 1}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            MonitorError::Config { field: "movement.history_len", .. }
        ));
    }

    #[test]
    fn test_rejects_warmup_beyond_history() {
        let mut cfg = MonitorConfig::default();
        cfg.movement.warmup_samples = 21;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let mut cfg = MonitorConfig::default();
        cfg.posture.max_shoulder_tilt = -0.1;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("posture.max_shoulder_tilt"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(MonitorConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"movement": {{"stillness_threshold": 0.02}}}}"#).unwrap();

        let cfg = MonitorConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.movement.stillness_threshold, 0.02);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MonitorConfig::from_json_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, MonitorError::Io { .. }));
    }
}
