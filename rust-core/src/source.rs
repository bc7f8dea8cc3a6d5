//! Landmark frame sources.
//!
//! Pose estimation runs outside this crate. Its per-frame output reaches the
//! engine through the [`FrameSource`] trait, either from a JSON Lines file
//! ([`LandmarkStream`]) or from memory ([`MemorySource`]). [`ReplaySource`]
//! loops any source forever, seeking back to the first frame whenever the
//! stream ends.
//!
//! # Stream format
//!
//! One JSON value per line, one line per video frame:
//!
//! ```text
//! null
//! {"landmarks": null}
//! {"frame": 3, "landmarks": [{"x": 0.5, "y": 0.1, "visibility": 0.98}, null, ...]}
//! ```
//!
//! `null`, an object without landmarks, or an empty landmark list mean no
//! subject was found. Landmark entries follow [`LandmarkId`] index order and a
//! `null` entry marks a point the estimator did not report. Blank lines are
//! skipped.
//!
//! [`LandmarkId`]: crate::types::LandmarkId

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{MonitorError, Result};
use crate::types::{Landmark, LandmarkSet};

/// One frame's pose estimator output: the subject's landmarks, or `None`
/// when nobody was found.
pub type Frame = Option<LandmarkSet>;

/// A sequential supplier of frames.
pub trait FrameSource {
    /// Next frame, or `Ok(None)` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Seek back to the first frame.
    fn rewind(&mut self) -> Result<()>;

    /// Name used in logs and errors.
    fn name(&self) -> String;
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    landmarks: Option<Vec<Option<Landmark>>>,
}

/// Decode one stream line. `Ok(None)` means the line carries no frame.
pub fn parse_frame_line(line: &str, line_no: usize) -> Result<Option<Frame>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let record: Option<FrameRecord> =
        serde_json::from_str(trimmed).map_err(|e| MonitorError::Parse {
            line: line_no,
            reason: e.to_string(),
        })?;

    let frame = match record.and_then(|r| r.landmarks) {
        Some(points) if !points.is_empty() => Some(LandmarkSet::from_points(points)),
        _ => None,
    };
    Ok(Some(frame))
}

/// Frames read from a JSON Lines file.
#[derive(Debug)]
pub struct LandmarkStream {
    path: PathBuf,
    reader: BufReader<File>,
    line_no: usize,
    buffer: String,
}

impl LandmarkStream {
    /// Open a stream file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| MonitorError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            line_no: 0,
            buffer: String::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for LandmarkStream {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_line(&mut self.buffer)
                .map_err(|e| MonitorError::io(&self.path, e))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            if let Some(frame) = parse_frame_line(&self.buffer, self.line_no)? {
                return Ok(Some(frame));
            }
        }
    }

    fn rewind(&mut self) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| MonitorError::io(&self.path, e))?;
        self.line_no = 0;
        Ok(())
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Frames held in memory, for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    frames: Vec<Frame>,
    cursor: usize,
}

impl MemorySource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let frame = self.frames.get(self.cursor).cloned();
        if frame.is_some() {
            self.cursor += 1;
        }
        Ok(frame)
    }

    fn rewind(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}

/// Loops an inner source endlessly.
///
/// At end of stream the inner source is rewound and reading continues, so
/// `next_frame` never returns `Ok(None)`. A source with no frames at all is
/// an error instead of a busy loop.
#[derive(Debug)]
pub struct ReplaySource<S> {
    inner: S,
    restarts: u64,
}

impl<S: FrameSource> ReplaySource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, restarts: 0 }
    }

    /// How many times the stream has been rewound.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: FrameSource> FrameSource for ReplaySource<S> {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if let Some(frame) = self.inner.next_frame()? {
            return Ok(Some(frame));
        }

        self.inner.rewind()?;
        self.restarts += 1;
        info!(source = %self.inner.name(), restarts = self.restarts, "stream ended, replaying from start");

        match self.inner.next_frame()? {
            Some(frame) => Ok(Some(frame)),
            None => {
                debug!(source = %self.inner.name(), "nothing to replay");
                Err(MonitorError::EmptyStream {
                    name: self.inner.name(),
                })
            }
        }
    }

    fn rewind(&mut self) -> Result<()> {
        self.inner.rewind()
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}
