#![warn(missing_docs)]
//! Deterministic testing surfaces: draw-call capture and headless frame logs.

use anyhow::Result;
use glam::Vec2;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use stormscape_core::{Canvas, Rgba};

/// One captured drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCall {
    /// Filled circle.
    Circle {
        /// Center position.
        center: Vec2,
        /// Radius.
        radius: f32,
        /// Fill color.
        color: Rgba,
    },
    /// Axis-aligned rectangle.
    Rectangle {
        /// Top-left corner.
        origin: Vec2,
        /// Width and height.
        size: Vec2,
        /// Fill color.
        color: Rgba,
    },
    /// Thick line.
    Line {
        /// Start point.
        start: Vec2,
        /// End point.
        end: Vec2,
        /// Stroke thickness.
        thickness: f32,
        /// Stroke color.
        color: Rgba,
    },
}

/// A [`Canvas`] that records everything submitted to it.
///
/// Each `begin` clears the previous frame, so after a render pass the
/// recorder holds exactly one frame's calls in submission order.
#[derive(Debug, Default)]
pub struct DrawRecorder {
    calls: Vec<DrawCall>,
    open: bool,
    frames_completed: u64,
}

impl DrawRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls captured for the most recent frame.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Number of completed begin/end frames.
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    /// Whether a frame is currently open (begin without matching end).
    pub fn frame_open(&self) -> bool {
        self.open
    }

    /// Count of captured circles.
    pub fn circle_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle { .. }))
            .count()
    }

    /// Count of captured rectangles.
    pub fn rectangle_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Rectangle { .. }))
            .count()
    }

    /// Count of captured lines.
    pub fn line_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { .. }))
            .count()
    }
}

impl Canvas for DrawRecorder {
    fn begin(&mut self) {
        self.calls.clear();
        self.open = true;
    }

    fn end(&mut self) {
        if self.open {
            self.open = false;
            self.frames_completed += 1;
        }
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn rectangle(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.calls.push(DrawCall::Rectangle {
            origin,
            size,
            color,
        });
    }

    fn line(&mut self, start: Vec2, end: Vec2, thickness: f32, color: Rgba) {
        self.calls.push(DrawCall::Line {
            start,
            end,
            thickness,
            color,
        });
    }
}

/// One frame summary captured by headless runs.
#[derive(Debug, Serialize)]
pub struct FrameRecord<'a> {
    /// Frame index.
    pub frame: u64,
    /// Weather state display name.
    pub state: &'a str,
    /// Day fraction.
    pub time_of_day: f32,
    /// Filtered fog density.
    pub fog_density: f32,
    /// Live cloud count.
    pub clouds: usize,
    /// Live particle count.
    pub particles: usize,
    /// Live bolt count.
    pub bolts: usize,
    /// Combined flash intensity.
    pub flash: f32,
}

/// Run metadata written as the first line of a frame log.
#[derive(Debug, Serialize)]
pub struct RunHeader {
    /// Master RNG seed.
    pub seed: u64,
    /// Fixed per-frame timestep.
    pub dt: f32,
    /// Wall-clock start, RFC 3339.
    pub started_at: String,
}

impl RunHeader {
    /// Stamp a header with the current wall clock.
    pub fn new(seed: u64, dt: f32) -> Self {
        Self {
            seed,
            dt,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Append one serializable record as a JSON line.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn recorder_tracks_one_frame_at_a_time() {
        let mut recorder = DrawRecorder::new();
        recorder.begin();
        recorder.circle(Vec2::ZERO, 5.0, Rgba::rgb(1.0, 0.0, 0.0));
        recorder.line(Vec2::ZERO, Vec2::ONE, 2.0, Rgba::rgb(0.0, 1.0, 0.0));
        recorder.end();
        assert_eq!(recorder.calls().len(), 2);
        assert_eq!(recorder.circle_count(), 1);
        assert_eq!(recorder.line_count(), 1);
        assert_eq!(recorder.frames_completed(), 1);

        recorder.begin();
        recorder.end();
        assert!(recorder.calls().is_empty(), "begin clears the prior frame");
        assert_eq!(recorder.frames_completed(), 2);
    }

    #[test]
    fn jsonl_sink_writes_frame_records() {
        let path = std::env::temp_dir().join(format!(
            "stormscape-frames-{}.jsonl",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.write(&RunHeader::new(7, 0.016)).expect("header write");
        sink.write(&FrameRecord {
            frame: 0,
            state: "CLEAR",
            time_of_day: 0.5,
            fog_density: 0.06,
            clouds: 3,
            particles: 0,
            bolts: 0,
            flash: 0.0,
        })
        .expect("record write");

        let contents = fs::read_to_string(&path).expect("file readable");
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().contains("started_at"));
        assert!(lines.next().unwrap().contains("CLEAR"));
    }
}
