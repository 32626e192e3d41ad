//! Abstract drawing capability consumed by the engine.
//!
//! The engine never talks to a GPU or window directly; it translates its
//! entities into calls on this trait. Back-ends (batched triangle renderer,
//! test recorder) live outside the engine crate.

use crate::Rgba;
use glam::Vec2;

/// One frame's worth of primitive submissions.
///
/// `begin`/`end` bracket a frame; all draw calls between them belong to that
/// frame and are submitted back-to-front in call order.
pub trait Canvas {
    /// Start a new frame batch.
    fn begin(&mut self);

    /// Flush the current frame batch.
    fn end(&mut self);

    /// Filled circle.
    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Axis-aligned filled rectangle with top-left `origin`.
    fn rectangle(&mut self, origin: Vec2, size: Vec2, color: Rgba);

    /// Thick line segment.
    fn line(&mut self, start: Vec2, end: Vec2, thickness: f32, color: Rgba);
}
