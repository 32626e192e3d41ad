#![warn(missing_docs)]
//! Core primitives shared across the workspace.

mod color;
mod draw;
mod math;

pub use color::Rgba;
pub use draw::Canvas;
pub use math::{lerp, normalize, subsystem_rng};
