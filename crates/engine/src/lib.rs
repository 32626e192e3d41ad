#![warn(missing_docs)]
//! Weather simulation and procedural effects engine.
//!
//! A discrete weather state machine plus five coupled procedural generators
//! (precipitation, clouds, lightning, sun/moon/stars, fog) reacting to one
//! shared environment record and one shared clock. Rendering goes through
//! the abstract [`stormscape_core::Canvas`] capability only.

mod celestial;
mod clouds;
mod environment;
mod fog;
mod lightning;
mod particles;
mod scene;
mod weather;

pub use celestial::{CelestialSystem, Star};
pub use clouds::{Cloud, CloudSystem, Puff};
pub use environment::{Environment, WeatherState};
pub use fog::FogSystem;
pub use lightning::{Bolt, BoltSegment, LightningSystem};
pub use particles::{Particle, ParticleSystem, PrecipKind};
pub use scene::{SceneConfig, ScenePreset, WeatherScene};
pub use weather::WeatherSystem;
