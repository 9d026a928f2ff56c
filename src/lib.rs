//! Interactive terminal starfield.
//!
//! The simulation lives in [`field`] and only emits [`draw::DrawCommand`]s;
//! [`canvas`] and [`terminal`] turn those into half-block ANSI output, and
//! [`effects`] ties everything to a crossterm event loop.

pub mod canvas;
pub mod config;
pub mod constants;
pub mod draw;
pub mod effects;
pub mod error;
pub mod field;
pub mod palette;
pub mod scheduler;
pub mod terminal;
pub mod theme;
pub mod trail;
pub mod typewriter;

pub use config::Config;
pub use error::{Result, StarfieldError};
pub use field::ParticleField;
