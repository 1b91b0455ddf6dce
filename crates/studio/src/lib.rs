//! `p2f-studio` library crate.
//!
//! The composition root: owns the generation state machine, the project
//! library and the workflow, and exposes the operations the `p2f`
//! binary (or any other front end) drives. The binary entrypoint lives
//! in `main.rs`.

pub mod config;
pub mod error;
pub mod state;
pub mod studio;

pub use error::StudioError;
pub use state::{GenerationState, Phase};
pub use studio::{Studio, StudioOptions};
