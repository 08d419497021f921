//! Live acquisition → localization pipeline
//!
//! - [`acquisition`]: a simulated headset publishing samples at its own rate
//! - [`orchestrator`]: the periodic task that localizes every source from the
//!   latest sample and publishes complete snapshots for the renderer

pub mod acquisition;
pub mod orchestrator;

pub use acquisition::*;
pub use orchestrator::*;
