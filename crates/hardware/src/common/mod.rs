//! Common utilities and types used throughout the simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Constants:** Register counts, instruction sizes, and scheduling defaults.
//! 2. **Memory Access:** Access widths for the debugger's sized reader.
//! 3. **Error Handling:** Trap representations and fatal simulator errors.

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access width definitions.
pub mod data;

/// Error types and trap definitions.
pub mod error;

pub use constants::{HEADLESS_BATCH_STEPS, NGPR};
pub use data::AccessWidth;
pub use error::{LoadError, SimError, Trap};
