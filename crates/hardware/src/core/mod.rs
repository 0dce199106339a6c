//! Hart abstraction and the bundled fetch-only hart.
//!
//! This module defines the boundary between the scheduler and the per-core
//! execution engine. It includes:
//! 1. **Hart Interface:** The step/inspect contract every simulated core satisfies.
//! 2. **Architectural State:** The general-purpose register file.
//! 3. **Fetch Hart:** A minimal core that walks its instruction stream without
//!    interpreting it, used when no execution engine is plugged in.

/// Architecture-specific components (register files).
pub mod arch;

/// Fetch-only hart implementation.
pub mod fetch;

/// The hart trait implemented by every simulated core.
pub mod hart;

pub use self::fetch::FetchHart;
pub use self::hart::Hart;
