//! # waterfill-core
//!
//! Water-filling power allocation for parallel Gaussian channels.
//!
//! Given per-channel gains, a total power budget, and a noise power, the
//! allocator computes the non-negative per-channel powers that maximize the
//! total capacity `sum_i log2(1 + g_i * p_i / N)` under the sum-power
//! constraint, together with the common water level. Channels too weak to
//! reach the surface are shut off. Typical consumers are MIMO eigenmode
//! loaders, OFDM tone allocators, and multi-user downlink schedulers that
//! already hold a channel estimate and need the optimal split.
//!
//! ## Example
//!
//! ```rust
//! use waterfill_core::prelude::*;
//!
//! let allocator = WaterfillAllocator::new(6.0, 1.0);
//! let solution = allocator.allocate(&[10.0, 5.0, 1.0]).unwrap();
//!
//! assert!((solution.total_allocated() - 6.0).abs() < 1e-9);
//! // Stronger channels sit deeper under the same surface.
//! assert!(solution.powers[0] >= solution.powers[1]);
//! assert!(solution.powers[1] >= solution.powers[2]);
//! ```

pub mod observe;
pub mod waterfilling;

// Re-export main types
pub use observe::{init_logging, LogConfig, LogFormat, LogLevel};
pub use waterfilling::{
    capacity_with_allocation, equal_power, waterfill, WaterfillAllocator, WaterfillError,
    WaterfillSolution,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::waterfilling::{
        waterfill, WaterfillAllocator, WaterfillError, WaterfillSolution,
    };
}
