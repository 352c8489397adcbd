//! Background Tasks Module
//!
//! Optional background work a caller may run alongside the cache.
//!
//! # Tasks
//! - Sweep: frees expired entries at a configured interval

mod sweep;

pub use sweep::spawn_sweep_task;
