//! Resource bookkeeping consumed by recruitment, maintenance and combat

pub mod resources;

pub use resources::{ResourceLedger, ResourcePool};
