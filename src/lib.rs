//! Metro Conflict - faction warfare core for a turn-based metro simulation

pub mod combat;
pub mod core;
pub mod diplomacy;
pub mod economy;
pub mod military;
pub mod territory;
