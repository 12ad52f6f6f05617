pub mod config;
pub mod error;
pub mod types;

pub use config::{config, CombatConfig, FactionProfile};
pub use error::{ConflictError, Result};
pub use types::{FactionId, ResourceType, StationId, Turn, UnitId};
