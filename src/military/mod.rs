//! Military units, the unit catalog, and per-faction management

pub mod manager;
pub mod unit;
pub mod unit_type;

pub use manager::{MaintenanceReport, MilitaryManager, MilitaryRegistry, MoveRefusal, RecruitRefusal};
pub use unit::{DamageOutcome, MilitaryUnit};
pub use unit_type::{abilities, catalog, UnitKind, UnitTypeSpec};
