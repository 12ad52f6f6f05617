//! Applying battle casualties back onto unit rosters

use serde::Serialize;

use crate::core::config::CombatConfig;
use crate::core::types::{StationId, UnitId};
use crate::military::{DamageOutcome, MilitaryManager};

/// What casualty application did to one side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CasualtyReport {
    pub destroyed: Vec<UnitId>,
    pub damaged: Vec<UnitId>,
}

/// Spread `casualties` evenly over the active units at `station`
///
/// The remainder goes one each to the first units in roster order. Each
/// unit's share becomes `min(100, share * factor)` health damage; survivors
/// lose morale. Destroyed units are pruned afterwards.
pub fn apply_casualties(
    manager: &mut MilitaryManager,
    station: &StationId,
    casualties: u32,
    config: &CombatConfig,
) -> CasualtyReport {
    let mut report = CasualtyReport::default();
    if casualties == 0 {
        return report;
    }

    // Ids first, so the roster is never mutated while being walked
    let ids = manager.unit_ids_at(station);
    if ids.is_empty() {
        return report;
    }

    let count = ids.len() as u32;
    let per_unit = casualties / count;
    let remainder = casualties % count;

    for (i, id) in ids.into_iter().enumerate() {
        let share = per_unit + u32::from((i as u32) < remainder);
        let damage = share.saturating_mul(config.casualty_health_factor).min(100);
        let Some(unit) = manager.unit_mut(id) else {
            continue;
        };

        match unit.take_damage(damage) {
            DamageOutcome::Destroyed => {
                tracing::info!("{} {} destroyed at {}", unit.kind, id, station);
                report.destroyed.push(id);
            }
            DamageOutcome::Survived => {
                unit.modify_morale(-(config.survivor_morale_penalty as i64));
                tracing::debug!("{} {} damaged at {}: {}% health", unit.kind, id, station, unit.health);
                report.damaged.push(id);
            }
        }
    }

    manager.remove_destroyed();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::military::{MilitaryUnit, UnitKind};

    fn garrison(kinds: &[UnitKind]) -> MilitaryManager {
        let mut manager = MilitaryManager::new("Red Line");
        for kind in kinds {
            manager.enlist(MilitaryUnit::new(
                UnitId(0),
                *kind,
                "Red Line".into(),
                "Okhotny Ryad".into(),
            ));
        }
        manager
    }

    #[test]
    fn test_remainder_goes_to_first_units() {
        let mut manager = garrison(&[UnitKind::Conscripts, UnitKind::Conscripts, UnitKind::Conscripts]);
        let report = apply_casualties(
            &mut manager,
            &"Okhotny Ryad".into(),
            5,
            &CombatConfig::default(),
        );
        // Shares 2, 2, 1
        assert!(report.destroyed.is_empty());
        let health: Vec<u32> = manager.units().iter().map(|u| u.health).collect();
        assert_eq!(health, vec![80, 80, 90]);
        assert!(manager.units().iter().all(|u| u.morale == 90));
    }

    #[test]
    fn test_large_share_destroys_outright() {
        let mut manager = garrison(&[UnitKind::Rangers, UnitKind::Militia]);
        let report = apply_casualties(
            &mut manager,
            &"Okhotny Ryad".into(),
            21,
            &CombatConfig::default(),
        );
        // Shares 11 and 10, both at least 100 health
        assert_eq!(report.destroyed, vec![UnitId(1), UnitId(2)]);
        assert!(manager.units().is_empty());
    }

    #[test]
    fn test_zero_casualties_leave_units_alone() {
        let mut manager = garrison(&[UnitKind::Militia]);
        let report = apply_casualties(&mut manager, &"Okhotny Ryad".into(), 0, &CombatConfig::default());
        assert_eq!(report, CasualtyReport::default());
        assert_eq!(manager.units()[0].morale, 100);
    }

    #[test]
    fn test_zero_share_survivors_still_shaken() {
        let mut manager = garrison(&[UnitKind::Militia, UnitKind::Militia]);
        apply_casualties(&mut manager, &"Okhotny Ryad".into(), 1, &CombatConfig::default());
        let units = manager.units();
        assert_eq!((units[0].health, units[0].morale), (90, 90));
        assert_eq!((units[1].health, units[1].morale), (100, 90));
    }

    #[test]
    fn test_other_stations_untouched() {
        let mut manager = garrison(&[UnitKind::Militia]);
        apply_casualties(&mut manager, &"Teatralnaya".into(), 50, &CombatConfig::default());
        assert_eq!(manager.units()[0].health, 100);
    }
}
