//! Player bases and the aircraft they own
//!
//! Bases form an arena: each [`Base`] owns its aircraft by value and
//! aircraft point back with a plain [`BaseId`], so reconstruction after
//! loading a save never has to fix up pointers.

use crate::aircraft::{Aircraft, AircraftDef, AircraftStatus};
use crate::core::config::MAX_AIRCRAFT_PER_BASE;
use crate::core::types::{BaseId, PolarCoord};
use crate::geo::TerrainKind;

/// Fuel units restored per day to craft sitting at home
const DAILY_REFUEL: i32 = 3600 * 24;

/// A founded player base
#[derive(Debug, Clone)]
pub struct Base {
    pub id: BaseId,
    pub name: String,
    pub pos: PolarCoord,
    pub terrain: TerrainKind,
    pub aircraft: Vec<Aircraft>,
    /// Hangar slot of the currently selected craft
    pub current_aircraft: Option<usize>,
}

impl Base {
    pub fn new(id: BaseId, name: String, pos: PolarCoord, terrain: TerrainKind) -> Self {
        Self {
            id,
            name,
            pos,
            terrain,
            aircraft: Vec::new(),
            current_aircraft: None,
        }
    }

    /// Instantiate an aircraft type into this base. The first craft
    /// becomes the base's selected craft. Returns the hangar slot, or
    /// `None` when the hangars are full.
    pub fn commission_aircraft(&mut self, def: &AircraftDef) -> Option<usize> {
        if self.aircraft.len() >= MAX_AIRCRAFT_PER_BASE {
            tracing::warn!(base = %self.name, "no free hangar for new aircraft");
            return None;
        }
        let slot = self.aircraft.len();
        self.aircraft.push(Aircraft::from_def(def, self.id, self.pos));
        if self.current_aircraft.is_none() {
            self.current_aircraft = Some(slot);
        }
        tracing::debug!(base = %self.name, craft = %def.name, slot, "aircraft commissioned");
        Some(slot)
    }

    /// Daily upkeep: grounded craft refuel toward capacity
    pub fn daily_upkeep(&mut self) {
        for air in &mut self.aircraft {
            if matches!(air.status, AircraftStatus::Home | AircraftStatus::Refuel) {
                air.refuel(DAILY_REFUEL);
            }
        }
    }

    pub fn current(&self) -> Option<&Aircraft> {
        self.current_aircraft.and_then(|slot| self.aircraft.get(slot))
    }

    pub fn current_mut(&mut self) -> Option<&mut Aircraft> {
        self.current_aircraft
            .and_then(move |slot| self.aircraft.get_mut(slot))
    }
}
