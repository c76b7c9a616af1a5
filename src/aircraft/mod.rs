//! Aircraft state machine and motion model
//!
//! Aircraft live in base hangars and fly precomputed great-circle
//! routes across the geoscape. Motion is purely time-driven: covered
//! distance is `speed * elapsed / 3600` with speed in degrees per hour,
//! and position interpolates linearly between the two route points
//! bounding that distance.

use serde::{Deserialize, Serialize};

use crate::core::types::{BaseId, PolarCoord};
use crate::geo::Route;

/// Role of an aircraft type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AircraftType {
    Transporter,
    Interceptor,
    Ufo,
}

/// What an aircraft is currently doing.
///
/// Discriminant order is meaningful: everything above `Idle` is in
/// motion along a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum AircraftStatus {
    None = 0,
    Home = 1,
    Refuel = 2,
    Idle = 3,
    Transit = 4,
    Drop = 5,
    Intercept = 6,
    Transport = 7,
    Returning = 8,
}

impl AircraftStatus {
    /// True when the craft is tracking a route
    pub fn in_motion(self) -> bool {
        self as u8 > AircraftStatus::Idle as u8
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(AircraftStatus::None),
            1 => Some(AircraftStatus::Home),
            2 => Some(AircraftStatus::Refuel),
            3 => Some(AircraftStatus::Idle),
            4 => Some(AircraftStatus::Transit),
            5 => Some(AircraftStatus::Drop),
            6 => Some(AircraftStatus::Intercept),
            7 => Some(AircraftStatus::Transport),
            8 => Some(AircraftStatus::Returning),
            _ => None,
        }
    }

    /// User-facing status line
    pub fn display_name(self) -> &'static str {
        match self {
            AircraftStatus::None => "Nothing",
            AircraftStatus::Home => "At homebase",
            AircraftStatus::Refuel => "Refuel",
            AircraftStatus::Idle => "Idle",
            AircraftStatus::Transit => "On transit",
            AircraftStatus::Drop => "Ready for drop down",
            AircraftStatus::Intercept => "On interception",
            AircraftStatus::Transport => "Transport mission",
            AircraftStatus::Returning => "Returning to homebase",
        }
    }
}

/// Static aircraft type definition, loaded once from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct AircraftDef {
    /// Internal key referenced by scripts and saves
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AircraftType,
    /// Degrees of arc per hour
    pub speed: f32,
    /// Fuel capacity, one unit burns per flown second
    pub fuel: i32,
    /// Soldier seats
    #[serde(default)]
    pub seats: u32,
}

/// Result of one motion tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionResult {
    /// Not moving (hangar or idle on the geoscape)
    Parked,
    Moving,
    /// Reached the end of the route this tick
    Arrived,
    /// Ran dry this tick; status forced to `Returning`
    FuelExhausted,
}

/// A live aircraft stationed at a base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aircraft {
    /// Key of the [`AircraftDef`] this was built from
    pub type_id: String,
    pub name: String,
    pub kind: AircraftType,
    pub status: AircraftStatus,
    pub speed: f32,
    pub fuel: i32,
    pub fuel_max: i32,
    pub seats: u32,
    /// Soldiers currently on board
    pub team_size: u32,
    pub pos: PolarCoord,
    pub route: Route,
    /// Seconds en route
    pub time: i32,
    /// Index of the active route segment
    pub point: usize,
    pub home_base: BaseId,
}

impl Aircraft {
    pub fn from_def(def: &AircraftDef, home_base: BaseId, pos: PolarCoord) -> Self {
        Self {
            type_id: def.id.clone(),
            name: def.name.clone(),
            kind: def.kind,
            status: AircraftStatus::Home,
            speed: def.speed,
            fuel: def.fuel,
            fuel_max: def.fuel,
            seats: def.seats,
            team_size: 0,
            pos,
            route: Route::default(),
            time: 0,
            point: 0,
            home_base,
        }
    }

    /// Advance the craft by `dt` simulated seconds.
    ///
    /// Fuel burns while flying and while idling away from base. Running
    /// dry forces `Returning` status but deliberately keeps the current
    /// route: only an explicit [`Aircraft::return_to_base`] recomputes
    /// the path home.
    pub fn tick(&mut self, dt: u32) -> MotionResult {
        if self.status.in_motion() {
            self.time += dt as i32;
            self.fuel -= dt as i32;
            let dist = self.speed * self.time as f32 / 3600.0;

            if dist >= self.route.length() {
                self.pos = self.route.end();
                self.status = if self.status == AircraftStatus::Returning {
                    AircraftStatus::Home
                } else {
                    AircraftStatus::Idle
                };
                self.time = 0;
                self.point = 0;
                return MotionResult::Arrived;
            }

            let exhausted = self.fuel <= 0 && self.status != AircraftStatus::Returning;
            if exhausted {
                self.status = AircraftStatus::Returning;
            }

            let frac = dist / self.route.dist;
            // rounding near the final waypoint must not index past it
            let p = (frac.floor() as usize).min(self.route.points.len() - 2);
            let frac = frac - p as f32;
            self.point = p;
            let a = self.route.points[p];
            let b = self.route.points[p + 1];
            self.pos = PolarCoord::new(
                (1.0 - frac) * a.lon + frac * b.lon,
                (1.0 - frac) * a.lat + frac * b.lat,
            );

            if exhausted {
                MotionResult::FuelExhausted
            } else {
                MotionResult::Moving
            }
        } else if self.status == AircraftStatus::Idle {
            // deployed but stationary still burns fuel
            self.fuel -= dt as i32;
            MotionResult::Parked
        } else {
            MotionResult::Parked
        }
    }

    /// Order the craft onto a route toward `target` for a mission
    pub fn dispatch_to(&mut self, target: PolarCoord) {
        self.route = Route::calculate(self.pos, target);
        self.status = AircraftStatus::Transit;
        self.time = 0;
        self.point = 0;
    }

    /// Recompute the route back to `base_pos` and head home. No-op when
    /// already at home.
    pub fn return_to_base(&mut self, base_pos: PolarCoord) {
        if self.status == AircraftStatus::Home {
            return;
        }
        self.route = Route::calculate(self.pos, base_pos);
        self.status = AircraftStatus::Returning;
        self.time = 0;
        self.point = 0;
    }

    /// Top up fuel while the craft sits at home
    pub fn refuel(&mut self, amount: i32) {
        if self.status == AircraftStatus::Home || self.status == AircraftStatus::Refuel {
            self.fuel = (self.fuel + amount).min(self.fuel_max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_def() -> AircraftDef {
        AircraftDef {
            id: "craft_dropship".into(),
            name: "Firebird".into(),
            kind: AircraftType::Transporter,
            speed: 90.0,
            fuel: 100_000,
            seats: 8,
        }
    }

    fn craft_on_route(fuel: i32) -> Aircraft {
        let mut air = Aircraft::from_def(&test_def(), BaseId(0), PolarCoord::new(0.0, 0.0));
        air.fuel = fuel;
        air.fuel_max = fuel;
        air.dispatch_to(PolarCoord::new(90.0, 0.0));
        air
    }

    #[test]
    fn test_covered_distance_is_monotonic() {
        let mut air = craft_on_route(100_000);
        let mut last = 0.0;
        loop {
            match air.tick(600) {
                MotionResult::Moving => {
                    let dist = air.speed * air.time as f32 / 3600.0;
                    assert!(dist >= last);
                    last = dist;
                }
                MotionResult::Arrived => break,
                other => panic!("unexpected motion result {:?}", other),
            }
        }
    }

    #[test]
    fn test_arrival_transitions_exactly_once() {
        // 90 degrees at 90 deg/h is one hour of flight
        let mut air = craft_on_route(100_000);
        let mut arrivals = 0;
        for _ in 0..30 {
            if air.tick(600) == MotionResult::Arrived {
                arrivals += 1;
            }
        }
        assert_eq!(arrivals, 1);
        assert_eq!(air.status, AircraftStatus::Idle);
        assert_eq!(air.time, 0);
        assert_eq!(air.point, 0);
        assert!(air.pos.within_box(&PolarCoord::new(90.0, 0.0), 0.01));
    }

    #[test]
    fn test_returning_arrival_lands_home() {
        let mut air = craft_on_route(100_000);
        air.status = AircraftStatus::Returning;
        while air.tick(600) != MotionResult::Arrived {}
        assert_eq!(air.status, AircraftStatus::Home);
    }

    #[test]
    fn test_fuel_exhaustion_forces_return() {
        // 10 fuel burns out long before the hour of flight is over
        let mut air = craft_on_route(10);
        let result = air.tick(3600 / 2);
        assert_eq!(result, MotionResult::FuelExhausted);
        assert_eq!(air.status, AircraftStatus::Returning);
        // the old route is intentionally untouched
        assert!(air.route.end().within_box(&PolarCoord::new(90.0, 0.0), 0.01));
    }

    #[test]
    fn test_idle_burns_fuel() {
        let mut air = Aircraft::from_def(&test_def(), BaseId(0), PolarCoord::new(0.0, 0.0));
        air.status = AircraftStatus::Idle;
        let before = air.fuel;
        assert_eq!(air.tick(60), MotionResult::Parked);
        assert_eq!(air.fuel, before - 60);
    }

    #[test]
    fn test_home_does_not_burn_fuel() {
        let mut air = Aircraft::from_def(&test_def(), BaseId(0), PolarCoord::new(0.0, 0.0));
        let before = air.fuel;
        assert_eq!(air.tick(60), MotionResult::Parked);
        assert_eq!(air.fuel, before);
    }

    #[test]
    fn test_return_to_base_is_noop_at_home() {
        let mut air = Aircraft::from_def(&test_def(), BaseId(0), PolarCoord::new(0.0, 0.0));
        air.return_to_base(PolarCoord::new(10.0, 10.0));
        assert_eq!(air.status, AircraftStatus::Home);
        assert!(air.route.is_empty());
    }

    #[test]
    fn test_return_to_base_recomputes_route() {
        let mut air = craft_on_route(100_000);
        air.tick(600);
        air.return_to_base(PolarCoord::new(0.0, 0.0));
        assert_eq!(air.status, AircraftStatus::Returning);
        assert_eq!(air.time, 0);
        assert!(air.route.end().within_box(&PolarCoord::new(0.0, 0.0), 0.01));
    }

    #[test]
    fn test_status_ordering() {
        assert!(!AircraftStatus::Home.in_motion());
        assert!(!AircraftStatus::Idle.in_motion());
        assert!(AircraftStatus::Transit.in_motion());
        assert!(AircraftStatus::Returning.in_motion());
    }

    #[test]
    fn test_status_round_trips_through_u8() {
        for v in 0..=8u8 {
            let status = AircraftStatus::from_u8(v).unwrap();
            assert_eq!(status as u8, v);
        }
        assert!(AircraftStatus::from_u8(9).is_none());
    }
}
