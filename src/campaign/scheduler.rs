//! Campaign scheduler and tick driver
//!
//! [`Geoscape`] owns the complete mutable campaign state and drives it
//! forward: it advances the calendar, moves aircraft, activates stages
//! and stage sets, spawns and expires missions, and applies battle
//! results. The host calls [`Geoscape::advance`] once per frame with
//! real elapsed seconds; the engine scales that by the current time
//! lapse and only works in whole simulated seconds.
//!
//! Ordering within a tick is significant and fixed: time first, then
//! aircraft motion, then stage-set events, then mission expiry.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::aircraft::{AircraftStatus, MotionResult};
use crate::base::Base;
use crate::campaign::templates::CampaignDb;
use crate::condition::evaluate;
use crate::core::astronomy::is_night;
use crate::core::config::{
    ARRIVAL_DISTANCE, MAX_ACTIVE_MISSIONS, SECONDS_PER_DAY, TIME_LAPSE,
};
use crate::core::date::{month_name, Date};
use crate::core::error::{CampaignError, Result};
use crate::core::types::{AircraftRef, BaseId, PolarCoord};
use crate::economy::Economy;
use crate::geo::{TerrainKind, TerrainMask};
use crate::ui::{MessageKind, MessageLog};

/// Aircraft type commissioned into every newly founded base
const STARTER_CRAFT: &str = "craft_dropship";

/// What the map screen is currently asking the player to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapMode {
    #[default]
    None,
    Intercept,
    BaseAttack,
}

impl MapMode {
    pub fn to_i32(self) -> i32 {
        match self {
            MapMode::None => 0,
            MapMode::Intercept => 1,
            MapMode::BaseAttack => 2,
        }
    }

    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(MapMode::None),
            1 => Some(MapMode::Intercept),
            2 => Some(MapMode::BaseAttack),
            _ => None,
        }
    }
}

/// Runtime state of a stage, parallel to `CampaignDb::stages`
#[derive(Debug, Clone, Copy, Default)]
pub struct StageState {
    pub active: bool,
    pub start: Date,
}

/// Runtime state of a stage set, parallel to `CampaignDb::stage_sets`
#[derive(Debug, Clone, Copy, Default)]
pub struct SetState {
    pub active: bool,
    /// Missions completed from this set
    pub done: u32,
    /// Instances spawned from this set
    pub num: u32,
    pub start: Date,
    /// Next event instant; `None` while inactive
    pub event: Option<Date>,
}

/// A live, positioned, time-bounded mission on the geoscape
#[derive(Debug, Clone)]
pub struct ActiveMission {
    /// Index into `CampaignDb::missions`
    pub def: usize,
    /// Index into `CampaignDb::stage_sets` of the spawning set
    pub cause: usize,
    pub pos: PolarCoord,
    pub expire: Option<Date>,
    /// True while a dropship is close enough to land
    pub reachable: bool,
}

/// Everything that happened during a call into the scheduler
#[derive(Debug, Clone)]
pub enum CampaignEvent {
    DayPassed { day: u32 },
    StageActivated { stage: String },
    StageEnded { stage: String },
    MissionSpawned { mission: String, pos: PolarCoord, base_attack: bool },
    MissionExpired { mission: String, civilians: u32, credits_lost: i32 },
    MissionCompleted { mission: String, won: bool, reward: i32, recruits: u32 },
    AircraftArrived { craft: AircraftRef, at_home: bool },
    AircraftFuelExhausted { craft: AircraftRef },
    InterceptReady { craft: AircraftRef, mission: usize },
}

/// The complete mutable state of one running campaign
#[derive(Debug)]
pub struct CampaignState {
    pub date: Date,
    /// Sub-second accumulation between ticks
    pub timer: f64,
    /// Map view center, normalized
    pub center: [f32; 2],
    pub zoom: f32,
    pub economy: Economy,
    pub stage_states: Vec<StageState>,
    pub set_states: Vec<SetState>,
    pub missions: Vec<ActiveMission>,
    /// Mission currently offered for player engagement
    pub selected_mission: Option<usize>,
    /// Craft dispatched toward the selected mission
    pub intercept_craft: Option<AircraftRef>,
    pub bases: Vec<Base>,
    pub map_mode: MapMode,
    /// Index into the time-lapse ladder
    pub lapse: usize,
    pub messages: MessageLog,
    /// Script commands queued for the host to execute
    pub pending_commands: Vec<String>,
    pub rng: ChaCha8Rng,
}

impl CampaignState {
    fn fresh(db: &CampaignDb, campaign: usize, seed: u64) -> Self {
        let def = &db.campaigns[campaign];
        Self {
            date: def.date,
            timer: 0.0,
            center: [0.5, 0.5],
            zoom: 1.0,
            economy: Economy::new(&db.catalog, def.credits),
            stage_states: vec![StageState::default(); db.stages.len()],
            set_states: vec![SetState::default(); db.stage_sets.len()],
            missions: Vec::new(),
            selected_mission: None,
            intercept_craft: None,
            bases: Vec::new(),
            map_mode: MapMode::None,
            lapse: 0,
            messages: MessageLog::default(),
            pending_commands: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Remove an active mission, closing the gap and rebinding the
    /// selected-mission index across the shift.
    pub fn remove_mission(&mut self, index: usize) {
        if index >= self.missions.len() {
            tracing::warn!(index, "cannot remove mission, index out of range");
            return;
        }
        self.missions.remove(index);
        tracing::debug!(left = self.missions.len(), "missions left");

        match self.selected_mission {
            Some(sel) if sel == index => self.selected_mission = None,
            Some(sel) if sel > index => self.selected_mission = Some(sel - 1),
            _ => {}
        }
    }
}

/// The campaign engine: static definitions plus one running campaign
#[derive(Debug)]
pub struct Geoscape {
    pub db: CampaignDb,
    pub mask: TerrainMask,
    /// Index of the running campaign in `db.campaigns`
    pub campaign: usize,
    pub state: CampaignState,
}

impl Geoscape {
    /// Start a fresh campaign by name.
    pub fn new_game(
        db: CampaignDb,
        mask: TerrainMask,
        campaign: &str,
        seed: u64,
    ) -> Result<Self> {
        let campaign_idx = db
            .find_campaign(campaign)
            .ok_or_else(|| CampaignError::CampaignNotFound(campaign.to_string()))?;

        let mut state = CampaignState::fresh(&db, campaign_idx, seed);

        let def = &db.campaigns[campaign_idx];
        for (list, inventory) in [
            (&def.equipment, &mut state.economy.owned),
            (&def.market, &mut state.economy.market),
        ] {
            let Some(equipment) = db.equipment.iter().find(|e| &e.name == list) else {
                if !list.is_empty() {
                    tracing::warn!(equipment = %list, "unknown equipment list");
                }
                continue;
            };
            for (key, count) in &equipment.items {
                match db.catalog.find(key) {
                    Some(id) => inventory.add(id, *count),
                    None => tracing::warn!(item = %key, "unknown item in equipment list"),
                }
            }
        }

        let firststage = def.firststage.clone();
        let mut geo = Self {
            db,
            mask,
            campaign: campaign_idx,
            state,
        };
        let mut events = Vec::new();
        geo.activate_stage(&firststage, &mut events);
        tracing::info!(campaign = %campaign, "campaign started");
        Ok(geo)
    }

    // ------------------------------------------------------------------
    // time control

    pub fn time_scale(&self) -> u32 {
        TIME_LAPSE[self.state.lapse].scale
    }

    pub fn lapse_name(&self) -> &'static str {
        TIME_LAPSE[self.state.lapse].name
    }

    pub fn time_stop(&mut self) {
        self.state.lapse = 0;
    }

    /// Step down the acceleration ladder. Without a base, time always
    /// snaps back to the slowest setting.
    pub fn time_slow(&mut self) {
        if self.state.bases.is_empty() {
            self.time_stop();
        } else if self.state.lapse > 0 {
            self.state.lapse -= 1;
        }
    }

    pub fn time_fast(&mut self) {
        if self.state.bases.is_empty() {
            self.time_stop();
        } else if self.state.lapse < TIME_LAPSE.len() - 1 {
            self.state.lapse += 1;
        }
    }

    /// "year month day" display string for the map header
    pub fn format_date(&self) -> String {
        let (day, month) = self.state.date.day_in_month();
        format!("{} {} {}", self.state.date.year(), month_name(month), day)
    }

    pub fn is_night_at(&self, pos: PolarCoord) -> bool {
        is_night(pos, self.state.date)
    }

    /// Tactical map asset for an active mission, day/night variant
    /// picked from the mission's position and the current date
    pub fn mission_map(&self, mission: usize) -> Option<String> {
        let mis = self.state.missions.get(mission)?;
        let def = &self.db.missions[mis.def];
        def.map_asset(is_night(mis.pos, self.state.date))
    }

    // ------------------------------------------------------------------
    // bases and aircraft commands

    /// Found a base at `pos`. Fails on water; classifies the terrain and
    /// commissions the campaign's starting dropship.
    pub fn found_base(&mut self, name: &str, pos: PolarCoord) -> Option<BaseId> {
        let terrain = self.mask.terrain_at(pos);
        if terrain == TerrainKind::Water {
            self.state.messages.push(
                "Notice",
                "Could not set up your base at this location",
                MessageKind::Standard,
            );
            return None;
        }

        let id = BaseId(self.state.bases.len());
        let mut base = Base::new(id, name.to_string(), pos, terrain);
        if let Some(def) = self.db.find_aircraft(STARTER_CRAFT) {
            if base.commission_aircraft(def).is_some() {
                self.state.messages.push(
                    "Notice",
                    format!("You've got a new aircraft (a {}) in base {}", def.name, name),
                    MessageKind::Standard,
                );
            }
        } else {
            tracing::warn!(craft = STARTER_CRAFT, "starter aircraft type not defined");
        }
        self.state.bases.push(base);
        tracing::info!(base = %name, ?terrain, "base founded");
        Some(id)
    }

    /// Put the base's selected craft on station just outside the base.
    pub fn start_aircraft(&mut self, base: BaseId) {
        let Some(base) = self.state.bases.get_mut(base.0) else {
            return;
        };
        let base_pos = base.pos;
        let Some(air) = base.current_mut() else {
            tracing::debug!("no selected aircraft in this base");
            return;
        };
        if !air.status.in_motion() && air.status != AircraftStatus::Idle {
            air.pos = PolarCoord::new(base_pos.lon + 2.0, base_pos.lat + 2.0);
        }
        air.status = AircraftStatus::Idle;
        self.state
            .messages
            .push("Notice", "Aircraft started", MessageKind::Standard);
    }

    /// Send a craft toward the selected mission. Refused without a
    /// selected mission or with an empty team on board.
    pub fn dispatch_intercept(&mut self, craft: AircraftRef) -> bool {
        let Some(sel) = self.state.selected_mission else {
            tracing::debug!("no mission selected, cannot dispatch aircraft");
            return false;
        };
        let target = self.state.missions[sel].pos;
        let CampaignState {
            bases, messages, ..
        } = &mut self.state;
        let Some(base) = bases.get_mut(craft.base.0) else {
            return false;
        };
        let Some(air) = base.aircraft.get_mut(craft.slot) else {
            return false;
        };
        if air.team_size == 0 {
            messages.push("Notice", "Assign a team to the aircraft", MessageKind::Standard);
            return false;
        }
        air.dispatch_to(target);
        base.current_aircraft = Some(craft.slot);
        self.state.intercept_craft = Some(craft);
        true
    }

    /// Explicit return-to-base order for one craft
    pub fn order_return_to_base(&mut self, craft: AircraftRef) {
        if let Some(base) = self.state.bases.get_mut(craft.base.0) {
            let pos = base.pos;
            if let Some(air) = base.aircraft.get_mut(craft.slot) {
                air.return_to_base(pos);
            }
        }
    }

    pub fn select_mission(&mut self, index: usize) -> bool {
        if index >= self.state.missions.len() {
            return false;
        }
        self.state.selected_mission = Some(index);
        true
    }

    /// Clear the map interaction state. A craft dispatched toward a
    /// mission that no longer exists is sent home.
    pub fn reset_map_action(&mut self) {
        if !self.state.bases.is_empty() {
            self.state.map_mode = MapMode::None;
        }
        if let Some(craft) = self.state.intercept_craft.take() {
            if self.state.selected_mission.is_none() {
                if let Some(base) = self.state.bases.get_mut(craft.base.0) {
                    let pos = base.pos;
                    base.current_aircraft = Some(craft.slot);
                    if let Some(air) = base.aircraft.get_mut(craft.slot) {
                        air.return_to_base(pos);
                    }
                }
            }
        }
        self.state.selected_mission = None;
    }

    // ------------------------------------------------------------------
    // the tick

    /// Advance the simulation by `real_dt` real seconds, scaled by the
    /// current time lapse. Whole simulated seconds are processed in one
    /// pass: calendar, then aircraft, then stage-set events, then
    /// mission expiry.
    pub fn advance(&mut self, real_dt: f32) -> Vec<CampaignEvent> {
        let mut events = Vec::new();
        self.state.timer += real_dt as f64 * self.time_scale() as f64;

        while self.state.timer >= 1.0 {
            let dt = self.state.timer.floor() as u32;
            self.state.timer -= dt as f64;

            self.state.date.sec += dt;
            while self.state.date.sec >= SECONDS_PER_DAY {
                self.state.date.sec -= SECONDS_PER_DAY;
                self.state.date.day += 1;
                for base in &mut self.state.bases {
                    base.daily_upkeep();
                }
                events.push(CampaignEvent::DayPassed {
                    day: self.state.date.day,
                });
            }

            self.run_aircraft(dt, &mut events);
            self.check_events(&mut events);
            self.expire_missions(&mut events);
        }
        events
    }

    /// Move every aircraft and re-run the arrival check against the
    /// selected mission.
    fn run_aircraft(&mut self, dt: u32, events: &mut Vec<CampaignEvent>) {
        let selected = self.state.selected_mission;
        let CampaignState {
            bases,
            missions,
            intercept_craft,
            messages,
            ..
        } = &mut self.state;

        for (base_idx, base) in bases.iter_mut().enumerate() {
            for (slot, air) in base.aircraft.iter_mut().enumerate() {
                let craft = AircraftRef {
                    base: BaseId(base_idx),
                    slot,
                };
                match air.tick(dt) {
                    MotionResult::Arrived => {
                        events.push(CampaignEvent::AircraftArrived {
                            craft,
                            at_home: air.status == AircraftStatus::Home,
                        });
                    }
                    MotionResult::FuelExhausted => {
                        events.push(CampaignEvent::AircraftFuelExhausted { craft });
                    }
                    _ => {}
                }

                // arrival check against the selected mission
                let Some(sel) = selected else { continue };
                let Some(mis) = missions.get_mut(sel) else {
                    continue;
                };
                if air.pos.within_box(&mis.pos, ARRIVAL_DISTANCE) {
                    mis.reachable = true;
                    if air.status != AircraftStatus::Drop {
                        air.status = AircraftStatus::Drop;
                        if intercept_craft.is_none() {
                            *intercept_craft = Some(craft);
                        }
                        messages.push(
                            "Notice",
                            "Your dropship has reached the landing zone",
                            MessageKind::Standard,
                        );
                        events.push(CampaignEvent::InterceptReady { craft, mission: sel });
                    }
                } else {
                    mis.reachable = false;
                }
            }
        }
    }

    /// Fire every due stage-set event: spawn a mission, or run the
    /// set's terminal effects when it carries none.
    fn check_events(&mut self, events: &mut Vec<CampaignEvent>) {
        let now = self.state.date;
        for stage_idx in 0..self.db.stages.len() {
            if !self.state.stage_states[stage_idx].active {
                continue;
            }
            for set_idx in self.db.stage_range(stage_idx) {
                let due = {
                    let s = &self.state.set_states[set_idx];
                    s.active && s.event.map_or(false, |e| now.later_than(e))
                };
                if !due {
                    continue;
                }

                if self.db.stage_sets[set_idx].missions.is_empty() {
                    // terminal set: deactivate first so the effects run
                    // exactly once
                    let s = &mut self.state.set_states[set_idx];
                    s.active = false;
                    s.num += 1;
                    self.execute_set(set_idx, events);
                } else {
                    self.spawn_mission(set_idx, events);
                    if self.state.map_mode == MapMode::None {
                        self.state.map_mode = MapMode::Intercept;
                    }
                }
            }
        }
    }

    /// Spawn one mission instance from a stage set.
    fn spawn_mission(&mut self, set_idx: usize, events: &mut Vec<CampaignEvent>) {
        if self.state.missions.len() >= MAX_ACTIVE_MISSIONS {
            tracing::warn!("too many active missions");
            return;
        }

        let Geoscape {
            db, mask, state, ..
        } = self;
        let set_def = &db.stage_sets[set_idx];

        let pick = state.rng.gen_range(0..set_def.missions.len());
        let mission_idx = set_def.missions[pick];
        let mission_def = &db.missions[mission_idx];

        let expire = set_def
            .expire
            .is_set()
            .then(|| state.date.add(set_def.expire));

        let (pos, base_attack) = if mission_def.is_base_attack() && !state.bases.is_empty() {
            let target = state.rng.gen_range(0..state.bases.len());
            let base = &state.bases[target];
            state.messages.push(
                "Baseattack",
                format!("Your base {} is under attack.", base.name),
                MessageKind::BaseAttack,
            );
            state.pending_commands.push(format!("base_attack {}", target));
            (base.pos, true)
        } else {
            let pos = mask
                .find_position(mission_def.mask, &mut state.rng)
                .unwrap_or(mission_def.pos);
            state.messages.push(
                "Alien activity",
                "Alien activity has been reported.",
                MessageKind::TerrorSite,
            );
            (pos, false)
        };

        state.missions.push(ActiveMission {
            def: mission_idx,
            cause: set_idx,
            pos,
            expire,
            reachable: false,
        });
        events.push(CampaignEvent::MissionSpawned {
            mission: mission_def.id.clone(),
            pos,
            base_attack,
        });
        tracing::debug!(mission = %mission_def.id, set = %set_def.name, "mission spawned");

        // schedule the next instance, or retire the set at its cap
        let jitter = set_def.frame.random_within(&mut state.rng);
        let next_event = state.date.add(jitter);
        let s = &mut state.set_states[set_idx];
        s.num += 1;
        if set_def.number > 0 && s.num >= set_def.number {
            s.active = false;
        } else {
            s.event = Some(next_event);
        }

        // a fresh mission always interrupts time acceleration
        state.lapse = 0;
    }

    /// Expire overdue missions, charging the civilian-casualty penalty.
    fn expire_missions(&mut self, events: &mut Vec<CampaignEvent>) {
        let now = self.state.date;
        let mut index = 0;
        while index < self.state.missions.len() {
            let expired = self.state.missions[index]
                .expire
                .map_or(false, |e| now.later_than(e));
            if !expired {
                index += 1;
                continue;
            }

            let def_idx = self.state.missions[index].def;
            let Geoscape { db, state, .. } = self;
            let mission_def = &db.missions[def_idx];
            let lost = mission_def.civilians as i32 * mission_def.cr_civilian;
            state.economy.credits -= lost;
            state.messages.push(
                "Notice",
                format!(
                    "The mission expired and {} civilians died. You've lost {} $.",
                    mission_def.civilians, lost
                ),
                MessageKind::Standard,
            );
            events.push(CampaignEvent::MissionExpired {
                mission: mission_def.id.clone(),
                civilians: mission_def.civilians,
                credits_lost: lost,
            });
            state.remove_mission(index);
        }
    }

    // ------------------------------------------------------------------
    // stages and stage sets

    /// Activate a stage by name: bind its state, reset all its sets and
    /// immediately try to activate the eligible ones.
    pub fn activate_stage(&mut self, name: &str, events: &mut Vec<CampaignEvent>) -> bool {
        let Some(stage_idx) = self.db.find_stage(name) else {
            tracing::warn!(stage = %name, "cannot activate unknown stage");
            return false;
        };
        self.state.stage_states[stage_idx] = StageState {
            active: true,
            start: self.state.date,
        };
        for set_idx in self.db.stage_range(stage_idx) {
            self.state.set_states[set_idx] = SetState::default();
        }
        self.activate_eligible_sets(stage_idx);
        tracing::debug!(stage = %name, "stage activated");
        events.push(CampaignEvent::StageActivated {
            stage: name.to_string(),
        });
        true
    }

    /// Deactivate a stage by name.
    pub fn end_stage(&mut self, name: &str, events: &mut Vec<CampaignEvent>) {
        match self.db.find_stage(name) {
            Some(stage_idx) => {
                self.state.stage_states[stage_idx].active = false;
                events.push(CampaignEvent::StageEnded {
                    stage: name.to_string(),
                });
            }
            None => tracing::warn!(stage = %name, "cannot end unknown stage"),
        }
    }

    /// Activate every set of a stage whose `needed` condition holds
    /// against its siblings' completion quotas. Sets that ever spawned
    /// or finished anything are not reconsidered.
    fn activate_eligible_sets(&mut self, stage_idx: usize) {
        let Geoscape { db, state, .. } = self;
        let range = db.stage_range(stage_idx);

        for set_idx in range.clone() {
            {
                let s = &state.set_states[set_idx];
                if s.active || s.done > 0 || s.num > 0 {
                    continue;
                }
            }
            let def = &db.stage_sets[set_idx];

            let eligible = match &def.needed {
                None => true,
                Some(expr) => {
                    let sets = &db.stage_sets;
                    let states = &state.set_states;
                    let siblings = range.clone();
                    let result = evaluate(expr, |name| {
                        siblings
                            .clone()
                            .find(|&j| sets[j].name == name)
                            .map(|j| states[j].done >= sets[j].quota)
                    });
                    if let Some(error) = &result.error {
                        tracing::warn!(set = %def.name, expr = %expr, %error,
                            "stage set condition is malformed");
                    }
                    result.value
                }
            };
            if !eligible {
                continue;
            }

            let start = state.date.add(def.delay);
            let event = start.add(def.frame.random_within(&mut state.rng));
            let s = &mut state.set_states[set_idx];
            s.active = true;
            s.start = start;
            s.event = Some(event);
            tracing::debug!(set = %def.name, "stage set activated");
        }
    }

    /// Run a set's terminal effects: follow-on stage activation, stage
    /// end, queued commands, and a re-check of siblings in the owning
    /// stage.
    fn execute_set(&mut self, set_idx: usize, events: &mut Vec<CampaignEvent>) {
        let def = self.db.stage_sets[set_idx].clone();
        if let Some(next) = &def.nextstage {
            self.activate_stage(next, events);
        }
        if let Some(end) = &def.endstage {
            self.end_stage(end, events);
        }
        if let Some(commands) = &def.commands {
            self.state.pending_commands.push(commands.clone());
        }
        self.activate_eligible_sets(def.stage);
    }

    // ------------------------------------------------------------------
    // mission outcomes

    /// Apply the result of the battle fought at the selected mission:
    /// credits, recruits, quota bookkeeping on the causing set, and
    /// removal of the mission.
    pub fn apply_mission_result(&mut self, won: bool) -> Vec<CampaignEvent> {
        let mut events = Vec::new();
        let Some(sel) = self.state.selected_mission else {
            tracing::debug!("no mission selected, result discarded");
            return events;
        };

        let (def_idx, cause) = {
            let mis = &self.state.missions[sel];
            (mis.def, mis.cause)
        };
        let (mission_id, reward, recruits) = {
            let def = &self.db.missions[def_idx];
            let reward = if won {
                def.cr_win + def.cr_alien * def.aliens as i32
            } else {
                def.cr_win - def.cr_civilian * def.civilians as i32
            };
            (def.id.clone(), reward, if won { def.recruits } else { 0 })
        };

        self.state.economy.credits += reward;
        events.push(CampaignEvent::MissionCompleted {
            mission: mission_id,
            won,
            reward,
            recruits,
        });

        self.state.set_states[cause].done += 1;
        if self.state.set_states[cause].done >= self.db.stage_sets[cause].quota {
            self.execute_set(cause, &mut events);
        }

        self.state.remove_mission(sel);
        let text = if won {
            "You've won the battle"
        } else {
            "You've lost the battle"
        };
        self.state
            .messages
            .push("Notice", text, MessageKind::Standard);
        self.reset_map_action();
        events
    }

    /// Resolve the selected mission without a tactical battle. The
    /// dispatched craft must have reached the landing zone. Returns the
    /// outcome and the resulting campaign events.
    pub fn auto_resolve_battle(&mut self, difficulty: u32) -> Option<(bool, Vec<CampaignEvent>)> {
        let sel = self.state.selected_mission?;
        let craft = self.state.intercept_craft?;
        if !self.state.missions[sel].reachable {
            self.state.messages.push(
                "Notice",
                "Your dropship is not near the landing zone",
                MessageKind::Standard,
            );
            return None;
        }

        let team = self
            .state
            .bases
            .get(craft.base.0)
            .and_then(|b| b.aircraft.get(craft.slot))
            .map(|a| a.team_size)
            .unwrap_or(0);
        let aliens = self.db.missions[self.state.missions[sel].def].aliens;
        let won = aliens * difficulty <= team;
        Some((won, self.apply_mission_result(won)))
    }
}
