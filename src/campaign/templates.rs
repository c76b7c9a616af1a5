//! Static campaign definitions
//!
//! Campaigns, stages, stage sets, mission templates, aircraft types,
//! items and equipment lists are loaded once from a TOML file at
//! startup and never mutated afterwards. Loading resolves every name
//! reference to an arena index; unknown references are logged and
//! skipped so one bad entry never takes the whole database down.

use ahash::AHashMap;
use serde::Deserialize;

use crate::aircraft::AircraftDef;
use crate::core::date::Date;
use crate::core::error::{CampaignError, Result};
use crate::core::types::PolarCoord;
use crate::economy::{ItemCatalog, ItemDef};

/// A mission template
#[derive(Debug, Clone, Deserialize)]
pub struct MissionDef {
    pub id: String,
    /// Briefing text shown to the player
    #[serde(default)]
    pub text: String,
    /// Tactical map asset; `+name` selects an assembly, a leading `.`
    /// marks a base-defence map
    #[serde(default)]
    pub map: String,
    #[serde(default)]
    pub param: String,
    /// Nominal position, may be replaced by a terrain-mask lookup
    #[serde(default)]
    pub pos: PolarCoord,
    /// Mask color the spawn position is drawn from; black disables the
    /// lookup
    #[serde(default)]
    pub mask: [u8; 3],
    #[serde(default)]
    pub aliens: u32,
    #[serde(default)]
    pub civilians: u32,
    /// Soldiers recruited after winning
    #[serde(default)]
    pub recruits: u32,
    /// Flat credits reward on completion
    #[serde(default)]
    pub cr_win: i32,
    /// Credits per alien killed
    #[serde(default)]
    pub cr_alien: i32,
    /// Credits lost per civilian casualty
    #[serde(default)]
    pub cr_civilian: i32,
}

impl MissionDef {
    /// Base-attack templates target a random player base instead of a
    /// map position
    pub fn is_base_attack(&self) -> bool {
        self.id.starts_with("baseattack")
    }

    /// Asset path of the tactical map, with the day/night variant baked
    /// into the name
    pub fn map_asset(&self, night: bool) -> Option<String> {
        let variant = if night { 'n' } else { 'd' };
        if self.map.is_empty() || self.map.starts_with('.') {
            return None;
        }
        if let Some(assembly) = self.map.strip_prefix('+') {
            Some(format!("maps/{}{}.ump", assembly, variant))
        } else {
            Some(format!("maps/{}{}.bsp", self.map, variant))
        }
    }
}

/// A schedulable trigger within a stage
#[derive(Debug, Clone)]
pub struct StageSetDef {
    pub name: String,
    /// Index of the owning stage
    pub stage: usize,
    /// Condition over sibling set completion, if any
    pub needed: Option<String>,
    /// Wait after activation before the event window opens
    pub delay: Date,
    /// Random window added on top of the delay for each event
    pub frame: Date,
    /// Lifetime of spawned missions; zero means no expiry
    pub expire: Date,
    /// Cap on spawned instances; zero means unlimited
    pub number: u32,
    /// Completions needed before the set counts as done
    pub quota: u32,
    /// Candidate mission templates, as indices into the mission arena
    pub missions: Vec<usize>,
    pub nextstage: Option<String>,
    pub endstage: Option<String>,
    /// Script commands handed to the host when the set executes
    pub commands: Option<String>,
}

/// A named phase of the campaign owning a contiguous run of stage sets
#[derive(Debug, Clone)]
pub struct StageDef {
    pub name: String,
    /// First owned entry in the stage-set arena
    pub first: usize,
    pub count: usize,
}

/// Named list of starting item counts
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentDef {
    pub name: String,
    #[serde(default)]
    pub items: AHashMap<String, i32>,
}

/// A playable campaign
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignDef {
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub soldiers: u32,
    /// Equipment list granted to the player at start
    #[serde(default)]
    pub equipment: String,
    /// Equipment list seeding the market
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub credits: i32,
    #[serde(default)]
    pub date: Date,
    pub firststage: String,
}

#[derive(Debug, Deserialize)]
struct RawStageSet {
    name: String,
    #[serde(default)]
    needed: Option<String>,
    #[serde(default)]
    delay: Date,
    #[serde(default)]
    frame: Date,
    #[serde(default)]
    expire: Date,
    #[serde(default)]
    number: u32,
    #[serde(default)]
    quota: u32,
    #[serde(default)]
    missions: Vec<String>,
    #[serde(default)]
    nextstage: Option<String>,
    #[serde(default)]
    endstage: Option<String>,
    #[serde(default)]
    commands: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStage {
    name: String,
    #[serde(default)]
    sets: Vec<RawStageSet>,
}

#[derive(Debug, Deserialize)]
struct RawDatabase {
    #[serde(default)]
    items: Vec<ItemDef>,
    #[serde(default)]
    aircraft: Vec<AircraftDef>,
    #[serde(default)]
    missions: Vec<MissionDef>,
    #[serde(default)]
    equipment: Vec<EquipmentDef>,
    #[serde(default)]
    stages: Vec<RawStage>,
    #[serde(default)]
    campaigns: Vec<CampaignDef>,
}

/// The resolved definition database
#[derive(Debug, Clone, Default)]
pub struct CampaignDb {
    pub campaigns: Vec<CampaignDef>,
    pub stages: Vec<StageDef>,
    /// Flat arena of stage sets, addressed by `StageDef::first..+count`
    pub stage_sets: Vec<StageSetDef>,
    pub missions: Vec<MissionDef>,
    pub aircraft: Vec<AircraftDef>,
    pub equipment: Vec<EquipmentDef>,
    pub catalog: ItemCatalog,
}

impl CampaignDb {
    pub fn from_toml(source: &str) -> Result<Self> {
        let raw: RawDatabase = toml::from_str(source)?;

        let catalog = ItemCatalog::new(raw.items);

        let mut missions: Vec<MissionDef> = Vec::new();
        for mission in raw.missions {
            if missions.iter().any(|m| m.id == mission.id) {
                tracing::warn!(mission = %mission.id, "duplicate mission ignored");
                continue;
            }
            missions.push(mission);
        }
        let mission_index: AHashMap<&str, usize> = missions
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.as_str(), i))
            .collect();

        let mut stages = Vec::new();
        let mut stage_sets = Vec::new();
        for stage in raw.stages {
            if stages.iter().any(|s: &StageDef| s.name == stage.name) {
                tracing::warn!(stage = %stage.name, "duplicate stage ignored");
                continue;
            }
            let first = stage_sets.len();
            let stage_idx = stages.len();
            for set in stage.sets {
                let mut resolved = Vec::new();
                for name in &set.missions {
                    match mission_index.get(name.as_str()) {
                        Some(&idx) => resolved.push(idx),
                        None => {
                            tracing::warn!(
                                set = %set.name,
                                mission = %name,
                                "unknown mission in stage set ignored"
                            );
                        }
                    }
                }
                stage_sets.push(StageSetDef {
                    name: set.name,
                    stage: stage_idx,
                    needed: set.needed,
                    delay: set.delay,
                    frame: set.frame,
                    expire: set.expire,
                    number: set.number,
                    quota: set.quota,
                    missions: resolved,
                    nextstage: set.nextstage,
                    endstage: set.endstage,
                    commands: set.commands,
                });
            }
            stages.push(StageDef {
                name: stage.name,
                first,
                count: stage_sets.len() - first,
            });
        }

        let db = Self {
            campaigns: raw.campaigns,
            stages,
            stage_sets,
            missions,
            aircraft: raw.aircraft,
            equipment: raw.equipment,
            catalog,
        };

        for campaign in &db.campaigns {
            if db.find_stage(&campaign.firststage).is_none() {
                return Err(CampaignError::StageNotFound(format!(
                    "campaign '{}' starts at unknown stage '{}'",
                    campaign.name, campaign.firststage
                )));
            }
        }
        Ok(db)
    }

    pub fn find_campaign(&self, name: &str) -> Option<usize> {
        self.campaigns.iter().position(|c| c.name == name)
    }

    pub fn find_stage(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.name == name)
    }

    /// Global stage-set arena index for a set name
    pub fn find_stage_set(&self, name: &str) -> Option<usize> {
        self.stage_sets.iter().position(|s| s.name == name)
    }

    pub fn find_mission(&self, id: &str) -> Option<usize> {
        self.missions.iter().position(|m| m.id == id)
    }

    pub fn find_aircraft(&self, id: &str) -> Option<&AircraftDef> {
        self.aircraft.iter().find(|a| a.id == id)
    }

    pub fn find_equipment(&self, name: &str) -> Option<&EquipmentDef> {
        self.equipment.iter().find(|e| e.name == name)
    }

    /// Stage-set arena slots owned by a stage
    pub fn stage_range(&self, stage: usize) -> std::ops::Range<usize> {
        let def = &self.stages[stage];
        def.first..def.first + def.count
    }
}
