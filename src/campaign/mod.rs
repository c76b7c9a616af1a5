pub mod scheduler;
pub mod templates;

pub use scheduler::{ActiveMission, CampaignEvent, CampaignState, Geoscape, MapMode};
pub use templates::{CampaignDb, CampaignDef, MissionDef, StageDef, StageSetDef};
