use thiserror::Error;

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Campaign not found: {0}")]
    CampaignNotFound(String),

    #[error("Stage not found: {0}")]
    StageNotFound(String),

    #[error("Aircraft type not found: {0}")]
    AircraftNotFound(String),

    #[error("Save file version {found} is newer than supported version {supported}")]
    UnsupportedSaveVersion { found: u32, supported: u32 },

    #[error("Corrupt save data: {0}")]
    CorruptSave(String),

    #[error("Definition error: {0}")]
    Definition(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CampaignError>;
