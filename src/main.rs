//! Terra Vigil - headless campaign driver
//!
//! Loads a campaign definition file, founds a first base, then runs the
//! simulation at high time acceleration for a number of in-game days,
//! printing the notification log as it goes. Mostly useful for watching
//! a campaign script unfold without the game client.

use std::path::PathBuf;

use clap::Parser;

use terra_vigil::campaign::{CampaignDb, CampaignEvent, Geoscape};
use terra_vigil::core::error::Result;
use terra_vigil::core::types::PolarCoord;
use terra_vigil::geo::TerrainMask;
use terra_vigil::save::save_to_file;

#[derive(Parser, Debug)]
#[command(name = "terra-vigil", about = "Headless strategic campaign simulator")]
struct Args {
    /// Campaign definition file
    #[arg(long, default_value = "data/campaign.toml")]
    data: PathBuf,

    /// Campaign to start
    #[arg(long, default_value = "main")]
    campaign: String,

    /// RNG seed for a reproducible run
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// In-game days to simulate
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Write a save file after the run
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "terra_vigil=info".to_string());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let source = std::fs::read_to_string(&args.data)?;
    let db = CampaignDb::from_toml(&source)?;
    // an even green world; the client ships the real mask image
    let mask = TerrainMask::solid(64, 32, [128, 255, 0]);

    let mut geo = Geoscape::new_game(db, mask, &args.campaign, args.seed)?;
    geo.found_base("Alpha", PolarCoord::new(8.0, 49.0));
    geo.time_fast();
    geo.time_fast();
    geo.time_fast();
    geo.time_fast();

    let start_day = geo.state.date.day;
    while geo.state.date.day < start_day + args.days {
        let events = geo.advance(1.0);
        for event in &events {
            match event {
                CampaignEvent::MissionSpawned { mission, pos, .. } => {
                    println!(
                        "{}: mission {} at {:.0}:{:.0}",
                        geo.format_date(),
                        mission,
                        pos.lon,
                        pos.lat
                    );
                    // keep the clock running for an unattended run
                    geo.time_fast();
                    geo.time_fast();
                    geo.time_fast();
                    geo.time_fast();
                }
                CampaignEvent::MissionExpired { mission, .. } => {
                    println!("{}: mission {} expired", geo.format_date(), mission);
                }
                CampaignEvent::StageActivated { stage } => {
                    println!("{}: stage {} begins", geo.format_date(), stage);
                }
                CampaignEvent::StageEnded { stage } => {
                    println!("{}: stage {} over", geo.format_date(), stage);
                }
                _ => {}
            }
        }
        for message in geo.state.messages.drain() {
            println!("  [{}] {}", message.title, message.text);
        }
    }

    println!(
        "{}: {} missions active, {} credits left",
        geo.format_date(),
        geo.state.missions.len(),
        geo.state.economy.credits
    );

    if let Some(path) = args.save {
        save_to_file(&mut geo, &path, "headless run")?;
    }
    Ok(())
}
