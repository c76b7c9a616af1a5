//! Versioned binary save files
//!
//! The save format is a hand-rolled little-endian stream with a fixed
//! field order; this module is the single place that order lives, for
//! both writing and reading. Every entity is written by one routine
//! that takes the target version as a parameter and branches explicitly
//! where the encoding changed between versions.
//!
//! Layout: version marker byte (0 = versioned), version, comment,
//! campaign name, date, map view, bases (with their aircraft), research
//! block, credits, owned and market item counts, stage blocks
//! terminated by an empty name, active missions, map-interaction mode
//! (version 2 and up).
//!
//! Loading tolerates template drift: names that no longer resolve are
//! warned about and their records are consumed into scratch state so
//! the read cursor stays aligned for the fields that follow.

use std::path::Path;

use rand::Rng;

use crate::aircraft::{Aircraft, AircraftStatus};
use crate::base::Base;
use crate::campaign::scheduler::{ActiveMission, CampaignState, Geoscape, MapMode, SetState, StageState};
use crate::core::date::Date;
use crate::core::error::{CampaignError, Result};
use crate::core::types::{BaseId, PolarCoord};
use crate::geo::{Route, TerrainKind};
use crate::ui::MessageKind;

/// Current save format version.
///
/// Version history: 0 wrote economy counts as single bytes and had no
/// loose-ammo tracking; 1 widened counts to 32 bits and added the loose
/// byte; 2 appended the map-interaction mode.
pub const SAVE_FILE_VERSION: u32 = 2;

// ----------------------------------------------------------------------
// byte-level codec

/// Little-endian append-only byte sink
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// NUL-terminated string
    pub fn write_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
    }

    pub fn write_date(&mut self, d: Date) {
        self.write_u32(d.day);
        self.write_u32(d.sec);
    }
}

/// Cursor over a save buffer; every read fails cleanly at end of data
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Rewind to the start (legacy unversioned files re-read byte 0)
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(CampaignError::CorruptSave(
                "unexpected end of data".to_string(),
            ));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    /// NUL-terminated string, lossily decoded
    pub fn read_str(&mut self) -> Result<String> {
        let start = self.pos;
        while self.pos < self.buf.len() && self.buf[self.pos] != 0 {
            self.pos += 1;
        }
        if self.pos >= self.buf.len() {
            return Err(CampaignError::CorruptSave(
                "unterminated string".to_string(),
            ));
        }
        let s = String::from_utf8_lossy(&self.buf[start..self.pos]).into_owned();
        self.pos += 1;
        Ok(s)
    }

    pub fn read_date(&mut self) -> Result<Date> {
        let day = self.read_u32()?;
        let sec = self.read_u32()?;
        Ok(Date { day, sec })
    }
}

// ----------------------------------------------------------------------
// aircraft and base records

fn write_route(w: &mut ByteWriter, route: &Route) {
    w.write_u16(route.points.len() as u16);
    w.write_f32(route.dist);
    for p in &route.points {
        w.write_f32(p.lon);
        w.write_f32(p.lat);
    }
}

fn read_route(r: &mut ByteReader) -> Result<Route> {
    let n = r.read_u16()? as usize;
    let dist = r.read_f32()?;
    let mut points = Vec::with_capacity(n);
    for _ in 0..n {
        let lon = r.read_f32()?;
        let lat = r.read_f32()?;
        points.push(PolarCoord::new(lon, lat));
    }
    Ok(Route { points, dist })
}

fn write_aircraft(w: &mut ByteWriter, air: &Aircraft, _version: u32) {
    w.write_str(&air.type_id);
    w.write_f32(air.pos.lon);
    w.write_f32(air.pos.lat);
    w.write_u8(air.status as u8);
    w.write_i32(air.fuel);
    w.write_u32(air.team_size);
    w.write_u32(air.point as u32);
    w.write_i32(air.time);
    write_route(w, &air.route);
}

/// Read one aircraft record. Returns `None` (after consuming the whole
/// record) when the aircraft type no longer exists.
fn read_aircraft(
    r: &mut ByteReader,
    geo_db: &crate::campaign::CampaignDb,
    home_base: BaseId,
    base_pos: PolarCoord,
    _version: u32,
) -> Result<Option<Aircraft>> {
    let type_id = r.read_str()?;
    let lon = r.read_f32()?;
    let lat = r.read_f32()?;
    let status = r.read_u8()?;
    let fuel = r.read_i32()?;
    let team_size = r.read_u32()?;
    let point = r.read_u32()? as usize;
    let time = r.read_i32()?;
    let route = read_route(r)?;

    let Some(def) = geo_db.find_aircraft(&type_id) else {
        tracing::warn!(craft = %type_id, "save references unknown aircraft type, record dropped");
        return Ok(None);
    };
    let status = AircraftStatus::from_u8(status).ok_or_else(|| {
        CampaignError::CorruptSave(format!("invalid aircraft status {}", status))
    })?;

    let mut air = Aircraft::from_def(def, home_base, base_pos);
    air.pos = PolarCoord::new(lon, lat);
    air.status = status;
    air.fuel = fuel;
    air.team_size = team_size;
    air.point = point;
    air.time = time;
    air.route = route;
    Ok(Some(air))
}

fn terrain_to_u8(t: TerrainKind) -> u8 {
    match t {
        TerrainKind::Water => 0,
        TerrainKind::Arctic => 1,
        TerrainKind::Desert => 2,
        TerrainKind::Grassland => 3,
    }
}

fn terrain_from_u8(v: u8) -> Result<TerrainKind> {
    match v {
        0 => Ok(TerrainKind::Water),
        1 => Ok(TerrainKind::Arctic),
        2 => Ok(TerrainKind::Desert),
        3 => Ok(TerrainKind::Grassland),
        _ => Err(CampaignError::CorruptSave(format!(
            "invalid terrain kind {}",
            v
        ))),
    }
}

fn write_bases(w: &mut ByteWriter, bases: &[Base], version: u32) {
    w.write_u8(bases.len() as u8);
    for base in bases {
        w.write_str(&base.name);
        w.write_f32(base.pos.lon);
        w.write_f32(base.pos.lat);
        w.write_u8(terrain_to_u8(base.terrain));
        w.write_u8(match base.current_aircraft {
            Some(slot) => slot as u8,
            None => u8::MAX,
        });
        w.write_u8(base.aircraft.len() as u8);
        for air in &base.aircraft {
            write_aircraft(w, air, version);
        }
    }
}

fn read_bases(
    r: &mut ByteReader,
    db: &crate::campaign::CampaignDb,
    version: u32,
) -> Result<Vec<Base>> {
    let count = r.read_u8()? as usize;
    let mut bases = Vec::with_capacity(count);
    for i in 0..count {
        let name = r.read_str()?;
        let lon = r.read_f32()?;
        let lat = r.read_f32()?;
        let terrain = terrain_from_u8(r.read_u8()?)?;
        let current = r.read_u8()?;
        let pos = PolarCoord::new(lon, lat);

        let id = BaseId(i);
        let mut base = Base::new(id, name, pos, terrain);
        let craft_count = r.read_u8()? as usize;
        for _ in 0..craft_count {
            if let Some(air) = read_aircraft(r, db, id, pos, version)? {
                base.aircraft.push(air);
            }
        }
        base.current_aircraft = match current {
            u8::MAX => None,
            slot if (slot as usize) < base.aircraft.len() => Some(slot as usize),
            _ => None,
        };
        bases.push(base);
    }
    Ok(bases)
}

// ----------------------------------------------------------------------
// whole-campaign save

/// Serialize the running campaign at `version`.
pub fn write_save(geo: &Geoscape, comment: &str, version: u32) -> Vec<u8> {
    let mut w = ByteWriter::new();
    let state = &geo.state;

    // prefix and version
    w.write_u8(0);
    w.write_u32(version);

    w.write_str(comment);
    w.write_str(&geo.db.campaigns[geo.campaign].name);

    w.write_date(state.date);

    w.write_f32(state.center[0]);
    w.write_f32(state.center[1]);
    w.write_f32(state.zoom);

    write_bases(&mut w, &state.bases, version);

    // research tree block, reserved for the research collaborator
    w.write_u8(0);

    w.write_i32(state.economy.credits);

    // owned stock
    for (i, count) in state.economy.owned.counts.iter().enumerate() {
        if version == 0 {
            w.write_u8((*count).clamp(0, u8::MAX as i32) as u8);
        } else {
            w.write_i32(*count);
            w.write_u8(state.economy.owned.loose[i]);
        }
    }

    // market stock
    for count in &state.economy.market.counts {
        if version == 0 {
            w.write_u8((*count).clamp(0, u8::MAX as i32) as u8);
        } else {
            w.write_i32(*count);
        }
    }

    // stage blocks, active stages only, terminated by an empty name
    for (stage_idx, stage_state) in state.stage_states.iter().enumerate() {
        if !stage_state.active {
            continue;
        }
        let stage_def = &geo.db.stages[stage_idx];
        w.write_str(&stage_def.name);
        w.write_date(stage_state.start);
        w.write_u8(stage_def.count as u8);
        for set_idx in geo.db.stage_range(stage_idx) {
            let set = &state.set_states[set_idx];
            w.write_str(&geo.db.stage_sets[set_idx].name);
            w.write_u8(set.active as u8);
            w.write_u16(set.num as u16);
            w.write_u16(set.done as u16);
            w.write_date(set.start);
            w.write_date(set.event.unwrap_or_default());
        }
    }
    w.write_str("");

    // active missions
    w.write_u8(state.missions.len() as u8);
    for mis in &state.missions {
        w.write_str(&geo.db.missions[mis.def].id);
        w.write_str(&geo.db.stage_sets[mis.cause].name);
        w.write_f32(mis.pos.lon);
        w.write_f32(mis.pos.lat);
        w.write_date(mis.expire.unwrap_or_default());
    }

    if version >= 2 {
        w.write_i32(state.map_mode.to_i32());
    }

    w.into_bytes()
}

/// Read the version header. A nonzero first byte marks a legacy
/// unversioned file: the cursor rewinds and the content is treated as
/// version 0.
fn read_version(r: &mut ByteReader) -> Result<u32> {
    if r.read_u8()? == 0 {
        let version = r.read_u32()?;
        tracing::debug!(version, "versioned save detected");
        Ok(version)
    } else {
        r.rewind();
        Ok(0)
    }
}

/// Deserialize a save buffer into the engine, replacing the running
/// campaign state. Nothing is mutated until the header validates.
pub fn read_save(geo: &mut Geoscape, bytes: &[u8]) -> Result<()> {
    let mut r = ByteReader::new(bytes);

    let version = read_version(&mut r)?;
    if version > SAVE_FILE_VERSION {
        return Err(CampaignError::UnsupportedSaveVersion {
            found: version,
            supported: SAVE_FILE_VERSION,
        });
    }
    if version < SAVE_FILE_VERSION {
        tracing::warn!(
            version,
            supported = SAVE_FILE_VERSION,
            "save file format is outdated, you may experience problems"
        );
    }

    let _comment = r.read_str()?;
    let campaign_name = r.read_str()?;
    let campaign_idx = geo
        .db
        .find_campaign(&campaign_name)
        .ok_or(CampaignError::CampaignNotFound(campaign_name))?;

    // header is sound; rebuild the state from here on
    let seed = geo.state.rng.gen_range(0..u64::MAX);
    let mut state = CampaignState::restored(&geo.db, campaign_idx, seed);

    state.date = r.read_date()?;

    state.center[0] = r.read_f32()?;
    state.center[1] = r.read_f32()?;
    state.zoom = r.read_f32()?;

    state.bases = read_bases(&mut r, &geo.db, version)?;

    // research tree block, reserved
    let research = r.read_u8()?;
    if research != 0 {
        tracing::warn!(research, "unexpected research block, ignoring");
    }

    state.economy.credits = r.read_i32()?;

    for i in 0..geo.db.catalog.len() {
        if version == 0 {
            state.economy.owned.counts[i] = r.read_u8()? as i32;
            state.economy.owned.loose[i] = 0;
        } else {
            state.economy.owned.counts[i] = r.read_i32()?;
            state.economy.owned.loose[i] = r.read_u8()?;
        }
    }
    for i in 0..geo.db.catalog.len() {
        if version == 0 {
            state.economy.market.counts[i] = r.read_u8()? as i32;
        } else {
            state.economy.market.counts[i] = r.read_i32()?;
        }
    }

    // stage blocks
    loop {
        let stage_name = r.read_str()?;
        if stage_name.is_empty() {
            break;
        }
        let stage_idx = geo.db.find_stage(&stage_name);
        let start = r.read_date()?;
        let set_count = r.read_u8()? as usize;

        match stage_idx {
            Some(stage_idx) => {
                state.stage_states[stage_idx] = StageState {
                    active: true,
                    start,
                };
            }
            None => {
                tracing::warn!(stage = %stage_name, "unknown stage in save, block skipped");
            }
        }

        for _ in 0..set_count {
            let set_name = r.read_str()?;
            let mut scratch = SetState::default();
            let slot = stage_idx
                .and_then(|si| {
                    geo.db
                        .stage_range(si)
                        .find(|&j| geo.db.stage_sets[j].name == set_name)
                })
                .map(|j| &mut state.set_states[j]);
            if slot.is_none() {
                tracing::warn!(set = %set_name, "unknown stage set in save, record dropped");
            }
            let set = slot.unwrap_or(&mut scratch);

            set.active = r.read_u8()? != 0;
            set.num = r.read_u16()? as u32;
            set.done = r.read_u16()? as u32;
            set.start = r.read_date()?;
            let event = r.read_date()?;
            set.event = event.is_set().then_some(event);
        }
    }

    // active missions
    let mission_count = r.read_u8()? as usize;
    for _ in 0..mission_count {
        let mission_name = r.read_str()?;
        let cause_name = r.read_str()?;
        let lon = r.read_f32()?;
        let lat = r.read_f32()?;
        let expire = r.read_date()?;

        let def = geo.db.find_mission(&mission_name);
        let cause = geo.db.find_stage_set(&cause_name);
        if def.is_none() {
            tracing::warn!(mission = %mission_name, "unknown mission in save, dropped");
        }
        if cause.is_none() {
            tracing::warn!(set = %cause_name, "unknown stage set in save, mission dropped");
        }
        let (Some(def), Some(cause)) = (def, cause) else {
            continue;
        };
        state.missions.push(ActiveMission {
            def,
            cause,
            pos: PolarCoord::new(lon, lat),
            expire: expire.is_set().then_some(expire),
            reachable: false,
        });
    }

    if version >= 2 {
        let mode = r.read_i32()?;
        state.map_mode = MapMode::from_i32(mode).ok_or_else(|| {
            CampaignError::CorruptSave(format!("invalid map mode {}", mode))
        })?;
    }

    geo.campaign = campaign_idx;
    geo.state = state;
    Ok(())
}

impl CampaignState {
    /// Empty state shell used while loading a save: sized to the
    /// database, everything else at rest.
    fn restored(db: &crate::campaign::CampaignDb, campaign: usize, seed: u64) -> Self {
        use rand::SeedableRng;
        Self {
            date: db.campaigns[campaign].date,
            timer: 0.0,
            center: [0.5, 0.5],
            zoom: 1.0,
            economy: crate::economy::Economy::new(&db.catalog, 0),
            stage_states: vec![StageState::default(); db.stages.len()],
            set_states: vec![SetState::default(); db.stage_sets.len()],
            missions: Vec::new(),
            selected_mission: None,
            intercept_craft: None,
            bases: Vec::new(),
            map_mode: MapMode::None,
            lapse: 0,
            messages: crate::ui::MessageLog::default(),
            pending_commands: Vec::new(),
            rng: rand_chacha::ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

// ----------------------------------------------------------------------
// files and slot comments

/// Save the campaign to a file. I/O failure aborts only the save.
pub fn save_to_file(geo: &mut Geoscape, path: &Path, comment: &str) -> Result<()> {
    let bytes = write_save(geo, comment, SAVE_FILE_VERSION);
    std::fs::write(path, bytes)?;
    geo.state.messages.push(
        "Notice",
        format!("Campaign saved to {}", path.display()),
        MessageKind::Standard,
    );
    tracing::info!(path = %path.display(), "campaign saved");
    Ok(())
}

pub fn load_from_file(geo: &mut Geoscape, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path)?;
    read_save(geo, &bytes)?;
    tracing::info!(path = %path.display(), "campaign loaded");
    Ok(())
}

/// Peek the comment string of a save buffer for the load menu. Legacy
/// unversioned files store the comment from byte zero.
pub fn read_comment(bytes: &[u8]) -> Result<String> {
    let mut r = ByteReader::new(bytes);
    read_version(&mut r)?;
    r.read_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::CampaignDb;
    use crate::core::types::PolarCoord;
    use crate::geo::TerrainMask;

    const DATA: &str = r#"
        [[items]]
        id = "assault_rifle"
        name = "Assault Rifle"
        price = 1200

        [[items]]
        id = "medikit"
        name = "Medikit"
        price = 300

        [[aircraft]]
        id = "craft_dropship"
        name = "Firebird"
        type = "transporter"
        speed = 90.0
        fuel = 100000
        seats = 8

        [[missions]]
        id = "recon_site"
        map = "farm"
        pos = { lon = 30.0, lat = 30.0 }
        aliens = 4
        civilians = 2
        cr_civilian = 200

        [[stages]]
        name = "intro"

        [[stages.sets]]
        name = "recon_wave"
        frame = { sec = 10 }
        expire = { day = 2 }
        number = 2
        quota = 1
        missions = ["recon_site"]

        [[campaigns]]
        name = "main"
        credits = 10000
        date = { day = 10, sec = 0 }
        firststage = "intro"
    "#;

    fn campaign() -> Geoscape {
        let db = CampaignDb::from_toml(DATA).unwrap();
        let mask = TerrainMask::solid(16, 8, [128, 255, 0]);
        let mut geo = Geoscape::new_game(db, mask, "main", 99).unwrap();
        geo.found_base("Alpha", PolarCoord::new(0.0, 45.0)).unwrap();
        // drive until the first mission spawns
        geo.state.lapse = 1;
        for _ in 0..10 {
            geo.advance(0.1);
            if !geo.state.missions.is_empty() {
                break;
            }
        }
        assert!(!geo.state.missions.is_empty());
        let rifle = geo.db.catalog.find("assault_rifle").unwrap();
        geo.state.economy.owned.add(rifle, 7);
        geo.state.economy.owned.loose[rifle.0] = 3;
        geo.state.economy.market.add(rifle, 12);
        geo.state.bases[0].aircraft[0].team_size = 4;
        geo
    }

    fn fresh_engine() -> Geoscape {
        let db = CampaignDb::from_toml(DATA).unwrap();
        let mask = TerrainMask::solid(16, 8, [128, 255, 0]);
        Geoscape::new_game(db, mask, "main", 1).unwrap()
    }

    #[test]
    fn test_round_trip_preserves_state() {
        let geo = campaign();
        let bytes = write_save(&geo, "midgame", SAVE_FILE_VERSION);

        let mut restored = fresh_engine();
        read_save(&mut restored, &bytes).unwrap();

        assert_eq!(restored.state.date, geo.state.date);
        assert_eq!(restored.state.economy, geo.state.economy);
        assert_eq!(restored.state.map_mode, geo.state.map_mode);
        assert_eq!(restored.state.bases.len(), 1);
        assert_eq!(restored.state.missions.len(), geo.state.missions.len());

        // stage and set bookkeeping
        assert!(restored.state.stage_states[0].active);
        assert_eq!(restored.state.set_states[0].num, geo.state.set_states[0].num);
        assert_eq!(
            restored.state.set_states[0].event,
            geo.state.set_states[0].event
        );

        // mission fields
        let a = &restored.state.missions[0];
        let b = &geo.state.missions[0];
        assert_eq!(a.def, b.def);
        assert_eq!(a.cause, b.cause);
        assert_eq!(a.expire, b.expire);
        assert!((a.pos.lon - b.pos.lon).abs() < 1e-4);

        // aircraft fields
        let air_a = &restored.state.bases[0].aircraft[0];
        let air_b = &geo.state.bases[0].aircraft[0];
        assert_eq!(air_a.type_id, air_b.type_id);
        assert_eq!(air_a.status, air_b.status);
        assert_eq!(air_a.fuel, air_b.fuel);
        assert_eq!(air_a.team_size, air_b.team_size);
        assert_eq!(air_a.route, air_b.route);
    }

    #[test]
    fn test_version_0_uses_byte_counts() {
        let geo = campaign();
        let bytes = write_save(&geo, "old", 0);

        let mut restored = fresh_engine();
        read_save(&mut restored, &bytes).unwrap();

        let rifle = restored.db.catalog.find("assault_rifle").unwrap();
        assert_eq!(restored.state.economy.owned.count(rifle), 7);
        // loose ammo does not exist in version 0
        assert_eq!(restored.state.economy.owned.loose[rifle.0], 0);
        assert_eq!(restored.state.economy.market.count(rifle), 12);
        // map mode field does not exist in version 0
        assert_eq!(restored.state.map_mode, MapMode::None);
    }

    #[test]
    fn test_newer_version_is_rejected_without_mutation() {
        let geo = campaign();
        let mut bytes = write_save(&geo, "future", SAVE_FILE_VERSION);
        // bump the version field past the supported one
        bytes[1..5].copy_from_slice(&(SAVE_FILE_VERSION + 1).to_le_bytes());

        let mut restored = fresh_engine();
        let credits = restored.state.economy.credits;
        let err = read_save(&mut restored, &bytes).unwrap_err();
        assert!(matches!(err, CampaignError::UnsupportedSaveVersion { .. }));
        assert_eq!(restored.state.economy.credits, credits);
        assert!(restored.state.bases.is_empty());
    }

    #[test]
    fn test_unknown_names_are_skipped_but_cursor_stays_aligned() {
        let geo = campaign();
        let bytes = write_save(&geo, "drift", SAVE_FILE_VERSION);

        // reload into a database where names differ
        let mut drifted = DATA.replace("recon_wave", "recon_xyzw");
        drifted = drifted.replace("recon_site", "recon_misc");
        let db = CampaignDb::from_toml(&drifted).unwrap();
        let mask = TerrainMask::solid(16, 8, [128, 255, 0]);
        let mut restored = Geoscape::new_game(db, mask, "main", 1).unwrap();

        read_save(&mut restored, &bytes).unwrap();
        // the set record went to scratch, the mission was dropped, and
        // the trailing map mode still parsed correctly
        assert_eq!(restored.state.set_states[0].num, 0);
        assert!(restored.state.missions.is_empty());
        assert_eq!(restored.state.map_mode, geo.state.map_mode);
        // fields after the base block survived too
        assert_eq!(restored.state.economy.credits, geo.state.economy.credits);
    }

    #[test]
    fn test_unknown_aircraft_record_is_consumed() {
        let geo = campaign();
        let bytes = write_save(&geo, "craft-drift", SAVE_FILE_VERSION);

        let db = CampaignDb::from_toml(&DATA.replace("craft_dropship", "craft_mk2")).unwrap();
        let mask = TerrainMask::solid(16, 8, [128, 255, 0]);
        let mut restored = Geoscape::new_game(db, mask, "main", 1).unwrap();

        read_save(&mut restored, &bytes).unwrap();
        assert_eq!(restored.state.bases.len(), 1);
        assert!(restored.state.bases[0].aircraft.is_empty());
        assert_eq!(restored.state.bases[0].current_aircraft, None);
        // everything after the aircraft block still loads
        assert_eq!(restored.state.economy.credits, geo.state.economy.credits);
        assert_eq!(restored.state.missions.len(), geo.state.missions.len());
    }

    #[test]
    fn test_unknown_campaign_is_fatal() {
        let mut w = ByteWriter::new();
        w.write_u8(0);
        w.write_u32(SAVE_FILE_VERSION);
        w.write_str("comment");
        w.write_str("not_a_campaign");
        let mut restored = fresh_engine();
        let err = read_save(&mut restored, &w.into_bytes()).unwrap_err();
        assert!(matches!(err, CampaignError::CampaignNotFound(_)));
    }

    #[test]
    fn test_truncated_save_fails_cleanly() {
        let geo = campaign();
        let bytes = write_save(&geo, "cut", SAVE_FILE_VERSION);
        let err = read_save(&mut fresh_engine(), &bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, CampaignError::CorruptSave(_)));
    }

    #[test]
    fn test_read_comment() {
        let geo = campaign();
        let bytes = write_save(&geo, "third attempt", SAVE_FILE_VERSION);
        assert_eq!(read_comment(&bytes).unwrap(), "third attempt");

        // legacy file: no marker, the comment starts at byte zero
        let mut legacy = b"old save".to_vec();
        legacy.push(0);
        legacy.extend_from_slice(&[1, 2, 3]);
        assert_eq!(read_comment(&legacy).unwrap(), "old save");
    }

    #[test]
    fn test_save_and_load_file_round_trip() {
        let dir = std::env::temp_dir().join("terra-vigil-test-save");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("slot0.sav");

        let mut geo = campaign();
        save_to_file(&mut geo, &path, "file test").unwrap();

        let mut restored = fresh_engine();
        load_from_file(&mut restored, &path).unwrap();
        assert_eq!(restored.state.date, geo.state.date);
        std::fs::remove_file(&path).ok();
    }
}
