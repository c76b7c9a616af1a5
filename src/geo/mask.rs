//! Terrain mask over the geoscape
//!
//! An RGBA image in equirectangular projection doubles as the spatial
//! database of the strategy layer: mission scripts name a mask color and
//! spawn at a random pixel of that color, and base placement classifies
//! the terrain under the cursor by the same palette.

use rand::Rng;

use crate::core::error::{CampaignError, Result};
use crate::core::types::PolarCoord;

/// Palette entries with gameplay meaning
const COLOR_WATER: [u8; 3] = [0, 0, 64];
const COLOR_ARCTIC: [u8; 3] = [128, 255, 255];
const COLOR_DESERT: [u8; 3] = [255, 128, 0];

/// Terrain classification for a mask pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainKind {
    Water,
    Arctic,
    Desert,
    Grassland,
}

impl TerrainKind {
    fn from_color(c: &[u8]) -> Self {
        match [c[0], c[1], c[2]] {
            COLOR_WATER => TerrainKind::Water,
            COLOR_ARCTIC => TerrainKind::Arctic,
            COLOR_DESERT => TerrainKind::Desert,
            _ => TerrainKind::Grassland,
        }
    }

    /// Map-theme character used when assembling tactical maps
    pub fn map_char(self) -> char {
        match self {
            TerrainKind::Water => 'w',
            TerrainKind::Arctic => 'a',
            TerrainKind::Desert => 'd',
            TerrainKind::Grassland => 'g',
        }
    }
}

/// The loaded mask image
#[derive(Debug, Clone)]
pub struct TerrainMask {
    width: usize,
    height: usize,
    /// RGBA, row-major, top row first
    pixels: Vec<u8>,
}

impl TerrainMask {
    pub fn from_rgba(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != width * height * 4 {
            return Err(CampaignError::Definition(format!(
                "terrain mask is {} bytes, expected {} for {}x{}",
                pixels.len(),
                width * height * 4,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Uniform single-color mask, mostly useful in tests
    pub fn solid(width: usize, height: usize, color: [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[color[0], color[1], color[2], 255]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Overwrite one pixel, for building fixtures
    pub fn set_pixel(&mut self, x: usize, y: usize, color: [u8; 3]) {
        let at = (y * self.width + x) * 4;
        self.pixels[at..at + 3].copy_from_slice(&color);
    }

    /// Pick a uniformly random mask pixel of `color` and return its
    /// geoscape coordinate. Pure black never matches (it is the "no
    /// placement" color). Returns `None` when the color is absent.
    pub fn find_position<R: Rng>(&self, color: [u8; 3], rng: &mut R) -> Option<PolarCoord> {
        if color == [0, 0, 0] {
            return None;
        }

        let matches = self
            .pixels
            .chunks_exact(4)
            .filter(|c| c[0] == color[0] && c[1] == color[1] && c[2] == color[2])
            .count();
        if matches == 0 {
            return None;
        }

        let wanted = rng.gen_range(0..matches);
        let index = self
            .pixels
            .chunks_exact(4)
            .enumerate()
            .filter(|(_, c)| c[0] == color[0] && c[1] == color[1] && c[2] == color[2])
            .nth(wanted)
            .map(|(i, _)| i)?;

        let x = index % self.width;
        let y = index / self.width;
        let pos = PolarCoord::new(
            180.0 - 360.0 * (x as f32 + 0.5) / self.width as f32,
            90.0 - 180.0 * (y as f32 + 0.5) / self.height as f32,
        );
        tracing::debug!(lon = pos.lon, lat = pos.lat, "resolved mask position");
        Some(pos)
    }

    /// Classify the terrain at a geoscape coordinate
    pub fn terrain_at(&self, pos: PolarCoord) -> TerrainKind {
        let x = ((180.0 - pos.lon) / 360.0 * self.width as f32) as isize;
        let y = ((90.0 - pos.lat) / 180.0 * self.height as f32) as isize;
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        let at = (y * self.width + x) * 4;
        TerrainKind::from_color(&self.pixels[at..at + 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_from_rgba_validates_size() {
        assert!(TerrainMask::from_rgba(4, 4, vec![0; 64]).is_ok());
        assert!(TerrainMask::from_rgba(4, 4, vec![0; 63]).is_err());
    }

    #[test]
    fn test_find_position_hits_marked_pixel() {
        let mut mask = TerrainMask::solid(8, 4, [0, 0, 64]);
        mask.set_pixel(2, 1, [255, 0, 0]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let pos = mask.find_position([255, 0, 0], &mut rng).unwrap();
        // pixel (2,1) on an 8x4 mask
        assert!((pos.lon - (180.0 - 360.0 * 2.5 / 8.0)).abs() < 1e-3);
        assert!((pos.lat - (90.0 - 180.0 * 1.5 / 4.0)).abs() < 1e-3);
    }

    #[test]
    fn test_find_position_absent_color() {
        let mask = TerrainMask::solid(4, 4, [0, 0, 64]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(mask.find_position([255, 0, 0], &mut rng).is_none());
        // black is reserved
        assert!(mask.find_position([0, 0, 0], &mut rng).is_none());
    }

    #[test]
    fn test_terrain_classification() {
        let mut mask = TerrainMask::solid(8, 4, [0, 0, 64]);
        mask.set_pixel(0, 0, COLOR_ARCTIC);
        mask.set_pixel(4, 2, COLOR_DESERT);
        mask.set_pixel(6, 3, [10, 200, 30]);

        // pixel (0,0) is the north-west corner: lon near 180, lat near 90
        assert_eq!(
            mask.terrain_at(PolarCoord::new(179.0, 89.0)),
            TerrainKind::Arctic
        );
        // pixel (4,2) is just west of the antimeridian at the equator
        assert_eq!(
            mask.terrain_at(PolarCoord::new(-22.0, -22.0)),
            TerrainKind::Desert
        );
        assert_eq!(
            mask.terrain_at(PolarCoord::new(100.0, 45.0)),
            TerrainKind::Water
        );
        assert_eq!(
            mask.terrain_at(PolarCoord::new(-112.0, -67.0)),
            TerrainKind::Grassland
        );
    }

    #[test]
    fn test_find_position_round_trips_through_terrain_at() {
        let mut mask = TerrainMask::solid(16, 8, [0, 0, 64]);
        mask.set_pixel(11, 5, COLOR_DESERT);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let pos = mask.find_position(COLOR_DESERT, &mut rng).unwrap();
        assert_eq!(mask.terrain_at(pos), TerrainKind::Desert);
    }
}
