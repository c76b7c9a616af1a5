pub mod mask;
pub mod route;

pub use mask::{TerrainKind, TerrainMask};
pub use route::Route;
