pub mod noise;
pub mod cells;
pub mod zones;

pub use cells::{classify_tile, CellKind};
pub use noise::{coord_key, hash_coord, stream, unit, variation};
pub use zones::{DreamEffect, DreamZone, ZoneSample};
