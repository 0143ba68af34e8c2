use log::debug;

use crate::error::RegionError;
use crate::morphology::{open, StructuringElement};
use crate::tile_map::TileMap;

/// A traversable mask split into rooms and corridors. The two masks are
/// disjoint and their union is the traversable mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedMask {
    room: TileMap<bool>,
    corridor: TileMap<bool>,
}

impl SegmentedMask {
    pub fn room(&self) -> &TileMap<bool> {
        &self.room
    }

    pub fn corridor(&self) -> &TileMap<bool> {
        &self.corridor
    }
}

/// Rooms are whatever survives opening the traversable mask with `kernel`
/// `iterations` times; the rest of the traversable tiles are corridors.
/// Even-sized kernels can grow the opening past the input, so rooms are
/// clipped back to the traversable tiles.
pub fn segment_mask(
    traversable: &TileMap<bool>,
    kernel: &StructuringElement,
    iterations: usize,
) -> Result<SegmentedMask, RegionError> {
    let mut room = open(traversable, kernel, iterations)?;
    for (tile, open_tile) in room.data_mut().iter_mut().zip(traversable.data()) {
        *tile &= *open_tile;
    }

    let mut corridor = traversable.clone();
    for (tile, in_room) in corridor.data_mut().iter_mut().zip(room.data()) {
        *tile &= !*in_room;
    }

    debug!(
        "segmented mask: {} room tiles, {} corridor tiles",
        room.count_set(),
        corridor.count_set()
    );

    Ok(SegmentedMask { room, corridor })
}
