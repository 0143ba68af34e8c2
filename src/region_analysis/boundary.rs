use crate::error::RegionError;
use crate::tile_map::{Direction, TileMap, TileXY};
use super::labeling::LabelRaster;
use super::structs::RegionLabel;

/// True if some 8-neighbor of `xy` is outside the raster or carries a label
/// other than `label`.
#[inline]
pub(crate) fn is_boundary_tile(labels: &TileMap<u32>, xy: TileXY, label: u32) -> bool {
    Direction::ALL
        .into_iter()
        .any(|dir| match labels.checked_add_direction(xy, dir) {
            Some(adj) => labels[adj] != label,
            None => true,
        })
}

/// Perimeter tiles of the component carrying `label`, in row-major order.
///
/// Fails for labels outside `1..=num_labels`. A label that no longer owns any
/// tiles yields an empty list.
pub fn boundary_points(raster: &LabelRaster, label: RegionLabel) -> Result<Vec<TileXY>, RegionError> {
    raster.check_label(label)?;
    let labels = raster.labels();
    let value = label.value();

    Ok(labels
        .iter_xy()
        .filter(|(xy, v)| **v == value && is_boundary_tile(labels, *xy, value))
        .map(|(xy, _)| xy)
        .collect())
}

/// Same as [`boundary_points`], but only visits the given member tiles.
pub(crate) fn boundary_of_members(labels: &TileMap<u32>, members: &[usize], label: u32) -> Vec<TileXY> {
    members
        .iter()
        .map(|idx| labels.xy_of(*idx))
        .filter(|xy| is_boundary_tile(labels, *xy, label))
        .collect()
}
