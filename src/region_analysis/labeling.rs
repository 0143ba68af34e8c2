use std::collections::VecDeque;
use std::fmt;

use itertools::{Either, Itertools};
use log::debug;

use crate::config::Connectivity;
use crate::error::RegionError;
use crate::tile_map::{TileMap, TileXY};
use super::segment::SegmentedMask;
use super::structs::{RegionKind, RegionLabel};

/// Connected components of a single boolean mask.
///
/// Unset tiles carry 0, components carry `1..=count` in the row-major order
/// of their first tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentLabels {
    count: u32,
    labels: TileMap<u32>,
}

impl ComponentLabels {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn labels(&self) -> &TileMap<u32> {
        &self.labels
    }
}

/// Flood fills every component of `mask`. Fails rather than wrapping if the
/// component count does not fit in a `u32`.
pub fn label_components(mask: &TileMap<bool>, connectivity: Connectivity) -> Result<ComponentLabels, RegionError> {
    let mut labels: TileMap<u32> = TileMap::filled_like(mask, 0);
    let mut queue: VecDeque<TileXY> = VecDeque::new();
    let mut count: u32 = 0;

    for idx in 0..mask.len() {
        if !mask[idx] || labels[idx] != 0 {
            continue;
        }

        count = count.checked_add(1).ok_or(RegionError::LabelOverflow {
            count: (u32::MAX as usize).saturating_add(1),
        })?;

        let seed = mask.xy_of(idx);
        labels[seed] = count;
        queue.push_back(seed);

        while let Some(xy) = queue.pop_front() {
            let adjacent = match connectivity {
                Connectivity::Eight => Either::Left(mask.neighbors(xy)),
                Connectivity::Four => Either::Right(mask.taxicab_neighbors(xy)),
            };

            for adj in adjacent {
                if mask[adj] && labels[adj] == 0 {
                    labels[adj] = count;
                    queue.push_back(adj);
                }
            }
        }
    }

    Ok(ComponentLabels { count, labels })
}

/// The combined label raster: 0 is background, `1..=num_corridors` are
/// corridors and the following `num_rooms` labels are rooms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRaster {
    labels: TileMap<u32>,
    num_corridors: u32,
    num_rooms: u32,
}

impl LabelRaster {
    /// Labels the corridor and room masks and merges them into one raster.
    pub fn from_segmented(segmented: &SegmentedMask, connectivity: Connectivity) -> Result<LabelRaster, RegionError> {
        let corridors = label_components(segmented.corridor(), connectivity)?;
        let rooms = label_components(segmented.room(), connectivity)?;
        LabelRaster::combine(&corridors, &rooms)
    }

    /// Offsets room labels past the corridor labels. The two inputs must come
    /// from disjoint masks of the same size.
    pub fn combine(corridors: &ComponentLabels, rooms: &ComponentLabels) -> Result<LabelRaster, RegionError> {
        corridors.labels.ensure_same_dims(&rooms.labels)?;

        let num_corridors = corridors.count;
        let num_rooms = rooms.count;
        num_corridors
            .checked_add(num_rooms)
            .ok_or(RegionError::LabelOverflow {
                count: (num_corridors as usize).saturating_add(num_rooms as usize),
            })?;

        let mut labels = corridors.labels.clone();
        for (idx, room) in rooms.labels.data().iter().enumerate() {
            if *room != 0 {
                labels[idx] = num_corridors + room;
            }
        }

        debug!("labeled {num_corridors} corridors and {num_rooms} rooms");

        Ok(LabelRaster {
            labels,
            num_corridors,
            num_rooms,
        })
    }

    pub fn labels(&self) -> &TileMap<u32> {
        &self.labels
    }

    pub fn width(&self) -> usize {
        self.labels.width()
    }

    pub fn height(&self) -> usize {
        self.labels.height()
    }

    pub fn num_corridors(&self) -> u32 {
        self.num_corridors
    }

    pub fn num_rooms(&self) -> u32 {
        self.num_rooms
    }

    pub fn num_labels(&self) -> u32 {
        self.num_corridors + self.num_rooms
    }

    /// The label owning `xy`, or `None` for background and out of bounds tiles.
    pub fn label_at(&self, xy: TileXY) -> Option<RegionLabel> {
        match self.labels.get(xy) {
            Some(0) | None => None,
            Some(value) => Some(RegionLabel::new(*value)),
        }
    }

    pub fn kind_of(&self, label: RegionLabel) -> Option<RegionKind> {
        match label.value() {
            0 => None,
            v if v <= self.num_corridors => Some(RegionKind::Corridor),
            v if v <= self.num_labels() => Some(RegionKind::Room),
            _ => None,
        }
    }

    pub(crate) fn check_label(&self, label: RegionLabel) -> Result<RegionKind, RegionError> {
        self.kind_of(label).ok_or(RegionError::LabelOutOfRange {
            label: label.value(),
            num_labels: self.num_labels(),
        })
    }

    /// Linear tile indices of every label, indexed by label value. Slot 0
    /// holds the background.
    pub fn members_by_label(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.num_labels() as usize + 1];
        for (idx, value) in self.labels.data().iter().enumerate() {
            members[*value as usize].push(idx);
        }
        members
    }

    pub(crate) fn labels_mut(&mut self) -> &mut TileMap<u32> {
        &mut self.labels
    }
}

impl fmt::Display for LabelRaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.num_labels().max(1).to_string().len();
        for row in self.labels.data().chunks(self.width().max(1)) {
            let line = row
                .iter()
                .map(|v| match v {
                    0 => format!("{:>cell$}", "."),
                    v => format!("{v:>cell$}"),
                })
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(text: &str) -> TileMap<bool> {
        TileMap::from_ascii(text).unwrap()
    }

    #[test]
    fn diagonal_tiles_join_under_eight_connectivity() {
        let m = mask(
            ".#.
             #.#
             ...",
        );
        let eight = label_components(&m, Connectivity::Eight).unwrap();
        assert_eq!(eight.count(), 1);

        let four = label_components(&m, Connectivity::Four).unwrap();
        assert_eq!(four.count(), 3);
        assert_eq!(four.labels().data(), &[1, 0, 2, 0, 3, 0, 3, 3, 3]);
    }

    #[test]
    fn labels_follow_row_major_order() {
        let m = mask(
            "##.
             .#.
             .##",
        );
        let labeled = label_components(&m, Connectivity::Eight).unwrap();
        assert_eq!(labeled.count(), 2);
        assert_eq!(labeled.labels().data(), &[0, 0, 1, 2, 0, 1, 2, 0, 0]);
    }

    #[test]
    fn empty_mask_has_no_components() {
        let m = TileMap::new(4, 4, false).unwrap();
        let labeled = label_components(&m, Connectivity::Eight).unwrap();
        assert_eq!(labeled.count(), 0);
        assert!(labeled.labels().data().iter().all(|v| *v == 0));
    }

    #[test]
    fn rooms_are_offset_past_corridors() {
        let corridor = mask("..#..\n#####");
        let room = mask("##.##\n.....");
        let raster = LabelRaster::combine(
            &label_components(&corridor, Connectivity::Eight).unwrap(),
            &label_components(&room, Connectivity::Eight).unwrap(),
        )
        .unwrap();

        assert_eq!(raster.num_corridors(), 2);
        assert_eq!(raster.num_rooms(), 1);
        assert_eq!(raster.labels().data(), &[1, 1, 3, 2, 2, 3, 3, 3, 3, 3]);
        assert_eq!(raster.kind_of(RegionLabel::new(2)), Some(RegionKind::Corridor));
        assert_eq!(raster.kind_of(RegionLabel::new(3)), Some(RegionKind::Room));
        assert_eq!(raster.kind_of(RegionLabel::new(4)), None);
        assert_eq!(raster.label_at(TileXY::new(2, 0)), Some(RegionLabel::new(3)));
        assert_eq!(raster.label_at(TileXY::new(9, 0)), None);

        assert_eq!(raster.to_string(), "1 1 3 2 2\n3 3 3 3 3\n");
    }

    #[test]
    fn combine_rejects_mismatched_dimensions() {
        let a = label_components(&mask("..\n.."), Connectivity::Eight).unwrap();
        let b = label_components(&mask("..."), Connectivity::Eight).unwrap();
        assert!(matches!(
            LabelRaster::combine(&a, &b),
            Err(RegionError::DimensionMismatch { .. })
        ));
    }
}
