use log::{debug, trace};

use crate::error::RegionError;
use super::graph::RegionGraph;
use super::labeling::LabelRaster;
use super::structs::RegionLabel;

/// A corridor whose tiles were relabeled to its only neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Merge {
    pub corridor: RegionLabel,
    pub into: RegionLabel,
}

/// Relabels every dead-end corridor (exactly one neighbor in `graph`) to that
/// neighbor. Rooms are never merged away.
///
/// All merges are decided from `graph` as given, so a corridor that only
/// becomes a dead end through another merge in this pass is left alone.
/// Merges apply in ascending corridor order; each moves the tiles carrying
/// the corridor's label at that point. Merged labels stay unused and are not
/// renumbered. Corridors that no longer own any tiles are skipped, so a
/// stale graph never reports merges that did not happen.
///
/// Fails if `graph` does not cover exactly the labels of `raster`.
pub fn collapse_dead_ends(raster: &mut LabelRaster, graph: &RegionGraph) -> Result<Vec<Merge>, RegionError> {
    if graph.num_labels() != raster.num_labels() {
        return Err(RegionError::GraphMismatch {
            graph_labels: graph.num_labels(),
            raster_labels: raster.num_labels(),
        });
    }

    let mut members = raster.members_by_label();
    Ok(collapse_dead_ends_with_members(raster, graph, &mut members))
}

/// Same as [`collapse_dead_ends`], keeping `members` (indexed by label value)
/// in sync with the raster.
pub(crate) fn collapse_dead_ends_with_members(
    raster: &mut LabelRaster,
    graph: &RegionGraph,
    members: &mut [Vec<usize>],
) -> Vec<Merge> {
    debug!("relabeling dead-end corridors");

    let mut merges = Vec::new();
    for value in 1..=raster.num_corridors() {
        let corridor = RegionLabel::new(value);
        let into = match graph.get_neighbors(corridor) {
            Some(neighbors) if neighbors.len() == 1 => neighbors.iter().next().copied(),
            _ => None,
        };
        let Some(into) = into else {
            continue;
        };
        if members[value as usize].is_empty() {
            continue;
        }

        trace!("  corridor {corridor} := region {into}");

        let moved = std::mem::take(&mut members[value as usize]);
        let labels = raster.labels_mut();
        for idx in &moved {
            labels[*idx] = into.value();
        }
        members[into.value() as usize].extend(moved);

        merges.push(Merge { corridor, into });
    }

    debug!("collapsed {} dead-end corridors", merges.len());
    merges
}
