use std::collections::{BTreeSet, HashMap, HashSet};

use itertools::Itertools;
use log::trace;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::tile_map::TileMap;
use super::boundary::boundary_of_members;
use super::labeling::LabelRaster;
use super::structs::RegionLabel;

/// Region adjacency graph over the labels of a [`LabelRaster`].
///
/// Two regions are adjacent when a tile of one lies in the 8-neighborhood of a
/// tile of the other. Only labels that owned tiles when the graph was built
/// are nodes; adjacency is symmetric and never contains the label itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGraph {
    // slot `i` holds label `i + 1`
    adjacency: Vec<Option<BTreeSet<RegionLabel>>>,
}

impl RegionGraph {
    pub fn build(raster: &LabelRaster) -> RegionGraph {
        RegionGraph::build_from_members(raster, &raster.members_by_label())
    }

    /// Builds the graph from precomputed members, as returned by
    /// [`LabelRaster::members_by_label`]. Only boundary tiles are scanned.
    pub fn build_from_members(raster: &LabelRaster, members: &[Vec<usize>]) -> RegionGraph {
        let labels = raster.labels();
        let num_labels = raster.num_labels();

        #[cfg(feature = "rayon")]
        let adjacency: Vec<_> = (1..=num_labels)
            .into_par_iter()
            .map(|label| adjacent_labels(labels, members, label))
            .collect();

        #[cfg(not(feature = "rayon"))]
        let adjacency: Vec<_> = (1..=num_labels)
            .map(|label| adjacent_labels(labels, members, label))
            .collect();

        for (label, neighbors) in adjacency.iter().enumerate() {
            if let Some(neighbors) = neighbors {
                trace!("  {} -> {{{}}}", label + 1, neighbors.iter().join(", "));
            }
        }

        RegionGraph { adjacency }
    }

    pub fn num_labels(&self) -> u32 {
        self.adjacency.len() as u32
    }

    pub fn contains(&self, label: RegionLabel) -> bool {
        self.get_neighbors(label).is_some()
    }

    /// Neighbors of `label`, or `None` if it is not a node of this graph.
    pub fn get_neighbors(&self, label: RegionLabel) -> Option<&BTreeSet<RegionLabel>> {
        let slot = (label.value() as usize).checked_sub(1)?;
        self.adjacency.get(slot)?.as_ref()
    }

    pub fn degree(&self, label: RegionLabel) -> Option<usize> {
        self.get_neighbors(label).map(BTreeSet::len)
    }

    /// Iterates nodes in label order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionLabel, &BTreeSet<RegionLabel>)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .filter_map(|(slot, neighbors)| {
                neighbors
                    .as_ref()
                    .map(|n| (RegionLabel::new(slot as u32 + 1), n))
            })
    }

    /// Each undirected edge once, as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (RegionLabel, RegionLabel)> + '_ {
        self.iter().flat_map(|(a, neighbors)| {
            neighbors
                .iter()
                .filter(move |b| a < **b)
                .map(move |b| (a, *b))
        })
    }

    pub fn to_adjacency_map(&self) -> HashMap<RegionLabel, HashSet<RegionLabel>> {
        self.iter()
            .map(|(label, neighbors)| (label, neighbors.iter().copied().collect()))
            .collect()
    }

    /// Converts to a `petgraph` undirected graph, with a lookup from label to node.
    #[cfg(feature = "petgraph")]
    pub fn to_petgraph(
        &self,
    ) -> (
        petgraph::graph::UnGraph<RegionLabel, ()>,
        HashMap<RegionLabel, petgraph::graph::NodeIndex>,
    ) {
        let mut graph = petgraph::graph::UnGraph::new_undirected();
        let nodes: HashMap<_, _> = self
            .iter()
            .map(|(label, _)| (label, graph.add_node(label)))
            .collect();

        for (a, b) in self.edges() {
            graph.add_edge(nodes[&a], nodes[&b], ());
        }

        (graph, nodes)
    }
}

/// Labels found in the 3x3 neighborhood of any boundary tile of `label`,
/// minus background and `label` itself. `None` if `label` owns no tiles.
fn adjacent_labels(labels: &TileMap<u32>, members: &[Vec<usize>], label: u32) -> Option<BTreeSet<RegionLabel>> {
    let own = members.get(label as usize).filter(|m| !m.is_empty())?;

    Some(
        boundary_of_members(labels, own, label)
            .into_iter()
            .flat_map(|xy| labels.neighbors(xy))
            .map(|adj| labels[adj])
            .filter(|value| *value != 0 && *value != label)
            .map(RegionLabel::new)
            .collect(),
    )
}
