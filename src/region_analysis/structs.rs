use std::collections::BTreeSet;
use std::fmt;

use log::{debug, info};

use crate::config::AnalysisConfig;
use crate::error::RegionError;
use crate::tile_map::{TileMap, TileXY};
use super::boundary::boundary_of_members;
use super::collapse::{collapse_dead_ends_with_members, Merge};
use super::graph::RegionGraph;
use super::labeling::LabelRaster;
use super::segment::segment_mask;

/// Room/corridor segmentation of a floorplan, its label raster and the
/// region adjacency graph built from it.
#[derive(Debug, Clone)]
pub struct FloorplanRegionAnalysis {
    raster: LabelRaster,
    members: Vec<Vec<usize>>,
    graph: RegionGraph,
    initial_graph: RegionGraph,
    merges: Vec<Merge>,
}

impl FloorplanRegionAnalysis {
    pub fn new_from_mask(mask: &TileMap<bool>, config: &AnalysisConfig) -> Result<Self, RegionError> {
        let segmented = segment_mask(mask, &config.kernel, config.iterations)?;
        let raster = LabelRaster::from_segmented(&segmented, config.connectivity)?;
        Ok(Self::new_from_raster(raster))
    }

    /// Builds the graph for an already labeled raster.
    pub fn new_from_raster(raster: LabelRaster) -> Self {
        let members = raster.members_by_label();
        debug!("building graph");
        let graph = RegionGraph::build_from_members(&raster, &members);
        info!(
            "floorplan analysis: {} corridors, {} rooms, {} adjacencies",
            raster.num_corridors(),
            raster.num_rooms(),
            graph.edges().count()
        );

        Self {
            raster,
            members,
            initial_graph: graph.clone(),
            graph,
            merges: Vec::new(),
        }
    }

    /// Merges every corridor with exactly one neighbor into that neighbor,
    /// deciding all merges from the graph as it was before the pass, then
    /// rebuilds the graph. Returns the merges made by this pass.
    pub fn collapse_dead_ends(&mut self) -> &[Merge] {
        let start = self.merges.len();
        let merges = collapse_dead_ends_with_members(&mut self.raster, &self.graph, &mut self.members);
        self.merges.extend(merges);

        if self.merges.len() > start {
            debug!("rebuilding graph after {} merges", self.merges.len() - start);
            self.graph = RegionGraph::build_from_members(&self.raster, &self.members);
        }

        &self.merges[start..]
    }

    pub fn get_label_raster(&self) -> &LabelRaster {
        &self.raster
    }

    /// The graph for the current label raster.
    pub fn get_regions_graph(&self) -> &RegionGraph {
        &self.graph
    }

    /// The graph as it was before any dead-end collapsing.
    pub fn get_initial_graph(&self) -> &RegionGraph {
        &self.initial_graph
    }

    /// All merges made so far, in the order they were applied.
    pub fn get_merges(&self) -> &[Merge] {
        &self.merges
    }

    pub fn num_corridors(&self) -> u32 {
        self.raster.num_corridors()
    }

    pub fn num_rooms(&self) -> u32 {
        self.raster.num_rooms()
    }

    pub fn num_labels(&self) -> u32 {
        self.raster.num_labels()
    }

    pub fn get_label_for_xy(&self, xy: TileXY) -> Option<RegionLabel> {
        self.raster.label_at(xy)
    }

    /// Neighbors of `label` in the current graph, or `None` if the label no
    /// longer owns any tiles.
    pub fn get_neighbors(&self, label: RegionLabel) -> Result<Option<&BTreeSet<RegionLabel>>, RegionError> {
        self.raster.check_label(label)?;
        Ok(self.graph.get_neighbors(label))
    }

    /// Perimeter tiles of `label`, in row-major order.
    pub fn get_boundary(&self, label: RegionLabel) -> Result<Vec<TileXY>, RegionError> {
        self.raster.check_label(label)?;
        Ok(boundary_of_members(
            self.raster.labels(),
            &self.members[label.value() as usize],
            label.value(),
        ))
    }

    pub fn get_region(&self, label: RegionLabel) -> Result<Option<FloorplanRegion>, RegionError> {
        let kind = self.raster.check_label(label)?;
        let members = &self.members[label.value() as usize];
        if members.is_empty() {
            return Ok(None);
        }

        let labels = self.raster.labels();
        Ok(Some(FloorplanRegion::new(
            label,
            kind,
            members.iter().map(|idx| labels.xy_of(*idx)).collect(),
        )))
    }

    /// Every region that currently owns tiles, in label order.
    pub fn get_regions(&self) -> Vec<FloorplanRegion> {
        let labels = self.raster.labels();
        self.members
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, members)| !members.is_empty())
            .filter_map(|(value, members)| {
                let label = RegionLabel::new(value as u32);
                let kind = self.raster.kind_of(label)?;
                Some(FloorplanRegion::new(
                    label,
                    kind,
                    members.iter().map(|idx| labels.xy_of(*idx)).collect(),
                ))
            })
            .collect()
    }
}

/// A single connected region of the label raster.
#[derive(Debug, Clone)]
pub struct FloorplanRegion {
    label: RegionLabel,
    kind: RegionKind,
    members: Vec<TileXY>,
}

impl FloorplanRegion {
    fn new(label: RegionLabel, kind: RegionKind, members: Vec<TileXY>) -> Self {
        Self { label, kind, members }
    }

    pub fn get_label(&self) -> RegionLabel {
        self.label
    }

    pub fn get_kind(&self) -> RegionKind {
        self.kind
    }

    pub fn get_members(&self) -> &[TileXY] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get_centroid(&self) -> Option<Centroid> {
        Centroid::of(&self.members)
    }
}

/// Mean tile position of a region, weighted by tile count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    pub fn of(members: &[TileXY]) -> Option<Centroid> {
        if members.is_empty() {
            return None;
        }

        let (sum_x, sum_y) = members
            .iter()
            .fold((0f64, 0f64), |(sx, sy), xy| (sx + xy.x as f64, sy + xy.y as f64));
        let count = members.len() as f64;
        Some(Centroid {
            x: sum_x / count,
            y: sum_y / count,
        })
    }

    /// Truncates to the tile the centroid falls in.
    pub fn to_tile(&self) -> TileXY {
        TileXY::new(self.x as usize, self.y as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Corridor,
    Room,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionKind::Corridor => write!(f, "corridor"),
            RegionKind::Room => write!(f, "room"),
        }
    }
}

/// A non-zero value of the label raster.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct RegionLabel {
    value: u32,
}

impl RegionLabel {
    pub const fn new(value: u32) -> Self {
        Self { value }
    }

    pub const fn value(&self) -> u32 {
        self.value
    }
}

impl From<u32> for RegionLabel {
    fn from(value: u32) -> Self {
        Self { value }
    }
}

impl fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::StructuringElement;

    fn analyze(text: &str) -> FloorplanRegionAnalysis {
        let mask = TileMap::from_ascii(text).unwrap();
        let config = AnalysisConfig::default()
            .with_kernel(StructuringElement::square3())
            .with_iterations(1);
        FloorplanRegionAnalysis::new_from_mask(&mask, &config).unwrap()
    }

    const DEAD_END: &str = "
        #######
        #...###
        #...###
        #......
        #######
    ";

    #[test]
    fn dead_end_corridor_is_merged_into_its_room() {
        let mut analysis = analyze(DEAD_END);
        assert_eq!(analysis.num_corridors(), 1);
        assert_eq!(analysis.num_rooms(), 1);

        let corridor = RegionLabel::new(1);
        let room = RegionLabel::new(2);
        assert_eq!(analysis.get_label_for_xy(TileXY::new(5, 3)), Some(corridor));

        let merges = analysis.collapse_dead_ends().to_vec();
        assert_eq!(merges, vec![Merge { corridor, into: room }]);
        assert_eq!(analysis.get_label_for_xy(TileXY::new(5, 3)), Some(room));
        assert_eq!(analysis.get_neighbors(corridor).unwrap(), None);
        assert!(analysis.get_region(corridor).unwrap().is_none());
        assert_eq!(analysis.get_region(room).unwrap().unwrap().len(), 12);

        // the pre-collapse checkpoint is untouched
        let initial = analysis.get_initial_graph();
        assert_eq!(initial.get_neighbors(corridor), Some(&BTreeSet::from([room])));

        assert!(analysis.collapse_dead_ends().is_empty());
        assert_eq!(analysis.get_merges().len(), 1);
    }

    #[test]
    fn out_of_range_queries_fail() {
        let analysis = analyze(DEAD_END);
        let err = RegionError::LabelOutOfRange { label: 3, num_labels: 2 };
        assert_eq!(analysis.get_neighbors(RegionLabel::new(3)).unwrap_err(), err);
        assert_eq!(analysis.get_boundary(RegionLabel::new(3)).unwrap_err(), err);
        assert!(analysis.get_region(RegionLabel::new(0)).is_err());
    }

    #[test]
    fn regions_report_kind_and_centroid() {
        let analysis = analyze(DEAD_END);
        let regions = analysis.get_regions();
        assert_eq!(regions.len(), 2);

        assert_eq!(regions[0].get_kind(), RegionKind::Corridor);
        assert_eq!(regions[0].len(), 3);
        let centroid = regions[0].get_centroid().unwrap();
        assert_eq!(centroid, Centroid { x: 5.0, y: 3.0 });

        assert_eq!(regions[1].get_kind(), RegionKind::Room);
        assert_eq!(regions[1].get_centroid().unwrap().to_tile(), TileXY::new(2, 2));
    }

    #[test]
    fn boundary_of_room_skips_its_interior() {
        let analysis = analyze(DEAD_END);
        let boundary = analysis.get_boundary(RegionLabel::new(2)).unwrap();
        assert_eq!(boundary.len(), 8);
        assert!(!boundary.contains(&TileXY::new(2, 2)));
    }
}
