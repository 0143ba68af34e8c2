//! Splits a floorplan raster into room and corridor regions and builds the
//! region adjacency graph.
//!
//! The pipeline runs in stages, each usable on its own:
//! [`segment_mask`] opens the traversable mask to separate rooms from
//! corridors, [`LabelRaster::from_segmented`] labels both into one raster
//! (corridors first, then rooms), [`RegionGraph::build`] scans region
//! perimeters for contacts, and [`collapse_dead_ends`] folds corridors with a
//! single neighbor into that neighbor.

mod config;
mod error;
pub mod morphology;
mod region_analysis;
mod tile_map;

pub use crate::config::{AnalysisConfig, Connectivity};
pub use crate::error::RegionError;
pub use crate::morphology::{KernelShape, StructuringElement};
pub use crate::region_analysis::boundary::boundary_points;
pub use crate::region_analysis::collapse::{collapse_dead_ends, Merge};
pub use crate::region_analysis::graph::RegionGraph;
pub use crate::region_analysis::labeling::{label_components, ComponentLabels, LabelRaster};
pub use crate::region_analysis::segment::{segment_mask, SegmentedMask};
pub use crate::region_analysis::{
    Centroid, FloorplanRegion, FloorplanRegionAnalysis, RegionKind, RegionLabel,
};
pub use crate::tile_map::{Direction, TileMap, TileXY};

pub fn get_region_analysis_for_mask(
    mask: &TileMap<bool>,
    config: &AnalysisConfig,
) -> Result<FloorplanRegionAnalysis, RegionError> {
    FloorplanRegionAnalysis::new_from_mask(mask, config)
}
