
/// Holds top-level structs for region analysis
pub mod structs;

/// Splits a traversable mask into room and corridor masks
pub mod segment;

/// Connected-component labeling and the combined label raster
pub mod labeling;

/// Perimeter extraction for labeled components
pub mod boundary;

/// Region adjacency graph construction
pub mod graph;

/// Dead-end corridor collapsing
pub mod collapse;

pub use structs::{Centroid, FloorplanRegion, FloorplanRegionAnalysis, RegionKind, RegionLabel};
