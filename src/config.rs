use crate::morphology::StructuringElement;

/// Which tiles count as touching when grouping tiles into components.
///
/// Adjacency between finished regions is always scanned over the full
/// 8-neighborhood, regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Connectivity {
    Four,
    #[default]
    Eight,
}

/// Tunable knobs for a region analysis.
///
/// Kernel shape and iteration count are fudge factors: different values give
/// different segmentations, each of them internally consistent. The defaults
/// are a 7 wide by 9 tall rectangle opened 12 times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub kernel: StructuringElement,
    pub iterations: usize,
    pub connectivity: Connectivity,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            kernel: StructuringElement::rect(7, 9),
            iterations: 12,
            connectivity: Connectivity::Eight,
        }
    }
}

impl AnalysisConfig {
    pub fn with_kernel(mut self, kernel: StructuringElement) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }
}
