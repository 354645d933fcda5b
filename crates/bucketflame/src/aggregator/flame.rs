//! Assemble flame graph slices from classified runs.
//!
//! Depth is measured from the outermost label: depth `d` of a run with `n`
//! labels carries `labels[n - 1 - d]`, so runs of different lengths align
//! on their outer frames. At most one slice is open per depth. A label
//! change at depth `d` closes the slice there and every deeper open slice.
//! Slices are reported in the order they were opened.

use super::runs::Run;
use crate::rules::CategoryId;
use log::debug;

/// A maximal span during which one category stayed present at one depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlameSlice {
    pub category: CategoryId,

    /// Cumulative weight preceding the slice's first interval
    pub start: u64,

    /// Distance from the outermost frame
    pub depth: usize,

    pub weight: u64,
}

/// Flame graph of one thread
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlameGraph {
    pub slices: Vec<FlameSlice>,
    pub total_weight: u64,
    pub max_depth: usize,
}

/// Incremental flame graph builder
#[derive(Debug, Default)]
pub struct FlameAssembler {
    slices: Vec<FlameSlice>,
    /// Handles of open slices, indexed by depth
    open: Vec<usize>,
    total_weight: u64,
    max_depth: usize,
}

impl FlameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one run's label sequence (innermost label first)
    pub fn push(&mut self, labels: &[CategoryId], weight: u64) {
        let depth_count = labels.len();
        self.max_depth = self.max_depth.max(depth_count);

        for (depth, &category) in labels.iter().rev().enumerate() {
            if let Some(&handle) = self.open.get(depth) {
                if self.slices[handle].category != category {
                    self.open.truncate(depth);
                }
            }

            if depth == self.open.len() {
                self.slices.push(FlameSlice {
                    category,
                    start: self.total_weight,
                    depth,
                    weight: 0,
                });
                self.open.push(self.slices.len() - 1);
            }

            let handle = self.open[depth];
            self.slices[handle].weight += weight;
        }

        // Depths this run has no label for are closed
        self.open.truncate(depth_count);
        self.total_weight += weight;
    }

    /// Close all open slices and return the graph
    pub fn finish(self) -> FlameGraph {
        FlameGraph {
            slices: self.slices,
            total_weight: self.total_weight,
            max_depth: self.max_depth,
        }
    }
}

/// Build the flame graph of a merged, classified run sequence
///
/// **Public** - the flame assembler
pub fn assemble_flame(runs: &[Run<CategoryId>]) -> FlameGraph {
    let mut assembler = FlameAssembler::new();
    for run in runs {
        assembler.push(&run.items, run.weight);
    }
    let graph = assembler.finish();

    debug!(
        "Assembled {} slices (total weight {}, max depth {})",
        graph.slices.len(),
        graph.total_weight,
        graph.max_depth
    );
    graph
}
