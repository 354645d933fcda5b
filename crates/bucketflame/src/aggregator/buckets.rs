//! Per-category top (leaf) and tail (ancestor) time totals.

use super::runs::Run;
use crate::rules::CategoryId;

/// Accumulated weights of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketTotals {
    pub category: CategoryId,

    /// Weight of runs whose innermost label is this category
    pub top_weight: u64,

    /// Weight of runs where this category only appears as an ancestor
    pub tail_weight: u64,
}

/// Accumulates [`BucketTotals`] for every category of a rule set
#[derive(Debug, Clone)]
pub struct BucketAccumulator {
    totals: Vec<BucketTotals>,
}

impl BucketAccumulator {
    pub fn new(category_count: usize) -> Self {
        let totals = (0..category_count.max(1))
            .map(|i| BucketTotals {
                category: CategoryId(i as u16),
                top_weight: 0,
                tail_weight: 0,
            })
            .collect();
        Self { totals }
    }

    /// Account one run. Each category counts once per run: the innermost
    /// label feeds `top_weight`, every other distinct category `tail_weight`.
    pub fn add(&mut self, labels: &[CategoryId], weight: u64) {
        let mut seen: Vec<CategoryId> = Vec::with_capacity(labels.len());

        for (position, &category) in labels.iter().enumerate() {
            if seen.contains(&category) {
                continue;
            }
            seen.push(category);

            let Some(totals) = self.totals.get_mut(category.index()) else {
                continue;
            };
            if position == 0 {
                totals.top_weight += weight;
            } else {
                totals.tail_weight += weight;
            }
        }
    }

    pub fn finish(self) -> Vec<BucketTotals> {
        self.totals
    }
}

/// Compute top/tail totals of a merged, classified run sequence
///
/// **Public** - the bucket accumulator
pub fn accumulate_buckets(runs: &[Run<CategoryId>], category_count: usize) -> Vec<BucketTotals> {
    let mut accumulator = BucketAccumulator::new(category_count);
    for run in runs {
        accumulator.add(&run.items, run.weight);
    }
    accumulator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAR: CategoryId = CategoryId::CATCH_ALL;
    const JS: CategoryId = CategoryId(1);
    const CSS: CategoryId = CategoryId(2);

    #[test]
    fn test_top_and_tail() {
        let totals = accumulate_buckets(&[Run::new(vec![STAR, JS], 5)], 3);
        assert_eq!(totals[0].top_weight, 5);
        assert_eq!(totals[0].tail_weight, 0);
        assert_eq!(totals[1].top_weight, 0);
        assert_eq!(totals[1].tail_weight, 5);
        assert_eq!(totals[2], BucketTotals { category: CSS, top_weight: 0, tail_weight: 0 });
    }

    #[test]
    fn test_repeated_category_counts_once() {
        let totals = accumulate_buckets(&[Run::new(vec![JS, CSS, JS, STAR, CSS], 2)], 3);
        assert_eq!(totals[JS.index()].top_weight, 2);
        assert_eq!(totals[JS.index()].tail_weight, 0);
        assert_eq!(totals[CSS.index()].tail_weight, 2);
        assert_eq!(totals[STAR.index()].tail_weight, 2);
    }

    #[test]
    fn test_accumulates_across_runs() {
        let runs = vec![
            Run::new(vec![JS], 3),
            Run::new(vec![CSS, JS], 2),
            Run::new(vec![STAR], 1),
        ];
        let totals = accumulate_buckets(&runs, 3);
        assert_eq!(totals[JS.index()].top_weight, 3);
        assert_eq!(totals[JS.index()].tail_weight, 2);
        assert_eq!(totals[CSS.index()].top_weight, 2);
        assert_eq!(totals[STAR.index()].top_weight, 1);

        let top_sum: u64 = totals.iter().map(|t| t.top_weight).sum();
        assert_eq!(top_sum, 6);
    }
}
