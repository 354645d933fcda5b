//! Run collapsing.
//!
//! Both the call-stack collapser and the classification merger fold
//! consecutive equal sequences into one weighted run. Equality is exact:
//! same length, same elements, same order. Total weight is preserved.

use super::call_stack::ResolvedCallStack;
use crate::rules::CategoryId;
use log::debug;

/// A maximal group of consecutive samples sharing one representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<T> {
    /// Representative sequence (call stack or label sequence)
    pub items: Vec<T>,

    /// Number of sampling intervals the run covers
    pub weight: u64,
}

impl<T> Run<T> {
    pub fn new(items: Vec<T>, weight: u64) -> Self {
        Self { items, weight }
    }
}

/// Fold consecutive runs with equal sequences, summing weights
pub fn collapse<T: PartialEq>(runs: impl IntoIterator<Item = Run<T>>) -> Vec<Run<T>> {
    let mut collapsed: Vec<Run<T>> = Vec::new();

    for run in runs {
        match collapsed.last_mut() {
            Some(last) if last.items == run.items => last.weight += run.weight,
            _ => collapsed.push(run),
        }
    }

    collapsed
}

/// Collapse per-sample call stacks into weighted runs
///
/// **Public** - the run collapser; every input stack weighs one interval
pub fn collapse_call_stacks<'a>(
    stacks: impl IntoIterator<Item = ResolvedCallStack<'a>>,
) -> Vec<Run<&'a str>> {
    let runs = collapse(stacks.into_iter().map(|stack| Run::new(stack, 1)));
    debug!("Collapsed call stacks into {} runs", runs.len());
    runs
}

/// Merge consecutive runs with identical label sequences
///
/// **Public** - the classification merger
pub fn merge_classified(runs: Vec<Run<CategoryId>>) -> Vec<Run<CategoryId>> {
    let before = runs.len();
    let merged = collapse(runs);
    debug!("Merged {} classified runs into {}", before, merged.len());
    merged
}

/// Drop leading runs until `intervals` sampling intervals are consumed
///
/// A run is dropped only while the remaining budget stays positive after
/// subtracting its weight, so the run straddling the threshold is kept
/// whole. Returns the kept runs and the dropped weight.
pub fn skip_leading<T>(runs: Vec<Run<T>>, intervals: u64) -> (Vec<Run<T>>, u64) {
    let mut budget = intervals;
    let mut skipped = 0;
    let mut kept = Vec::with_capacity(runs.len());

    for run in runs {
        if kept.is_empty() && run.weight < budget {
            budget -= run.weight;
            skipped += run.weight;
            continue;
        }
        kept.push(run);
    }

    (kept, skipped)
}

/// Sum of run weights
pub fn total_weight<T>(runs: &[Run<T>]) -> u64 {
    runs.iter().map(|r| r.weight).sum()
}
