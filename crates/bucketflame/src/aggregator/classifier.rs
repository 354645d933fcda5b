//! Map call stacks to category label sequences.
//!
//! Frames are scanned innermost first. For each frame the rule table is
//! scanned in priority order and the first rule that matches with a
//! category different from the last emitted label wins. Frames whose only
//! matches repeat the last label emit nothing. A frame no rule matches emits
//! the catch-all label only while nothing has been emitted yet, so unmatched
//! outer frames (`main`, `_start`) add no label and a stack that matches
//! nothing classifies as a single catch-all label.

use super::runs::Run;
use crate::rules::{CategoryId, RuleSet};
use log::debug;

/// Classify one call stack (innermost frame first)
///
/// **Public** - the bucket classifier
pub fn classify(stack: &[&str], rules: &RuleSet) -> Vec<CategoryId> {
    let mut labels = Vec::new();
    let mut last: Option<CategoryId> = None;

    for function in stack {
        let mut matched_any = false;
        let mut candidate = None;

        for rule in rules.rules() {
            if !rule.matches(function) {
                continue;
            }
            matched_any = true;
            if last != Some(rule.category) {
                candidate = Some(rule.category);
                break;
            }
        }

        let label = match candidate {
            Some(category) => Some(category),
            None if !matched_any && labels.is_empty() => Some(CategoryId::CATCH_ALL),
            None => None,
        };

        if let Some(label) = label {
            labels.push(label);
            last = Some(label);
        }
    }

    if labels.is_empty() {
        labels.push(CategoryId::CATCH_ALL);
    }

    labels
}

/// Classify every collapsed run, keeping weights
pub fn classify_runs(runs: &[Run<&str>], rules: &RuleSet) -> Vec<Run<CategoryId>> {
    let classified: Vec<Run<CategoryId>> = runs
        .iter()
        .map(|run| Run::new(classify(&run.items, rules), run.weight))
        .collect();

    let unmatched = classified
        .iter()
        .filter(|run| run.items.iter().all(|label| label.is_catch_all()))
        .count();
    debug!(
        "Classified {} runs against {} rules ({} unmatched)",
        classified.len(),
        rules.rules().len(),
        unmatched
    );
    classified
}
