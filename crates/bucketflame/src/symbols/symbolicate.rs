//! Rewrite a thread's native function names from a [`SymbolProvider`].

use super::SymbolProvider;
use crate::parser::{Library, ThreadProfile};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};

/// What a symbolication pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolicationReport {
    /// Distinct (debugName, debugId) pairs queried
    pub libraries: usize,
    pub failed_libraries: usize,
    pub renamed_funcs: usize,

    /// Functions folded into another function of the same symbol
    pub merged_funcs: usize,
}

/// Symbolicate every function of `thread` that belongs to a library
///
/// **Public** - must run before aggregation
///
/// The provider is asked once per distinct `(debugName, debugId)` pair.
/// Functions of one library resolving to the same symbol start are merged:
/// stack nodes of the later functions are pointed at the first one. A
/// failing provider call is logged and leaves those names untouched.
pub fn symbolicate_thread(
    thread: &mut ThreadProfile,
    libs: &[Library],
    provider: &dyn SymbolProvider,
) -> SymbolicationReport {
    let mut report = SymbolicationReport::default();
    let groups = group_by_library(thread, libs);

    let mut renames: Vec<(usize, String)> = Vec::new();
    let mut remap: HashMap<usize, usize> = HashMap::new();

    for ((debug_name, debug_id), group) in &groups {
        report.libraries += 1;
        let library = &libs[group.lib];

        let mut addresses: Vec<u64> = group.funcs.iter().map(|&(_, address)| address).collect();
        addresses.sort_unstable();
        addresses.dedup();

        let table = match provider.resolve_symbols(library, &addresses) {
            Ok(table) => table,
            Err(e) => {
                warn!(
                    "Symbolication of {} ({}) failed: {}",
                    debug_name,
                    debug_id.as_deref().unwrap_or("no id"),
                    e
                );
                report.failed_libraries += 1;
                continue;
            }
        };

        let mut first_by_start: HashMap<u64, usize> = HashMap::new();
        for &(func, address) in &group.funcs {
            let Some((start, name)) = table.lookup(address) else {
                continue;
            };
            match first_by_start.get(&start) {
                Some(&first) => {
                    remap.insert(func, first);
                }
                None => {
                    first_by_start.insert(start, func);
                    renames.push((func, name.to_string()));
                }
            }
        }
    }

    for (func, name) in renames {
        let index = thread.string_table.intern(&name);
        if let Some(slot) = thread.func_table.name.get_mut(func) {
            *slot = index;
            report.renamed_funcs += 1;
        }
    }

    report.merged_funcs = remap.len();
    if !remap.is_empty() {
        thread.stack_tree.remap_funcs(&remap);
    }

    info!(
        "Symbolicated thread '{}': {} libraries ({} failed), {} functions renamed, {} merged",
        thread.name,
        report.libraries,
        report.failed_libraries,
        report.renamed_funcs,
        report.merged_funcs
    );
    report
}

struct LibraryGroup {
    /// First library index with this (debugName, debugId)
    lib: usize,
    /// (func, address) in function order
    funcs: Vec<(usize, u64)>,
}

fn group_by_library(
    thread: &ThreadProfile,
    libs: &[Library],
) -> BTreeMap<(String, Option<String>), LibraryGroup> {
    let mut groups: BTreeMap<(String, Option<String>), LibraryGroup> = BTreeMap::new();

    for func in 0..thread.func_table.len() {
        let Some(Some(address)) = thread.func_table.address.get(func).copied() else {
            continue;
        };
        let Some(lib) = thread.func_lib(func).filter(|&lib| lib < libs.len()) else {
            continue;
        };

        let library = &libs[lib];
        let key = (library.debug_name().to_string(), library.debug_id.clone());
        groups
            .entry(key)
            .or_insert_with(|| LibraryGroup {
                lib,
                funcs: Vec::new(),
            })
            .funcs
            .push((func, address));
    }

    debug!(
        "Thread '{}' references {} symbolicable libraries",
        thread.name,
        groups.len()
    );
    groups
}
