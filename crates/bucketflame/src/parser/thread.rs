//! Per-thread profile data in arena form.
//!
//! Every table is column-oriented and indexed by plain `usize` handles,
//! the same way the processed profile stores them. Parent links in the
//! stack tree are indices, so the tree never owns its nodes cyclically.

use std::collections::HashMap;

/// One captured instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Timestamp in milliseconds, relative to `meta.startTime`
    pub time: f64,

    /// Leaf node in the stack tree; `None` for idle samples
    pub stack: Option<usize>,
}

/// A node of the shared call-stack tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackNode {
    /// Parent node; `None` marks a root
    pub parent: Option<usize>,

    /// Function table index
    pub func: usize,
}

/// Shared parent-pointer call-stack tree
#[derive(Debug, Clone, Default)]
pub struct CallStackTree {
    nodes: Vec<StackNode>,
}

impl CallStackTree {
    pub fn new(nodes: Vec<StackNode>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StackNode> {
        self.nodes.get(index)
    }

    /// Point every node at its function's replacement.
    ///
    /// Used after symbolication merged duplicate functions. Functions
    /// missing from `remap` keep their index.
    pub fn remap_funcs(&mut self, remap: &HashMap<usize, usize>) {
        for node in &mut self.nodes {
            if let Some(&target) = remap.get(&node.func) {
                node.func = target;
            }
        }
    }
}

/// Function table (column layout)
#[derive(Debug, Clone, Default)]
pub struct FuncTable {
    /// String table index of each function's name
    pub name: Vec<usize>,

    /// Resource table index (the library or script owning the function)
    pub resource: Vec<Option<usize>>,

    /// Library-relative address, for native functions awaiting symbolication
    pub address: Vec<Option<u64>>,
}

impl FuncTable {
    pub fn len(&self) -> usize {
        self.name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Resource table (column layout)
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    /// Index into the profile's library list
    pub lib: Vec<Option<usize>>,

    /// String table index of the resource name
    pub name: Vec<usize>,
}

/// Interned strings
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    strings: Vec<String>,
    index: HashMap<String, usize>,
}

impl StringTable {
    pub fn new(strings: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(strings.len());
        for (i, s) in strings.iter().enumerate() {
            index.entry(s.clone()).or_insert(i);
        }
        Self { strings, index }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Return the index of `s`, appending it if it is new
    pub fn intern(&mut self, s: &str) -> usize {
        if let Some(&i) = self.index.get(s) {
            return i;
        }
        let i = self.strings.len();
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), i);
        i
    }
}

/// Everything one aggregation pass reads for a thread
#[derive(Debug, Clone, Default)]
pub struct ThreadProfile {
    pub name: String,
    pub samples: Vec<Sample>,
    pub stack_tree: CallStackTree,
    pub func_table: FuncTable,
    pub resource_table: ResourceTable,
    pub string_table: StringTable,
}

impl ThreadProfile {
    /// Time span covered by the samples, in milliseconds
    pub fn duration_ms(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    /// Library index owning a function, if any
    pub fn func_lib(&self, func: usize) -> Option<usize> {
        let resource = (*self.func_table.resource.get(func)?)?;
        *self.resource_table.lib.get(resource)?
    }
}
