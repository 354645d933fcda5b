//! Reconstruct per-sample call stacks from the shared stack tree.
//!
//! A resolved call stack lists function names from the sample's leaf node
//! to the root, both included. Names borrow from the thread's string table.

use crate::parser::ThreadProfile;
use crate::utils::error::AggregateError;
use log::debug;

/// Function names, innermost frame first
pub type ResolvedCallStack<'a> = Vec<&'a str>;

/// Walk from `leaf` to the root of the thread's stack tree
///
/// **Public** - the call-stack resolver
///
/// An absent leaf (idle sample) resolves to an empty stack. The walk visits
/// at most as many nodes as the tree holds; a longer chain can only come
/// from a cycle and is reported as [`AggregateError::MalformedStackTree`].
pub fn resolve_call_stack(
    thread: &ThreadProfile,
    leaf: Option<usize>,
) -> Result<ResolvedCallStack<'_>, AggregateError> {
    let mut stack = Vec::new();
    let Some(leaf) = leaf else {
        return Ok(stack);
    };

    let tree = &thread.stack_tree;
    let limit = tree.len();
    let mut index = leaf;

    loop {
        if stack.len() >= limit {
            return Err(AggregateError::MalformedStackTree { node: leaf, limit });
        }
        let node = tree.get(index).ok_or(AggregateError::StackOutOfRange {
            index,
            len: limit,
        })?;
        stack.push(function_name(thread, node.func)?);

        match node.parent {
            Some(parent) => index = parent,
            None => break,
        }
    }

    Ok(stack)
}

/// Resolve every sample of a thread, in sample order
///
/// Consecutive samples pointing at the same leaf reuse the previous walk.
pub fn resolve_samples(
    thread: &ThreadProfile,
) -> Result<Vec<ResolvedCallStack<'_>>, AggregateError> {
    let mut stacks: Vec<ResolvedCallStack<'_>> = Vec::with_capacity(thread.samples.len());
    let mut previous_leaf = None;

    for sample in &thread.samples {
        let stack = match stacks.last() {
            Some(last) if previous_leaf == Some(sample.stack) => last.clone(),
            _ => resolve_call_stack(thread, sample.stack)?,
        };
        previous_leaf = Some(sample.stack);
        stacks.push(stack);
    }

    debug!(
        "Resolved {} samples of thread '{}'",
        stacks.len(),
        thread.name
    );
    Ok(stacks)
}

fn function_name(thread: &ThreadProfile, func: usize) -> Result<&str, AggregateError> {
    let name = *thread
        .func_table
        .name
        .get(func)
        .ok_or(AggregateError::FuncOutOfRange {
            index: func,
            len: thread.func_table.len(),
        })?;
    thread
        .string_table
        .get(name)
        .ok_or(AggregateError::StringOutOfRange {
            index: name,
            len: thread.string_table.len(),
        })
}
