//! Completion/help reporting over a registered grammar.
//!
//! A read-only walk of the tree that lists every executable path the given
//! context may reach, with its usage string and description. Paths behind a
//! help-visible gate whose predicate currently fails are omitted entirely.

use std::collections::HashSet;
use std::rc::Rc;

use serde::Serialize;

use crate::context::CommandContext;
use crate::node::{self, CommandNode, NodeRef};

/// One executable path: its usage string and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpEntry {
    /// Space-separated completion tokens from the root down, e.g.
    /// `tp <destination:position>`.
    pub usage: String,
    /// The path's description, inherited from the nearest described
    /// ancestor when the node has none.
    pub description: String,
}

/// Collects help entries for every executable node reachable by `ctx`.
///
/// Alias redirects make executable nodes reachable along several paths;
/// each node is collected once, under its canonical usage string.
pub(crate) fn collect(root: &CommandNode, ctx: &CommandContext) -> Vec<HelpEntry> {
    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    walk(&root.inner, ctx, &mut entries, &mut seen);
    entries
}

fn walk(
    node: &NodeRef,
    ctx: &CommandContext,
    entries: &mut Vec<HelpEntry>,
    seen: &mut HashSet<*const ()>,
) {
    let blocked = node.borrow().matcher.blocks_help(ctx);
    if blocked {
        return;
    }
    let executable = node.borrow().handler.is_some();
    if executable && seen.insert(Rc::as_ptr(node) as *const ()) {
        entries.push(HelpEntry {
            usage: node::usage_of(node),
            description: node::description_of(node),
        });
    }
    let children = node.borrow().children.clone();
    for child in &children {
        walk(child, ctx, entries, seen);
    }
}
