//! The backtracking dispatch engine.
//!
//! Dispatch is an ordered depth-first search over the grammar tree: at each
//! node the matcher claims a prefix of the remaining input, then every child
//! is tried in declaration order against the remainder. The first fully
//! matched path wins; when every branch fails, the failure that reached the
//! deepest node is reported, since it is the most specific diagnostic.
//!
//! The engine never mutates the tree and performs no I/O; dispatching the
//! same line twice against an unmodified tree produces the same result.

use crate::context::CommandContext;
use crate::error::MatchError;
use crate::node::{CommandNode, NodeRef};
use crate::value::ArgValue;

/// The outcome of dispatching one input line.
#[derive(Debug)]
pub enum DispatchResult {
    /// A grammar path matched and its handler ran. A present `error` means
    /// the handler itself failed at runtime; the command was still
    /// syntactically valid.
    Executed { error: Option<anyhow::Error> },
    /// No executable path matched. `depth` is how far into the tree the
    /// best branch reached before producing `error`.
    Rejected { error: MatchError, depth: usize },
}

impl DispatchResult {
    /// Returns `true` if a handler was invoked, whether or not it failed.
    pub fn is_executed(&self) -> bool {
        matches!(self, DispatchResult::Executed { .. })
    }

    /// Returns `true` if a handler ran and returned `Ok`.
    pub fn execution_succeeded(&self) -> bool {
        matches!(self, DispatchResult::Executed { error: None })
    }

    /// The handler's runtime error, if it raised one.
    pub fn execution_error(&self) -> Option<&anyhow::Error> {
        match self {
            DispatchResult::Executed { error } => error.as_ref(),
            DispatchResult::Rejected { .. } => None,
        }
    }

    /// The parse failure and the depth it was produced at, if no path
    /// matched.
    pub fn rejection(&self) -> Option<(&MatchError, usize)> {
        match self {
            DispatchResult::Rejected { error, depth } => Some((error, *depth)),
            DispatchResult::Executed { .. } => None,
        }
    }
}

/// Evaluates `input` against the subtree rooted at `node`.
pub(crate) fn evaluate(
    node: &CommandNode,
    ctx: &CommandContext,
    input: &str,
    args: &[ArgValue],
) -> DispatchResult {
    evaluate_ref(&node.inner, ctx, input, args)
}

fn evaluate_ref(
    node: &NodeRef,
    ctx: &CommandContext,
    input: &str,
    args: &[ArgValue],
) -> DispatchResult {
    if input.is_empty() {
        let handler = node.borrow().handler.clone();
        return match handler {
            Some(run) => match run(ctx, args) {
                Ok(()) => DispatchResult::Executed { error: None },
                Err(error) => DispatchResult::Executed { error: Some(error) },
            },
            None => DispatchResult::Rejected {
                error: MatchError::UnexpectedEnd,
                depth: node.borrow().depth,
            },
        };
    }

    let trimmed = input.trim();
    let matched = node.borrow().matcher.matches(trimmed, ctx);
    let success = match matched {
        Ok(success) => success,
        Err(error) => {
            return DispatchResult::Rejected {
                error,
                depth: node.borrow().depth,
            }
        }
    };

    // A misbehaving custom matcher could claim a non-boundary prefix; treat
    // that as having consumed the whole line rather than panic mid-dispatch.
    let remainder = trimmed.get(success.consumed..).unwrap_or("");

    let mut child_args = args.to_vec();
    if success.push {
        if let Some(value) = success.value {
            child_args.push(value);
        }
    }

    let children = node.borrow().children.clone();
    let mut best: Option<(MatchError, usize)> = None;
    for child in &children {
        match evaluate_ref(child, ctx, remainder, &child_args) {
            executed @ DispatchResult::Executed { .. } => return executed,
            DispatchResult::Rejected { error, depth } => {
                // Deepest failure wins; first occurrence wins ties.
                let deeper = best.as_ref().map_or(true, |(_, d)| depth > *d);
                if deeper {
                    best = Some((error, depth));
                }
            }
        }
    }

    match best {
        Some((error, depth)) => DispatchResult::Rejected { error, depth },
        None => DispatchResult::Rejected {
            error: MatchError::NoResults,
            depth: node.borrow().depth,
        },
    }
}
