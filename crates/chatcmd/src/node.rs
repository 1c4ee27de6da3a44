//! The command grammar tree and its chaining builder.
//!
//! A [`CommandNode`] is one grammar fragment: a matcher, an ordered child
//! list, an optional handler, and an optional description. Builder methods
//! create a child bound under the current node and return it, so grammars
//! read as chains:
//!
//! ```
//! use chatcmd::literal;
//!
//! let tp = literal("tp")
//!     .description("teleport to a position")
//!     .position("destination")
//!     .executes(|_ctx, _args| Ok(()));
//! ```
//!
//! Inside the tree, a parent owns its children and a child keeps only a
//! `Weak` back-reference, so the tree stays acyclic from an ownership
//! perspective. The public `CommandNode` handle additionally anchors the
//! head of the chain it was built in: a chain stays alive as long as any
//! handle into it exists, even when the intermediate builder temporaries
//! have been dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::context::CommandContext;
use crate::matcher::{ArgumentMatcher, Matcher};
use crate::value::ArgValue;

/// Callback invoked when a grammar path is fully matched.
pub type Handler = Rc<dyn Fn(&CommandContext, &[ArgValue]) -> anyhow::Result<()>>;

/// Owning link to a node inside the tree.
pub(crate) type NodeRef = Rc<RefCell<NodeInner>>;

pub(crate) struct NodeInner {
    pub(crate) matcher: Matcher,
    /// Insertion order is trial order during dispatch.
    pub(crate) children: Vec<NodeRef>,
    pub(crate) parent: Option<Weak<RefCell<NodeInner>>>,
    pub(crate) depth: usize,
    pub(crate) handler: Option<Handler>,
    pub(crate) description: Option<String>,
}

/// One fragment of the command grammar tree.
///
/// Cloning a `CommandNode` clones the handle, not the subtree.
#[derive(Clone)]
pub struct CommandNode {
    pub(crate) inner: NodeRef,
    /// Strong anchor to the head of the chain this handle was built in.
    /// Children are owned top-down and parents are `Weak`, so without the
    /// anchor a chain's upper fragments would be freed as soon as the
    /// builder temporaries drop, leaving [`CommandNode::chain_root`] with
    /// nothing to walk up to.
    head: NodeRef,
}

/// Starts a detached grammar chain with a literal fragment.
///
/// The chain is attached to a registry later via
/// [`CommandRegistry::register`](crate::CommandRegistry::register).
pub fn literal(text: impl Into<String>) -> CommandNode {
    CommandNode::with_matcher(Matcher::literal(text))
}

/// Sets parent and depth on `node`, then renumbers the whole subtree below.
pub(crate) fn rebind(node: &NodeRef, depth: usize, parent: Weak<RefCell<NodeInner>>) {
    {
        let mut inner = node.borrow_mut();
        inner.depth = depth;
        inner.parent = Some(parent);
    }
    let children = node.borrow().children.clone();
    for child in &children {
        rebind(child, depth + 1, Rc::downgrade(node));
    }
}

/// This node's description, else the nearest ancestor's, else a default
/// placeholder.
pub(crate) fn description_of(node: &NodeRef) -> String {
    let mut current = node.clone();
    loop {
        if let Some(text) = current.borrow().description.clone() {
            return text;
        }
        let parent = current.borrow().parent.as_ref().and_then(Weak::upgrade);
        match parent {
            Some(next) => current = next,
            None => return "No description provided".to_string(),
        }
    }
}

/// Root-to-leaf concatenation of non-empty completion tokens.
pub(crate) fn usage_of(node: &NodeRef) -> String {
    let mut tokens = Vec::new();
    let mut current = node.clone();
    loop {
        let token = current.borrow().matcher.completion_token();
        if !token.is_empty() {
            tokens.push(token);
        }
        let parent = current.borrow().parent.as_ref().and_then(Weak::upgrade);
        match parent {
            Some(next) => current = next,
            None => break,
        }
    }
    tokens.reverse();
    tokens.join(" ")
}

impl CommandNode {
    /// A root node whose matcher always succeeds consuming nothing.
    pub(crate) fn root() -> Self {
        Self::with_matcher(Matcher::Root)
    }

    pub(crate) fn with_matcher(matcher: Matcher) -> Self {
        let inner = Rc::new(RefCell::new(NodeInner {
            matcher,
            children: Vec::new(),
            parent: None,
            depth: 0,
            handler: None,
            description: None,
        }));
        Self {
            head: inner.clone(),
            inner,
        }
    }

    /// Binds a new child under `self` and returns it. The child handle
    /// anchors the same chain head as `self`.
    fn bind(&self, matcher: Matcher) -> CommandNode {
        let child = CommandNode::with_matcher(matcher);
        self.attach(&child);
        CommandNode {
            inner: child.inner,
            head: self.head.clone(),
        }
    }

    fn attach(&self, child: &CommandNode) {
        let depth = self.inner.borrow().depth;
        self.inner.borrow_mut().children.push(child.inner.clone());
        rebind(&child.inner, depth + 1, Rc::downgrade(&self.inner));
    }

    /// Adds a literal fragment and returns the new child.
    pub fn literal(&self, text: impl Into<String>) -> CommandNode {
        self.bind(Matcher::literal(text))
    }

    /// Adds a number argument named `name` and returns the new child.
    pub fn number(&self, name: impl Into<String>) -> CommandNode {
        self.bind(Matcher::number(name))
    }

    /// Adds a string argument and returns the new child. A greedy string
    /// swallows the entire remainder of the line.
    pub fn string(&self, name: impl Into<String>, greedy: bool) -> CommandNode {
        self.bind(Matcher::string(name, greedy))
    }

    /// Adds a position argument named `name` and returns the new child.
    pub fn position(&self, name: impl Into<String>) -> CommandNode {
        self.bind(Matcher::position(name))
    }

    /// Adds a host-defined argument kind and returns the new child.
    pub fn argument(
        &self,
        name: impl Into<String>,
        matcher: impl ArgumentMatcher + 'static,
    ) -> CommandNode {
        self.bind(Matcher::custom(name, matcher))
    }

    /// Adds a permission/condition gate and returns the new child. The gate
    /// consumes no input; `counts_for_help` decides whether the help
    /// reporter hides paths behind it when the predicate is false.
    pub fn requires(
        &self,
        predicate: impl Fn(&CommandContext) -> bool + 'static,
        message: impl Into<String>,
        counts_for_help: bool,
    ) -> CommandNode {
        self.bind(Matcher::requires(predicate, message, counts_for_help))
    }

    /// Marks this path executable by binding a synthetic placeholder child
    /// that carries the handler. Returns `self` so a description can still
    /// be chained.
    pub fn executes(
        &self,
        handler: impl Fn(&CommandContext, &[ArgValue]) -> anyhow::Result<()> + 'static,
    ) -> CommandNode {
        let action = self.bind(Matcher::Root);
        action.inner.borrow_mut().handler = Some(Rc::new(handler));
        self.clone()
    }

    /// Sets this node's description. Descendants without one inherit it.
    pub fn description(&self, text: impl Into<String>) -> CommandNode {
        self.inner.borrow_mut().description = Some(text.into());
        self.clone()
    }

    /// Attaches an already-built subtree as a child, renumbering depths
    /// under it.
    pub fn add(&self, subtree: &CommandNode) {
        self.attach(subtree);
    }

    /// Splices the subtree's current children into this node's child list.
    ///
    /// The child nodes themselves are shared, not copied, so both paths
    /// dispatch through the same grammar and handlers. The spliced children
    /// keep their original parent and depth: usage strings and failure
    /// depths always describe the canonical path. Children appended to the
    /// subtree after this call are not picked up.
    pub fn redirect(&self, subtree: &CommandNode) {
        let spliced = subtree.inner.borrow().children.clone();
        self.inner.borrow_mut().children.extend(spliced);
    }

    /// Walks parent references to the top of the chain this node was built
    /// in. The handle's anchor keeps every fragment on the way up alive, so
    /// this works no matter how the chain was assembled.
    pub(crate) fn chain_root(&self) -> CommandNode {
        let mut current = self.inner.clone();
        loop {
            let parent = current.borrow().parent.as_ref().and_then(Weak::upgrade);
            match parent {
                Some(next) => current = next,
                None => {
                    return CommandNode {
                        head: current.clone(),
                        inner: current,
                    }
                }
            }
        }
    }

    /// Distance from the tree root; a detached chain head is at 0 until
    /// registered.
    pub fn depth(&self) -> usize {
        self.inner.borrow().depth
    }

    /// Whether a handler is bound at this exact node.
    pub fn is_executable(&self) -> bool {
        self.inner.borrow().handler.is_some()
    }

    /// This node's description, inherited from the nearest described
    /// ancestor when it has none.
    pub fn effective_description(&self) -> String {
        description_of(&self.inner)
    }

    /// The canonical usage string for this node's path, e.g.
    /// `tp <destination:position>`.
    pub fn usage(&self) -> String {
        usage_of(&self.inner)
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("CommandNode")
            .field("matcher", &inner.matcher)
            .field("depth", &inner.depth)
            .field("children", &inner.children.len())
            .field("executable", &inner.handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chaining_builds_depths() {
        let root = CommandNode::root();
        let a = root.literal("a");
        let b = a.literal("b");
        let c = b.number("n");
        assert_eq!(root.depth(), 0);
        assert_eq!(a.depth(), 1);
        assert_eq!(b.depth(), 2);
        assert_eq!(c.depth(), 3);
    }

    #[test]
    fn add_renumbers_subtree() {
        let detached = literal("greet");
        let tail = detached.string("who", false);
        assert_eq!(detached.depth(), 0);
        assert_eq!(tail.depth(), 1);

        let root = CommandNode::root();
        root.add(&detached);
        assert_eq!(detached.depth(), 1);
        assert_eq!(tail.depth(), 2);
    }

    #[test]
    fn executes_returns_current_node() {
        let cmd = literal("ping");
        let same = cmd.executes(|_, _| Ok(()));
        assert_eq!(same.depth(), cmd.depth());
        // The handler lives on a synthetic child, not on the node itself.
        assert!(!cmd.is_executable());
        assert!(cmd.inner.borrow().children[0].borrow().handler.is_some());
    }

    #[test]
    fn chain_root_walks_to_top() {
        let top = literal("a");
        let leaf = top.literal("b").number("n");
        let found = leaf.chain_root();
        assert!(Rc::ptr_eq(&found.inner, &top.inner));
    }

    #[test]
    fn handles_keep_the_chain_head_alive() {
        // The head and the middle fragments only exist as builder
        // temporaries here; the leaf handle must still anchor them.
        let leaf = literal("top").literal("mid").number("n");
        assert_eq!(leaf.depth(), 2);

        let head = leaf.chain_root();
        assert_eq!(head.depth(), 0);
        assert_eq!(head.usage(), "top");
        assert_eq!(leaf.usage(), "top mid <n:number>");
    }

    #[test]
    fn executes_handle_anchors_the_whole_chain() {
        // The common registration pattern: one statement builds the chain,
        // the surviving handle is whatever `executes` returned.
        let cmd = literal("cmd").number("n").executes(|_, _| Ok(()));
        let head = cmd.chain_root();
        assert_eq!(head.depth(), 0);
        assert_eq!(head.usage(), "cmd");
        assert_eq!(head.inner.borrow().children.len(), 1);
    }

    #[test]
    fn description_inherits_from_nearest_ancestor() {
        let top = literal("cfg").description("configure things");
        let leaf = top.literal("set");
        assert_eq!(leaf.effective_description(), "configure things");
        let described = leaf.description("set a value");
        assert_eq!(described.effective_description(), "set a value");

        let bare = literal("bare");
        assert_eq!(bare.effective_description(), "No description provided");
    }

    #[test]
    fn usage_skips_invisible_tokens() {
        let root = CommandNode::root();
        let leaf = root
            .literal("kick")
            .requires(|_| true, "mods only", true)
            .string("player", false);
        assert_eq!(leaf.usage(), "kick <player:string>");
    }

    #[test]
    fn redirect_splices_current_children() {
        let target = literal("teleport");
        target.position("dest").executes(|_, _| Ok(()));

        let alias = literal("tp");
        alias.redirect(&target);
        assert_eq!(alias.inner.borrow().children.len(), 1);

        // Later additions to the target are not picked up.
        target.number("late");
        assert_eq!(alias.inner.borrow().children.len(), 1);
        assert_eq!(target.inner.borrow().children.len(), 2);
    }
}
