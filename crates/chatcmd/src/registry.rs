//! The process-scoped command registry.
//!
//! A [`CommandRegistry`] owns the grammar root and the options record. Hosts
//! build one at startup, register their command chains (with optional
//! aliases), and then feed it chat lines. Nothing here is global: keeping
//! the registry an explicit value keeps dispatch testable in isolation and
//! leaves serialization of registration versus dispatch to the caller.

use serde::{Deserialize, Serialize};

use crate::context::CommandContext;
use crate::dispatch::{self, DispatchResult};
use crate::help::{self, HelpEntry};
use crate::node::CommandNode;

/// Host-integration options.
///
/// These only govern [`CommandRegistry::handle_chat`]; the dispatch
/// algorithm itself never looks at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix that marks a chat line as a command.
    pub command_indicator: String,
    /// When `true`, [`CommandRegistry::handle_chat`] ignores every line so
    /// the host can drive dispatch itself.
    pub disable_default_chat_handler: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_indicator: "-".to_string(),
            disable_default_chat_handler: false,
        }
    }
}

/// Owns the grammar tree and dispatches lines against it.
#[derive(Debug)]
pub struct CommandRegistry {
    root: CommandNode,
    config: Config,
}

impl CommandRegistry {
    /// Creates an empty registry with default options.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty registry with the given options.
    pub fn with_config(config: Config) -> Self {
        Self {
            root: CommandNode::root(),
            config,
        }
    }

    /// Attaches a built command chain under the registry root.
    ///
    /// `command` may be any node of the chain; registration walks up to the
    /// chain's first fragment. Each alias becomes a literal that redirects
    /// into the same subtree, so every alias reaches the same handlers with
    /// the same parsed arguments.
    pub fn register(&mut self, command: &CommandNode, aliases: &[&str]) {
        let chain_root = command.chain_root();
        for alias in aliases {
            self.root.literal(*alias).redirect(&chain_root);
        }
        self.root.add(&chain_root);
    }

    /// Dispatches one command line (indicator already stripped).
    pub fn dispatch(&self, ctx: &CommandContext, line: &str) -> DispatchResult {
        dispatch::evaluate(&self.root, ctx, line, &[])
    }

    /// Screens a raw chat message the way the host's default hook would:
    /// returns `None` when the default handler is disabled or the message
    /// does not start with the command indicator, otherwise strips the
    /// indicator and dispatches the rest.
    pub fn handle_chat(&self, ctx: &CommandContext, message: &str) -> Option<DispatchResult> {
        if self.config.disable_default_chat_handler {
            return None;
        }
        let line = message.strip_prefix(&self.config.command_indicator)?;
        Some(self.dispatch(ctx, line))
    }

    /// Help entries for every executable path reachable by `ctx`.
    pub fn help(&self, ctx: &CommandContext) -> Vec<HelpEntry> {
        help::collect(&self.root, ctx)
    }

    /// The current options.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the options, for runtime reconfiguration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The grammar root, for standalone evaluation in tests or custom
    /// host integrations.
    pub fn root(&self) -> &CommandNode {
        &self.root
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
