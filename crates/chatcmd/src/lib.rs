//! Chat command grammar trees with backtracking dispatch and help generation.
//!
//! `chatcmd` lets a host application register chat-like text commands as a
//! tree of grammar fragments — literals, typed arguments, permission gates —
//! and dispatch an incoming line of text to exactly one matching handler.
//!
//! # Features
//!
//! - **Chaining builder**: grammars read as chains of `literal`, `number`,
//!   `string`, `position`, `requires` and `argument` fragments
//! - **Backtracking dispatch**: ordered depth-first search; first registered
//!   path wins ambiguities, the deepest failure is reported otherwise
//! - **Coordinate arguments**: absolute, relative (`~`) and local caret
//!   (`^`) components, resolved against the sender's position and view
//! - **Aliases**: extra entry words that redirect into an existing grammar
//!   without duplicating it
//! - **Help/completions**: usage strings and descriptions for every
//!   executable path the current context may reach
//!
//! # Quick start
//!
//! ```
//! use chatcmd::{literal, CommandContext, CommandRegistry};
//!
//! let mut registry = CommandRegistry::new();
//!
//! let roll = literal("roll")
//!     .description("rolls a die")
//!     .number("sides")
//!     .executes(|_ctx, args| {
//!         let sides = args[0].as_number().unwrap_or(6.0);
//!         println!("rolled a d{sides}");
//!         Ok(())
//!     });
//! registry.register(&roll, &["r"]);
//!
//! let ctx = CommandContext::default();
//! assert!(registry.dispatch(&ctx, "roll 20").execution_succeeded());
//! assert!(registry.dispatch(&ctx, "r 20").execution_succeeded());
//!
//! let failure = registry.dispatch(&ctx, "roll twenty");
//! let (error, _depth) = failure.rejection().unwrap();
//! assert_eq!(error.to_string(), "Expected a number for 'sides'");
//! ```
//!
//! # Feeding chat lines
//!
//! The host's chat hook stays outside this crate; wire it up by forwarding
//! messages to [`CommandRegistry::handle_chat`], which screens for the
//! configured command indicator:
//!
//! ```
//! use chatcmd::{literal, CommandContext, CommandRegistry};
//!
//! let mut registry = CommandRegistry::new();
//! registry.register(&literal("ping").executes(|_, _| Ok(())), &[]);
//!
//! let ctx = CommandContext::default();
//! assert!(registry.handle_chat(&ctx, "just chatting").is_none());
//! assert!(registry.handle_chat(&ctx, "-ping").is_some());
//! ```
//!
//! # Errors
//!
//! Grammar failures are values: dispatch returns a
//! [`DispatchResult::Rejected`] carrying a [`MatchError`] and the depth of
//! the deepest branch that produced it. A handler's own runtime failure is
//! captured as [`DispatchResult::Executed`] with an error — the command was
//! syntactically valid — and surfaced opaquely for the host to present.
//! The crate itself never logs and never prints.

mod context;
mod dispatch;
mod error;
mod help;
mod matcher;
mod node;
mod position;
mod registry;
mod value;

pub use context::{CommandContext, Extensions};
pub use dispatch::DispatchResult;
pub use error::MatchError;
pub use help::HelpEntry;
pub use matcher::{ArgumentMatcher, MatchResult, MatchSuccess, Matcher};
pub use node::{literal, CommandNode, Handler};
pub use registry::{CommandRegistry, Config};
pub use value::{ArgValue, Vec3};
