//! Execution context handed to gate predicates and command handlers.
//!
//! The core keeps the context deliberately small: position arguments need the
//! sender's location and view direction, and everything else the host wants
//! to expose (player handle, world, event object) travels through the typed
//! [`Extensions`] map.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::value::Vec3;

/// Type-keyed container for host-supplied state.
///
/// Hosts insert whatever their handlers need before dispatching; handlers and
/// gate predicates retrieve values by type. One value per type — inserting a
/// second value of the same type replaces the first.
///
/// # Example
///
/// ```
/// use chatcmd::Extensions;
///
/// struct PlayerName(String);
///
/// let mut ext = Extensions::new();
/// ext.insert(PlayerName("steve".into()));
/// assert_eq!(ext.get::<PlayerName>().unwrap().0, "steve");
/// ```
#[derive(Default)]
pub struct Extensions {
    map: HashMap<TypeId, Box<dyn Any>>,
}

impl Extensions {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value of the same type if one
    /// was present.
    pub fn insert<T: 'static>(&mut self, val: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(val))
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    /// Gets a reference to the value of type `T`, if present.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    /// Gets a mutable reference to the value of type `T`, if present.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut())
    }

    /// Gets a reference to the value of type `T`, or an error naming the
    /// missing type. Convenient inside handlers that return `anyhow::Result`.
    pub fn get_required<T: 'static>(&self) -> Result<&T, anyhow::Error> {
        self.get::<T>().ok_or_else(|| {
            anyhow::anyhow!(
                "extension missing: type {} not found in context",
                std::any::type_name::<T>()
            )
        })
    }

    /// Removes and returns the value of type `T`, if present.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    /// Returns the number of stored values.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

/// Context for one dispatch call.
///
/// Carries the sender geometry the position resolver needs plus an
/// [`Extensions`] map for everything host-specific.
#[derive(Debug)]
pub struct CommandContext {
    /// The sender's absolute position, the base for `~` and `^` coordinates.
    pub sender_position: Vec3,
    /// The sender's view direction. Must be non-zero for caret coordinates
    /// to resolve meaningfully.
    pub view_direction: Vec3,
    /// Host-supplied state for predicates and handlers.
    pub extensions: Extensions,
}

impl CommandContext {
    /// Creates a context with the given sender geometry and no extensions.
    pub fn new(sender_position: Vec3, view_direction: Vec3) -> Self {
        Self {
            sender_position,
            view_direction,
            extensions: Extensions::new(),
        }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        // A sender at the origin looking down +z.
        Self::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0))
    }
}
