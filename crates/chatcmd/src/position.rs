//! Coordinate parsing and resolution for position arguments.
//!
//! A position is three whitespace-separated components, each an optional mode
//! prefix followed by an optional signed decimal:
//!
//! - `12.5` — absolute world coordinate
//! - `~-3` — relative to the sender (`~` alone means `~0`)
//! - `^1` — local "caret" coordinate, relative to where the sender is looking
//!
//! Caret components only make sense as a set: the three of them select a
//! point in the sender's view frame (first component lateral, second
//! vertical, third forward distance), so mixing caret components with world
//! coordinates is rejected.

use std::f64::consts::{FRAC_PI_2, TAU};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::CommandContext;
use crate::error::MatchError;
use crate::matcher::{MatchResult, MatchSuccess};
use crate::value::{ArgValue, Vec3};

/// One coordinate component: `~`/`^` take an optional signed decimal, a bare
/// world coordinate requires digits.
static COMPONENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[~^](?:-?\d+(?:\.\d+)?)?|-?\d+(?:\.\d+)?)")
        .expect("component pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Absolute,
    Relative,
    Local,
}

#[derive(Debug, Clone, Copy)]
struct Component {
    mode: Mode,
    offset: f64,
}

fn parse_component(token: &str) -> Component {
    let (mode, numeric) = match token.as_bytes().first() {
        Some(b'~') => (Mode::Relative, &token[1..]),
        Some(b'^') => (Mode::Local, &token[1..]),
        _ => (Mode::Absolute, token),
    };
    let offset = if numeric.is_empty() {
        0.0
    } else {
        // The component pattern only admits valid decimal syntax here.
        numeric.parse().unwrap_or(0.0)
    };
    Component { mode, offset }
}

/// Matches three coordinate components against the trimmed input and
/// resolves them against the sender. The consumed span runs from the first
/// component through the last, inner whitespace included.
pub(crate) fn match_position(input: &str, ctx: &CommandContext) -> MatchResult {
    let mut cursor = 0;
    let mut components = [Component {
        mode: Mode::Absolute,
        offset: 0.0,
    }; 3];

    for slot in components.iter_mut() {
        let rest = &input[cursor..];
        cursor += rest.len() - rest.trim_start().len();
        let token = COMPONENT
            .find(&input[cursor..])
            .ok_or(MatchError::InvalidPosition)?;
        *slot = parse_component(token.as_str());
        cursor += token.end();
    }

    let local_count = components
        .iter()
        .filter(|c| c.mode == Mode::Local)
        .count();
    let resolved = match local_count {
        3 => local_offset(components, ctx),
        0 => world_coordinates(components, ctx.sender_position),
        _ => return Err(MatchError::MixedCoordinateModes),
    };
    Ok(MatchSuccess::pushing(ArgValue::Position(resolved), cursor))
}

/// Per-axis resolution when no caret components are present: relative
/// components start from the sender's coordinate, absolute ones from zero.
fn world_coordinates(components: [Component; 3], sender: Vec3) -> Vec3 {
    let axis = |c: Component, base: f64| match c.mode {
        Mode::Relative => base + c.offset,
        _ => c.offset,
    };
    Vec3::new(
        axis(components[0], sender.x),
        axis(components[1], sender.y),
        axis(components[2], sender.z),
    )
}

fn normalize_angle(mut angle: f64) -> f64 {
    while angle < 0.0 {
        angle += TAU;
    }
    while angle > TAU {
        angle -= TAU;
    }
    angle
}

/// Resolves an all-caret triple: build the sender's view basis from the
/// spherical decomposition of the view direction, then combine
/// lateral/vertical/forward offsets through it.
fn local_offset(components: [Component; 3], ctx: &CommandContext) -> Vec3 {
    let view = ctx.view_direction;
    let horizontal = (view.x * view.x + view.z * view.z).sqrt();
    let pitch = normalize_angle(horizontal.atan2(view.y) - FRAC_PI_2);
    let yaw = normalize_angle(view.z.atan2(view.x) - FRAC_PI_2);

    let (yaw_sin, yaw_cos) = (yaw + FRAC_PI_2).sin_cos();
    let (forward_sin, forward_cos) = (-pitch).sin_cos();
    let (up_sin, up_cos) = (-pitch + FRAC_PI_2).sin_cos();

    let forward = Vec3::new(yaw_cos * forward_cos, forward_sin, yaw_sin * forward_cos);
    let up = Vec3::new(yaw_cos * up_cos, up_sin, yaw_sin * up_cos);
    let left = forward.cross(up).scale(-1.0);

    let lateral = components[0].offset;
    let vertical = components[1].offset;
    let distance = components[2].offset;

    ctx.sender_position
        .add(forward.scale(distance))
        .add(up.scale(vertical))
        .add(left.scale(lateral))
}
