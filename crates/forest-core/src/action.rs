//! Player actions.

use crate::{Coord, Direction, RuleViolation, ViolationKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of action a player can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Turn a face-down tile face up.
    Flip,
    /// Move a piece, possibly capturing or leaving through an exit.
    Move,
    /// Fire a hunter's gun along its fixed direction.
    Shoot,
    /// Remove every tree next to a lumberjack.
    Clear,
    /// Leave the forest from an exit cell.
    Escape,
    /// Skip the turn when nothing else is legal.
    Pass,
}

impl FromStr for ActionKind {
    type Err = RuleViolation;

    /// Accepts the canonical names plus the aliases older clients send.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flip" | "reveal" => Ok(ActionKind::Flip),
            "move" => Ok(ActionKind::Move),
            "shoot" | "ranged_capture" => Ok(ActionKind::Shoot),
            "clear" | "cut" | "adjacent_removal" => Ok(ActionKind::Clear),
            "escape" | "exit" => Ok(ActionKind::Escape),
            "pass" => Ok(ActionKind::Pass),
            other => Err(RuleViolation::new(
                ViolationKind::UnknownActionKind,
                format!("Unknown action type '{}'", other),
            )),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Flip => "flip",
            ActionKind::Move => "move",
            ActionKind::Shoot => "shoot",
            ActionKind::Clear => "clear",
            ActionKind::Escape => "escape",
            ActionKind::Pass => "pass",
        };
        write!(f, "{}", name)
    }
}

/// A fully specified action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Flip { target: Coord },
    Move { from: Coord, to: Coord },
    Shoot { from: Coord, direction: Direction },
    Clear { from: Coord },
    Escape { from: Coord },
    Pass,
}

impl Action {
    pub const fn kind(&self) -> ActionKind {
        match self {
            Action::Flip { .. } => ActionKind::Flip,
            Action::Move { .. } => ActionKind::Move,
            Action::Shoot { .. } => ActionKind::Shoot,
            Action::Clear { .. } => ActionKind::Clear,
            Action::Escape { .. } => ActionKind::Escape,
            Action::Pass => ActionKind::Pass,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Flip { target } => write!(f, "flip {}", target),
            Action::Move { from, to } => write!(f, "move {} -> {}", from, to),
            Action::Shoot { from, direction } => write!(f, "shoot {} {}", from, direction),
            Action::Clear { from } => write!(f, "clear {}", from),
            Action::Escape { from } => write!(f, "escape {}", from),
            Action::Pass => write!(f, "pass"),
        }
    }
}

/// A loosely typed action as submitted by a client.
///
/// Which fields are required depends on `kind`. Single-cell actions accept
/// the cell in either `source` or `target`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub kind: String,
    #[serde(default)]
    pub source: Option<Coord>,
    #[serde(default)]
    pub target: Option<Coord>,
    #[serde(default)]
    pub direction: Option<Direction>,
}

fn missing(kind: ActionKind, field: &str) -> RuleViolation {
    RuleViolation::new(
        ViolationKind::MissingParameter,
        format!("{} action requires a {}", kind, field),
    )
}

impl TryFrom<ActionRequest> for Action {
    type Error = RuleViolation;

    fn try_from(req: ActionRequest) -> Result<Self, Self::Error> {
        let kind: ActionKind = req.kind.parse()?;
        let cell = req.source.or(req.target);
        let action = match kind {
            ActionKind::Flip => Action::Flip {
                target: req.target.or(req.source).ok_or_else(|| missing(kind, "target"))?,
            },
            ActionKind::Move => Action::Move {
                from: req.source.ok_or_else(|| missing(kind, "source"))?,
                to: req.target.ok_or_else(|| missing(kind, "target"))?,
            },
            ActionKind::Shoot => Action::Shoot {
                from: cell.ok_or_else(|| missing(kind, "source"))?,
                direction: req.direction.ok_or_else(|| missing(kind, "direction"))?,
            },
            ActionKind::Clear => Action::Clear {
                from: cell.ok_or_else(|| missing(kind, "source"))?,
            },
            ActionKind::Escape => Action::Escape {
                from: cell.ok_or_else(|| missing(kind, "source"))?,
            },
            ActionKind::Pass => Action::Pass,
        };
        Ok(action)
    }
}

impl From<Action> for ActionRequest {
    fn from(action: Action) -> Self {
        let mut req = ActionRequest {
            kind: action.kind().to_string(),
            ..ActionRequest::default()
        };
        match action {
            Action::Flip { target } => req.target = Some(target),
            Action::Move { from, to } => {
                req.source = Some(from);
                req.target = Some(to);
            }
            Action::Shoot { from, direction } => {
                req.source = Some(from);
                req.direction = Some(direction);
            }
            Action::Clear { from } | Action::Escape { from } => req.source = Some(from),
            Action::Pass => {}
        }
        req
    }
}
