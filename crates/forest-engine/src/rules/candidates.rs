//! Candidate action generation.

use super::Phase;
use crate::board::Board;
use forest_core::{Action, Direction, Faction, Movement};

/// Enumerates every action `faction` might take, legal or not.
///
/// The list is a superset of the legal actions: each entry is shaped right
/// for its tile (distance, facing, gate) but still has to pass a
/// [`RuleSet`](super::RuleSet). [`Action::Pass`] is never included.
pub fn candidate_actions(board: &Board, phase: Phase, faction: Faction) -> Vec<Action> {
    let mut actions = Vec::new();
    if phase.is_terminal() || !faction.is_playable() {
        return actions;
    }

    for tile in board.live_tiles() {
        let Some(from) = tile.position() else { continue };

        if !tile.is_revealed() {
            if phase == Phase::Reveal {
                actions.push(Action::Flip { target: from });
            }
            continue;
        }
        if !tile.is_controlled_by(faction) {
            continue;
        }

        let kind = tile.kind();
        let reach = match kind.movement() {
            Movement::OneStep => 1,
            Movement::Line => board.size(),
            Movement::Rooted => 0,
        };
        for direction in Direction::ALL {
            let mut to = from;
            for _ in 0..reach {
                to = to.step(direction);
                let exit = board.exit_at_point(to).is_some();
                if !board.is_within_bounds(to) && !exit {
                    break;
                }
                actions.push(Action::Move { from, to });
                if exit || board.is_occupied(to) {
                    break;
                }
            }
        }

        if let Some(direction) = kind.facing() {
            actions.push(Action::Shoot { from, direction });
        }
        if kind.species().clears().is_some() {
            actions.push(Action::Clear { from });
        }
        if phase == Phase::Escape && board.exit_at_gate(from).is_some() {
            actions.push(Action::Escape { from });
        }
    }
    actions
}
