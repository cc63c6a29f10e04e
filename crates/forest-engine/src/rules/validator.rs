//! The standard rule set.

use super::{candidate_actions, Phase, RuleContext, RuleSet};
use forest_core::{
    Action, Coord, Direction, Faction, Movement, RuleViolation, Tile, ViolationKind,
};

/// Standard "De Beer is Los!" rules.
///
/// Checks run in a fixed order and the first failure is reported:
/// phase, bounds, existence, ownership, capture, movement pattern, path,
/// anti-repetition, then action-specific preconditions. Shoot and Clear
/// check that the acting piece can perform the action at all (and for a
/// shot, which way it faces) before looking at their targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct RulesValidator;

impl RuleSet for RulesValidator {
    fn validate(
        &self,
        ctx: &RuleContext<'_>,
        faction: Faction,
        action: &Action,
    ) -> Result<(), RuleViolation> {
        if ctx.phase.is_terminal() {
            return Err(RuleViolation::wrong_phase("The game is over"));
        }
        if !faction.is_playable() {
            return Err(RuleViolation::not_owner("Neutral is not a player faction"));
        }
        match *action {
            Action::Flip { target } => self.validate_flip(ctx, target),
            Action::Move { from, to } => self.validate_move(ctx, faction, from, to),
            Action::Shoot { from, direction } => self.validate_shoot(ctx, faction, from, direction),
            Action::Clear { from } => self.validate_clear(ctx, faction, from),
            Action::Escape { from } => self.validate_escape(ctx, faction, from),
            Action::Pass => self.validate_pass(ctx, faction),
        }
    }
}

impl RulesValidator {
    fn validate_flip(&self, ctx: &RuleContext<'_>, target: Coord) -> Result<(), RuleViolation> {
        if ctx.phase != Phase::Reveal {
            return Err(RuleViolation::wrong_phase(
                "Can only flip tiles during the reveal phase",
            ));
        }
        in_bounds(ctx, target, "Target")?;
        let tile = ctx
            .board
            .get(target)
            .ok_or_else(|| RuleViolation::empty_cell(format!("No tile at {}", target)))?;
        if tile.is_revealed() {
            return Err(RuleViolation::new(
                ViolationKind::AlreadyRevealed,
                format!("Tile at {} is already revealed", target),
            ));
        }
        Ok(())
    }

    fn validate_move(
        &self,
        ctx: &RuleContext<'_>,
        faction: Faction,
        from: Coord,
        to: Coord,
    ) -> Result<(), RuleViolation> {
        in_bounds(ctx, from, "Source")?;
        if ctx.board.exit_at_point(to).is_some() {
            if ctx.phase != Phase::Escape {
                return Err(RuleViolation::wrong_phase(
                    "Forest exits are only open during the escape phase",
                ));
            }
        } else {
            in_bounds(ctx, to, "Target")?;
        }

        let tile = acting_tile(ctx, faction, from)?;
        let kind = tile.kind();
        if !kind.is_movable() {
            return Err(RuleViolation::illegal_pattern(format!(
                "{} cannot be moved, only removed",
                kind
            )));
        }

        if let Some(target) = ctx.board.get(to).filter(|_| to != from) {
            if !target.is_revealed() {
                return Err(RuleViolation::illegal_capture(format!(
                    "Cannot capture the face-down tile at {}",
                    to
                )));
            }
            if !kind.captures(target.kind()) {
                let reason = if kind.facing().is_some() {
                    format!("{} can only capture by shooting", kind.species())
                } else {
                    format!("{} cannot capture {}", kind.species(), target.kind().species())
                };
                return Err(RuleViolation::illegal_capture(reason));
            }
        }

        if from == to {
            return Err(RuleViolation::illegal_pattern("Must move at least one space"));
        }
        if from.direction_to(to).is_none() {
            return Err(RuleViolation::illegal_pattern(
                "Can only move horizontally or vertically",
            ));
        }
        if kind.movement() == Movement::OneStep && from.manhattan(to) != 1 {
            return Err(RuleViolation::illegal_pattern(format!(
                "{} can only move one space",
                kind.species()
            )));
        }

        if let Some(blocker) = ctx.board.first_blocker(from, to) {
            return Err(RuleViolation::new(
                ViolationKind::PathBlocked,
                format!("Path blocked by tile at {}", blocker),
            ));
        }

        check_repetition(ctx, faction, tile, Some(to))
    }

    fn validate_shoot(
        &self,
        ctx: &RuleContext<'_>,
        faction: Faction,
        from: Coord,
        direction: Direction,
    ) -> Result<(), RuleViolation> {
        in_bounds(ctx, from, "Source")?;
        let tile = acting_tile(ctx, faction, from)?;
        let Some(facing) = tile.kind().facing() else {
            return Err(RuleViolation::illegal_pattern(format!(
                "{} cannot shoot",
                tile.kind()
            )));
        };
        if direction != facing {
            return Err(RuleViolation::illegal_pattern(format!(
                "Hunter faces {} and cannot shoot {}",
                facing, direction
            )));
        }

        // A shot that reaches the edge misses and scores nothing.
        let Some(target_pos) = ctx.board.line_of_sight(from, direction) else {
            return Ok(());
        };
        let target = ctx
            .board
            .get(target_pos)
            .ok_or_else(|| RuleViolation::empty_cell(format!("No tile at {}", target_pos)))?;
        if !target.is_revealed() {
            return Err(RuleViolation::illegal_capture(format!(
                "Shot blocked by the face-down tile at {}",
                target_pos
            )));
        }
        if !tile.kind().shoots(target.kind()) {
            return Err(RuleViolation::illegal_capture(format!(
                "Hunter cannot shoot the {} at {}",
                target.kind().species(),
                target_pos
            )));
        }
        Ok(())
    }

    fn validate_clear(
        &self,
        ctx: &RuleContext<'_>,
        faction: Faction,
        from: Coord,
    ) -> Result<(), RuleViolation> {
        in_bounds(ctx, from, "Source")?;
        let tile = acting_tile(ctx, faction, from)?;
        let Some(cleared) = tile.kind().species().clears() else {
            return Err(RuleViolation::illegal_capture(format!(
                "{} cannot clear trees",
                tile.kind()
            )));
        };
        let any = from.neighbors().into_iter().any(|pos| {
            ctx.board
                .get(pos)
                .is_some_and(|t| t.is_revealed() && t.kind().species() == cleared)
        });
        if !any {
            return Err(RuleViolation::illegal_capture(format!(
                "No {} next to {}",
                cleared, from
            )));
        }
        Ok(())
    }

    fn validate_escape(
        &self,
        ctx: &RuleContext<'_>,
        faction: Faction,
        from: Coord,
    ) -> Result<(), RuleViolation> {
        if ctx.phase != Phase::Escape {
            return Err(RuleViolation::wrong_phase(
                "Forest exits are only open during the escape phase",
            ));
        }
        in_bounds(ctx, from, "Source")?;
        let tile = acting_tile(ctx, faction, from)?;
        if !tile.kind().is_movable() {
            return Err(RuleViolation::illegal_pattern(format!(
                "{} cannot leave the forest",
                tile.kind()
            )));
        }
        check_repetition(ctx, faction, tile, None)?;

        if ctx.board.exit_at_gate(from).is_none() {
            let gates: Vec<String> = ctx
                .board
                .exits()
                .iter()
                .map(|e| e.gate.to_string())
                .collect();
            return Err(RuleViolation::illegal_pattern(format!(
                "Can only escape from the forest exits: {}",
                gates.join(", ")
            )));
        }
        Ok(())
    }

    fn validate_pass(&self, ctx: &RuleContext<'_>, faction: Faction) -> Result<(), RuleViolation> {
        if ctx.phase != Phase::Escape {
            return Err(RuleViolation::wrong_phase(
                "Can only pass during the escape phase",
            ));
        }
        let stuck = candidate_actions(ctx.board, ctx.phase, faction)
            .iter()
            .all(|a| self.validate(ctx, faction, a).is_err());
        if !stuck {
            return Err(RuleViolation::illegal_pattern(
                "Cannot pass while another action is available",
            ));
        }
        Ok(())
    }
}

fn in_bounds(ctx: &RuleContext<'_>, pos: Coord, label: &str) -> Result<(), RuleViolation> {
    if ctx.board.is_within_bounds(pos) {
        Ok(())
    } else {
        Err(RuleViolation::out_of_bounds(format!(
            "{} position {} out of bounds",
            label, pos
        )))
    }
}

/// The face-up tile at `pos` that `faction` may act with.
fn acting_tile<'a>(
    ctx: &RuleContext<'a>,
    faction: Faction,
    pos: Coord,
) -> Result<&'a Tile, RuleViolation> {
    let tile = ctx
        .board
        .get(pos)
        .ok_or_else(|| RuleViolation::empty_cell(format!("No piece at {}", pos)))?;
    if !tile.is_revealed() {
        return Err(RuleViolation::new(
            ViolationKind::TileHidden,
            format!("Cannot act with the face-down tile at {}", pos),
        ));
    }
    if !tile.is_controlled_by(faction) {
        return Err(RuleViolation::not_owner(format!(
            "Cannot move opponent's {}",
            tile.kind().species()
        )));
    }
    Ok(tile)
}

fn check_repetition(
    ctx: &RuleContext<'_>,
    faction: Faction,
    tile: &Tile,
    to: Option<Coord>,
) -> Result<(), RuleViolation> {
    if let (Some(to), Some(previous)) = (to, tile.previous_position()) {
        if to == previous {
            return Err(RuleViolation::new(
                ViolationKind::RepetitionRestricted,
                format!("Cannot move back to the previous position {}", previous),
            ));
        }
    }

    if tile.faction() == Faction::Neutral {
        if let Some(last_turn) = ctx.turn.checked_sub(1) {
            if tile.touched_by_other_on(faction, last_turn) {
                return Err(RuleViolation::new(
                    ViolationKind::RepetitionRestricted,
                    format!(
                        "The {} was just used by the other side and cannot be moved this turn",
                        tile.kind()
                    ),
                ));
            }
        }
    }
    Ok(())
}
