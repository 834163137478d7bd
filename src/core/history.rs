use log::{debug, error};

use crate::core::definitions::Move;
use crate::core::engine::{RulesAdapter, RulesEngine};
use crate::core::error::BoardError;

/// Outcome of [`MoveHistory::record`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recorded {
    /// New move appended; any redo branch after the cursor was dropped.
    Appended,
    /// The move equalled the next recorded one, cursor advanced only.
    Redo,
}

/// Whether [`MoveHistory::redo`] must replay the move through the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Replay {
    Engine,
    AlreadyApplied,
}

/// Played moves plus a cursor over them.
///
/// `applied` counts the moves currently reflected by the engine position:
/// zero is the initial position, `moves.len()` is the end of the line.
/// Everything past `applied` is the redo branch.
#[derive(Clone, Debug, Default)]
pub struct MoveHistory {
    moves: Vec<Move>,
    applied: usize,
}

impl MoveHistory {
    pub fn new() -> Self {
        MoveHistory::default()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Index of the last applied move, `None` at the initial position.
    pub fn current_index(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    pub fn current(&self) -> Option<&Move> {
        self.current_index().map(|index| &self.moves[index])
    }

    /// Moves that reproduce the current position from the initial one.
    pub fn applied(&self) -> &[Move] {
        &self.moves[..self.applied]
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.moves.len()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
        self.applied = 0;
    }

    /// Records a move the engine has just played.
    pub fn record(&mut self, played: Move) -> Recorded {
        if let Some(next) = self.moves.get(self.applied) {
            if next.same_as(&played) {
                self.applied += 1;
                debug!("History redo via {}, cursor {:?}", played, self.current_index());
                return Recorded::Redo;
            }
            debug!(
                "History branch at {}, dropping {} move(s)",
                self.applied,
                self.moves.len() - self.applied
            );
            self.moves.truncate(self.applied);
        }
        self.moves.push(played);
        self.applied += 1;
        debug!("History append, cursor {:?}", self.current_index());
        Recorded::Appended
    }

    /// Steps the cursor back and takes the move back in the engine.
    pub fn undo<E: RulesEngine>(&mut self, rules: &mut RulesAdapter<E>) -> Option<Move> {
        if self.applied == 0 {
            return None;
        }
        if rules.undo().is_none() {
            error!("Engine had nothing to undo at history cursor {}", self.applied);
            return None;
        }
        self.applied -= 1;
        let undone = self.moves[self.applied].clone();
        debug!("History undo {}, cursor {:?}", undone, self.current_index());
        Some(undone)
    }

    /// Advances the cursor over the next recorded move.
    pub fn redo<E: RulesEngine>(
        &mut self,
        rules: &mut RulesAdapter<E>,
        replay: Replay,
    ) -> Result<Option<Move>, BoardError> {
        let Some(next) = self.moves.get(self.applied) else {
            return Ok(None);
        };
        let next = next.clone();
        if replay == Replay::Engine {
            rules.replay(&next)?;
        }
        self.applied += 1;
        debug!("History redo {}, cursor {:?}", next, self.current_index());
        Ok(Some(next))
    }

    /// Undoes every applied move; returns them in the order they were undone.
    pub fn go_to_start<E: RulesEngine>(&mut self, rules: &mut RulesAdapter<E>) -> Vec<Move> {
        let mut undone = Vec::with_capacity(self.applied);
        while let Some(taken_back) = self.undo(rules) {
            undone.push(taken_back);
        }
        undone
    }

    /// Replays the whole redo branch; returns the replayed moves in order.
    pub fn go_to_end<E: RulesEngine>(
        &mut self,
        rules: &mut RulesAdapter<E>,
    ) -> Result<Vec<Move>, BoardError> {
        let mut replayed = Vec::with_capacity(self.moves.len() - self.applied);
        while let Some(next) = self.redo(rules, Replay::Engine)? {
            replayed.push(next);
        }
        Ok(replayed)
    }
}
