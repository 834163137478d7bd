use log::{debug, error};

use crate::board::render::{Renderer, MOVE_ANIMATION};
use crate::board::ChessBoard;
use crate::core::definitions::{Move, PieceKind, Square};
use crate::core::engine::RulesEngine;
use crate::core::history::{Recorded, Replay};

impl<E: RulesEngine, R: Renderer> ChessBoard<E, R> {
    /// Shared by click, drop and promotion paths.
    ///
    /// An engine rejection leaves history and the picture untouched.
    pub(crate) fn execute_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
        animate: bool,
    ) -> Option<Move> {
        self.handlers.move_start(from, to, promotion);
        let played = match self.rules.attempt_move(from, to, promotion) {
            Ok(played) => played,
            Err(err) => {
                error!("Engine refused a pre-filtered move: {err}");
                return None;
            }
        };
        if self.history.record(played.clone()) == Recorded::Redo {
            debug!("{} matches the next recorded move, history kept", played);
        }

        self.sync_board();
        self.clear_selection();
        self.update_last_move();

        let position = self.rules.fen();
        self.handlers.move_end(&played, &position);
        let status = self.rules.game_status();
        self.handlers.game_status(status, &played);

        if animate && promotion.is_none() {
            self.animate_move(&played, false);
        }
        Some(played)
    }

    /// Takes back the displayed move. `None` at the initial position.
    pub fn undo(&mut self) -> Option<Move> {
        if !self.history.can_undo() {
            return None;
        }
        self.close_promotion();
        let undone = self.history.undo(&mut self.rules)?;
        self.sync_board();
        self.clear_selection();
        self.update_last_move();
        self.animate_move(&undone, true);
        Some(undone)
    }

    /// Replays the next recorded move. `None` at the end of the line.
    pub fn redo(&mut self) -> Option<Move> {
        if !self.history.can_redo() {
            return None;
        }
        self.close_promotion();
        let replayed = match self.history.redo(&mut self.rules, Replay::Engine) {
            Ok(replayed) => replayed?,
            Err(err) => {
                error!("Recorded move no longer replays: {err}");
                return None;
            }
        };
        self.sync_board();
        self.clear_selection();
        self.update_last_move();
        self.animate_move(&replayed, false);
        Some(replayed)
    }

    pub fn go_to_start(&mut self) {
        if !self.history.can_undo() {
            return;
        }
        self.close_promotion();
        let undone = self.history.go_to_start(&mut self.rules);
        debug!("Rewound {} move(s)", undone.len());
        self.renderer.set_last_move(None);
        self.sync_board();
        self.clear_selection();
    }

    pub fn go_to_end(&mut self) {
        if !self.history.can_redo() {
            return;
        }
        self.close_promotion();
        match self.history.go_to_end(&mut self.rules) {
            Ok(replayed) => debug!("Fast-forwarded {} move(s)", replayed.len()),
            Err(err) => error!("Recorded move no longer replays: {err}"),
        }
        self.update_last_move();
        self.sync_board();
        self.clear_selection();
    }

    /// Slides the moved piece (and the castling rook) into place; reversed
    /// when the move was taken back.
    fn animate_move(&mut self, played: &Move, reverse: bool) {
        let (from, to) = if reverse {
            (played.to, played.from)
        } else {
            (played.from, played.to)
        };
        let result = self.renderer.animate(to, from, MOVE_ANIMATION);
        self.degrade(result);

        if let Some((rook_from, rook_to)) = played.rook_squares() {
            let result = if reverse {
                self.renderer.animate(rook_from, rook_to, MOVE_ANIMATION)
            } else {
                self.renderer.animate(rook_to, rook_from, MOVE_ANIMATION)
            };
            self.degrade(result);
        }
    }
}
