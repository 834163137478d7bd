use log::info;

use crate::board::input::Buttons;
use crate::core::definitions::{GameStatus, Move, PieceKind, Square};

pub type SquareCallback = Box<dyn FnMut(Square, Buttons)>;
pub type MoveStartCallback = Box<dyn FnMut(Square, Square, Option<PieceKind>)>;
/// Receives the played move and the position (FEN) after it.
pub type MoveEndCallback = Box<dyn FnMut(&Move, &str)>;
pub type MoveCallback = Box<dyn FnMut(&Move)>;

/// Optional callbacks invoked at fixed points of the interaction.
///
/// An empty slot is a no-op.
#[derive(Default)]
pub struct Handlers {
    pub square_pointer_down: Option<SquareCallback>,
    pub move_start: Option<MoveStartCallback>,
    pub move_end: Option<MoveEndCallback>,
    pub checkmate: Option<MoveCallback>,
    pub stalemate: Option<MoveCallback>,
    pub threefold_repetition: Option<MoveCallback>,
    pub insufficient_material: Option<MoveCallback>,
    pub draw: Option<MoveCallback>,
    pub check: Option<MoveCallback>,
}

impl Handlers {
    pub fn new() -> Self {
        Handlers::default()
    }

    pub fn on_square_pointer_down(mut self, callback: impl FnMut(Square, Buttons) + 'static) -> Self {
        self.square_pointer_down = Some(Box::new(callback));
        self
    }

    pub fn on_move_start(
        mut self,
        callback: impl FnMut(Square, Square, Option<PieceKind>) + 'static,
    ) -> Self {
        self.move_start = Some(Box::new(callback));
        self
    }

    pub fn on_move_end(mut self, callback: impl FnMut(&Move, &str) + 'static) -> Self {
        self.move_end = Some(Box::new(callback));
        self
    }

    pub fn on_checkmate(mut self, callback: impl FnMut(&Move) + 'static) -> Self {
        self.checkmate = Some(Box::new(callback));
        self
    }

    pub fn on_stalemate(mut self, callback: impl FnMut(&Move) + 'static) -> Self {
        self.stalemate = Some(Box::new(callback));
        self
    }

    pub fn on_threefold_repetition(mut self, callback: impl FnMut(&Move) + 'static) -> Self {
        self.threefold_repetition = Some(Box::new(callback));
        self
    }

    pub fn on_insufficient_material(mut self, callback: impl FnMut(&Move) + 'static) -> Self {
        self.insufficient_material = Some(Box::new(callback));
        self
    }

    pub fn on_draw(mut self, callback: impl FnMut(&Move) + 'static) -> Self {
        self.draw = Some(Box::new(callback));
        self
    }

    pub fn on_check(mut self, callback: impl FnMut(&Move) + 'static) -> Self {
        self.check = Some(Box::new(callback));
        self
    }

    pub(crate) fn square_pointer_down(&mut self, square: Square, buttons: Buttons) {
        if let Some(callback) = self.square_pointer_down.as_mut() {
            callback(square, buttons);
        }
    }

    pub(crate) fn move_start(&mut self, from: Square, to: Square, promotion: Option<PieceKind>) {
        if let Some(callback) = self.move_start.as_mut() {
            callback(from, to, promotion);
        }
    }

    pub(crate) fn move_end(&mut self, played: &Move, position: &str) {
        if let Some(callback) = self.move_end.as_mut() {
            callback(played, position);
        }
    }

    /// Fires the one callback matching `status`, if any.
    pub(crate) fn game_status(&mut self, status: GameStatus, played: &Move) {
        let slot = match status {
            GameStatus::Checkmate => &mut self.checkmate,
            GameStatus::Stalemate => &mut self.stalemate,
            GameStatus::ThreefoldRepetition => &mut self.threefold_repetition,
            GameStatus::InsufficientMaterial => &mut self.insufficient_material,
            GameStatus::Draw => &mut self.draw,
            GameStatus::Check => &mut self.check,
            GameStatus::None => return,
        };
        if status != GameStatus::Check {
            info!("Game over after {}: {:?}", played.san, status);
        }
        if let Some(callback) = slot.as_mut() {
            callback(played);
        }
    }
}

impl std::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers")
            .field("square_pointer_down", &self.square_pointer_down.is_some())
            .field("move_start", &self.move_start.is_some())
            .field("move_end", &self.move_end.is_some())
            .field("checkmate", &self.checkmate.is_some())
            .field("stalemate", &self.stalemate.is_some())
            .field("threefold_repetition", &self.threefold_repetition.is_some())
            .field("insufficient_material", &self.insufficient_material.is_some())
            .field("draw", &self.draw.is_some())
            .field("check", &self.check.is_some())
            .finish()
    }
}
