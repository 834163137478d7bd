pub mod board;
pub mod core;

// module re-exports
pub use crate::board::config::{BoardConfig, Interactivity, Style, Visual};
pub use crate::board::handlers::Handlers;
pub use crate::board::input::{Buttons, Key, Modifiers, PointerEvent, PointerSource};
pub use crate::board::render::{Renderer, RenderError, Scene};
pub use crate::board::{ChessBoard, InteractionState};
pub use crate::core::annotations::{AnnotationKey, AnnotationStore, Paint, Toggle, Variant};
pub use crate::core::definitions::{
    Color, GameStatus, Move, Orientation, Ownership, Piece, PieceKind, PlayerColor, Square,
};
pub use crate::core::engine::{RulesAdapter, RulesEngine, ShakmatyEngine};
pub use crate::core::error::BoardError;
pub use crate::core::history::MoveHistory;
pub use crate::core::utils::BoardGeometry;
