use thiserror::Error;

use crate::core::definitions::{PieceKind, Square};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("illegal move {from}{to}{}", promotion_suffix(.promotion))]
    IllegalMove {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },
    #[error("invalid position `{position}`: {reason}")]
    InvalidPosition { position: String, reason: String },
    #[error("invalid square `{0}`")]
    InvalidSquare(String),
    #[error("invalid board configuration: {0}")]
    Config(#[from] serde_json::Error),
}

fn promotion_suffix(promotion: &Option<PieceKind>) -> String {
    promotion
        .map(|kind| kind.to_char().to_string())
        .unwrap_or_default()
}
