use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::BoardError;
use crate::core::utils::{compact_pos, is_valid_coord, unpack_pos};

const FILES: &[u8; 8] = b"abcdefgh";

/** One of the 64 board cells, packed the 0x88 way (`rank << 4 | file`). */
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square(u8);

impl Square {
    /// Builds a square from zero-based file (a = 0) and rank (1 = 0).
    pub fn new(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square(compact_pos(rank, file)))
        } else {
            None
        }
    }

    /// Builds a square from coordinates already known to be in `0..8`.
    pub(crate) fn at(file: u8, rank: u8) -> Square {
        Square(compact_pos(rank & 0x07, file & 0x07))
    }

    pub fn file(self) -> u8 {
        let (_, file): (u8, u8) = unpack_pos(self.0);
        file
    }

    pub fn rank(self) -> u8 {
        let (rank, _): (u8, u8) = unpack_pos(self.0);
        rank
    }

    /// Rank as written in notation, 1..=8.
    pub fn rank_number(self) -> u8 {
        self.rank() + 1
    }

    pub fn file_char(self) -> char {
        FILES[self.file() as usize] as char
    }

    /// Square `df` files and `dr` ranks away, if it is still on the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        debug_assert!(df.abs() < 8 && dr.abs() < 8);
        let step = ((dr as u8) << 4).wrapping_add(df as u8);
        let pos = self.0.wrapping_add(step);
        is_valid_coord(pos).then_some(Square(pos))
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square(compact_pos(rank, file))))
    }
}

impl FromStr for Square {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(BoardError::InvalidSquare(s.to_string()));
        }
        let file = FILES.iter().position(|&f| f == bytes[0].to_ascii_lowercase());
        let rank = bytes[1].checked_sub(b'1');
        match (file, rank) {
            (Some(file), Some(rank)) => {
                Square::new(file as u8, rank).ok_or_else(|| BoardError::InvalidSquare(s.to_string()))
            }
            _ => Err(BoardError::InvalidSquare(s.to_string())),
        }
    }
}

impl TryFrom<String> for Square {
    type Error = BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(value: Square) -> Self {
        value.to_string()
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_number())
    }
}

impl std::fmt::Debug for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Square({self})")
    }
}

#[derive(PartialEq, Eq, Hash, Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank (zero-based) a pawn of this color promotes on.
    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(if self == &Self::White {
            "White"
        } else {
            "Black"
        })
    }
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Order in which promotion choices are offered.
    pub const PROMOTION_CHOICES: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Bishop,
    ];

    /// Lowercase letter used by FEN and move records (`q`, `n`, ...).
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.to_char().to_ascii_uppercase(),
            Color::Black => self.kind.to_char(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    /// Rook origin and destination files for this side.
    pub fn rook_files(self) -> (u8, u8) {
        match self {
            CastlingSide::KingSide => (7, 5),
            CastlingSide::QueenSide => (0, 3),
        }
    }
}

/// A move validated by the rules engine. Castling is addressed by the king's
/// destination square.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub san: String,
}

impl Move {
    /// Same from/to/promotion, regardless of notation.
    pub fn same_as(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }

    pub fn castling_side(&self) -> Option<CastlingSide> {
        match self.san.trim_end_matches(['+', '#']) {
            "O-O" => Some(CastlingSide::KingSide),
            "O-O-O" => Some(CastlingSide::QueenSide),
            _ => None,
        }
    }

    /// Rook origin/destination when this move castles.
    pub fn rook_squares(&self) -> Option<(Square, Square)> {
        let (from_file, to_file) = self.castling_side()?.rook_files();
        let rank = self.to.rank();
        Some((Square::new(from_file, rank)?, Square::new(to_file, rank)?))
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

/// Which side sits at the bottom of the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    #[serde(alias = "w")]
    White,
    #[serde(alias = "b")]
    Black,
}

impl Orientation {
    pub fn flipped(self) -> Orientation {
        match self {
            Orientation::White => Orientation::Black,
            Orientation::Black => Orientation::White,
        }
    }
}

/// Which pieces the local user controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    #[serde(alias = "w")]
    White,
    #[serde(alias = "b")]
    Black,
    #[default]
    Both,
}

/// Ownership of a piece relative to the configured player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    Own,
    Enemy,
    NotApplicable,
}

impl Ownership {
    pub fn is_own(self) -> bool {
        self == Ownership::Own
    }
}

/// Game-end or check status, listed in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Checkmate,
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    Draw,
    Check,
    None,
}
