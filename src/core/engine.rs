use log::{debug, info, trace};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, EnPassantMode, File, Position, Role};

use crate::core::definitions::{
    Color, GameStatus, Move, Ownership, Piece, PieceKind, PlayerColor, Square,
};
use crate::core::error::BoardError;

/// Sentinel accepted by [`RulesEngine::load`] for the standard starting position.
pub const DEFAULT_POSITION: &str = "default";

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Surface of the chess rules engine the board is driven by.
///
/// Implementations own one game position and the stack of moves played on it.
pub trait RulesEngine {
    /// Replaces the position. On error the previous position stays untouched.
    fn load(&mut self, position: &str) -> Result<(), BoardError>;
    fn fen(&self) -> String;
    fn get(&self, square: Square) -> Option<Piece>;
    fn turn(&self) -> Color;
    /// Legal moves of the piece standing on `square` (verbose form).
    fn moves(&self, square: Square) -> Vec<Move>;
    fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, BoardError>;
    fn undo(&mut self) -> Option<Move>;
    fn is_check(&self) -> bool;
    fn is_checkmate(&self) -> bool;
    fn is_stalemate(&self) -> bool;
    fn is_threefold_repetition(&self) -> bool;
    fn is_insufficient_material(&self) -> bool;
    fn is_draw(&self) -> bool;
    /// Rows from rank 8 down to rank 1, files a to h.
    fn board(&self) -> [[Option<Piece>; 8]; 8];
}

/** `RulesEngine` backed by shakmaty */
#[derive(Debug, Clone)]
pub struct ShakmatyEngine {
    position: Chess,
    played: Vec<(Chess, Move)>,
    /// Repetition keys of every position since `load`, current one last.
    seen: Vec<String>,
}

impl ShakmatyEngine {
    pub fn new() -> Self {
        let position = Chess::default();
        let seen = vec![repetition_key(&position)];
        ShakmatyEngine {
            position,
            played: Vec::new(),
            seen,
        }
    }

    pub fn from_fen(position: &str) -> Result<Self, BoardError> {
        let mut engine = ShakmatyEngine::new();
        engine.load(position)?;
        Ok(engine)
    }

    fn find_legal(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Option<shakmaty::Move> {
        self.position.legal_moves().into_iter().find(|candidate| {
            candidate.from() == Some(to_shakmaty(from))
                && king_destination(candidate) == to_shakmaty(to)
                && candidate.promotion().map(kind_from_role) == promotion
        })
    }

    fn describe(&self, candidate: &shakmaty::Move) -> Option<Move> {
        Some(Move {
            from: from_shakmaty(candidate.from()?),
            to: from_shakmaty(king_destination(candidate)),
            promotion: candidate.promotion().map(kind_from_role),
            san: SanPlus::from_move(self.position.clone(), candidate.clone()).to_string(),
        })
    }
}

impl Default for ShakmatyEngine {
    fn default() -> Self {
        ShakmatyEngine::new()
    }
}

impl RulesEngine for ShakmatyEngine {
    fn load(&mut self, position: &str) -> Result<(), BoardError> {
        let invalid = |reason: String| BoardError::InvalidPosition {
            position: position.to_string(),
            reason,
        };
        let parsed = if is_default_sentinel(position) {
            Chess::default()
        } else {
            let fen: Fen = complete_fen(position)
                .parse()
                .map_err(|err: shakmaty::fen::ParseFenError| invalid(err.to_string()))?;
            fen.into_position::<Chess>(CastlingMode::Standard)
                .map_err(|err| invalid(err.to_string()))?
        };
        self.seen = vec![repetition_key(&parsed)];
        self.position = parsed;
        self.played.clear();
        info!("Loaded position {}", self.fen());
        Ok(())
    }

    fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    fn get(&self, square: Square) -> Option<Piece> {
        self.position
            .board()
            .piece_at(to_shakmaty(square))
            .map(piece_from_shakmaty)
    }

    fn turn(&self) -> Color {
        color_from_shakmaty(self.position.turn())
    }

    fn moves(&self, square: Square) -> Vec<Move> {
        let from = to_shakmaty(square);
        self.position
            .legal_moves()
            .iter()
            .filter(|candidate| candidate.from() == Some(from))
            .filter_map(|candidate| self.describe(candidate))
            .collect()
    }

    fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, BoardError> {
        let legal = self
            .find_legal(from, to, promotion)
            .ok_or(BoardError::IllegalMove {
                from,
                to,
                promotion,
            })?;
        let played = self
            .describe(&legal)
            .ok_or(BoardError::IllegalMove {
                from,
                to,
                promotion,
            })?;
        let previous = self.position.clone();
        self.position = previous
            .clone()
            .play(legal)
            .map_err(|_| BoardError::IllegalMove {
                from,
                to,
                promotion,
            })?;
        self.seen.push(repetition_key(&self.position));
        self.played.push((previous, played.clone()));
        trace!("Engine played {} ({})", played, played.san);
        Ok(played)
    }

    fn undo(&mut self) -> Option<Move> {
        let (previous, played) = self.played.pop()?;
        self.position = previous;
        self.seen.pop();
        trace!("Engine took back {}", played);
        Some(played)
    }

    fn is_check(&self) -> bool {
        self.position.is_check()
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    fn is_threefold_repetition(&self) -> bool {
        match self.seen.last() {
            Some(current) => self.seen.iter().filter(|key| *key == current).count() >= 3,
            None => false,
        }
    }

    fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    fn is_draw(&self) -> bool {
        self.position.halfmoves() >= 100
            || self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_threefold_repetition()
    }

    fn board(&self) -> [[Option<Piece>; 8]; 8] {
        let mut grid = [[None; 8]; 8];
        for square in Square::all() {
            grid[7 - square.rank() as usize][square.file() as usize] = self.get(square);
        }
        grid
    }
}

fn is_default_sentinel(position: &str) -> bool {
    let position = position.trim();
    position.is_empty() || position == DEFAULT_POSITION || position == "start"
}

/// Fills the fields a partial FEN leaves out with their usual defaults.
fn complete_fen(position: &str) -> String {
    const DEFAULTS: [&str; 6] = ["", "w", "-", "-", "0", "1"];
    let mut fields: Vec<&str> = position.split_whitespace().collect();
    fields.extend(DEFAULTS.iter().skip(fields.len()));
    fields.join(" ")
}

/// Placement, side to move, castling rights and en passant square.
fn repetition_key(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal)
        .to_string()
        .split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Where the moving piece lands; castling is reported as the king's square.
fn king_destination(candidate: &shakmaty::Move) -> shakmaty::Square {
    match candidate {
        shakmaty::Move::Castle { king, rook, .. } => {
            let file = if rook.file() == File::H {
                File::G
            } else {
                File::C
            };
            shakmaty::Square::from_coords(file, king.rank())
        }
        other => other.to(),
    }
}

fn to_shakmaty(square: Square) -> shakmaty::Square {
    shakmaty::Square::from_coords(
        File::new(square.file() as u32),
        shakmaty::Rank::new(square.rank() as u32),
    )
}

fn from_shakmaty(square: shakmaty::Square) -> Square {
    Square::at(square.file() as u8, square.rank() as u8)
}

fn color_from_shakmaty(color: shakmaty::Color) -> Color {
    match color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

fn kind_from_role(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

fn piece_from_shakmaty(piece: shakmaty::Piece) -> Piece {
    Piece::new(kind_from_role(piece.role), color_from_shakmaty(piece.color))
}

/// Thin facade over a [`RulesEngine`]; adds no legality rules of its own.
#[derive(Debug, Clone)]
pub struct RulesAdapter<E: RulesEngine> {
    engine: E,
    initial_position: String,
}

impl<E: RulesEngine + Default> Default for RulesAdapter<E> {
    fn default() -> Self {
        RulesAdapter::new(E::default())
    }
}

impl<E: RulesEngine> RulesAdapter<E> {
    pub fn new(engine: E) -> Self {
        let initial_position = engine.fen();
        RulesAdapter {
            engine,
            initial_position,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Position the current game started from (as loaded).
    pub fn initial_position(&self) -> &str {
        &self.initial_position
    }

    pub fn load(&mut self, position: &str) -> Result<(), BoardError> {
        self.engine.load(position)?;
        self.initial_position = self.engine.fen();
        Ok(())
    }

    pub fn fen(&self) -> String {
        self.engine.fen()
    }

    pub fn turn(&self) -> Color {
        self.engine.turn()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.engine.get(square)
    }

    pub fn board(&self) -> [[Option<Piece>; 8]; 8] {
        self.engine.board()
    }

    /// Destination squares of the piece on `square`, without duplicates.
    pub fn legal_destinations(&self, square: Square) -> Vec<Square> {
        let mut destinations: Vec<Square> = Vec::new();
        for legal in self.engine.moves(square) {
            if !destinations.contains(&legal.to) {
                destinations.push(legal.to);
            }
        }
        destinations
    }

    pub fn is_legal_destination(&self, from: Square, to: Square) -> bool {
        self.engine.moves(from).iter().any(|legal| legal.to == to)
    }

    pub fn is_own(&self, piece: Option<Piece>, player: PlayerColor) -> Ownership {
        let Some(piece) = piece else {
            return Ownership::NotApplicable;
        };
        let own = match player {
            PlayerColor::Both => piece.color == self.engine.turn(),
            PlayerColor::White => piece.color == Color::White,
            PlayerColor::Black => piece.color == Color::Black,
        };
        if own {
            Ownership::Own
        } else {
            Ownership::Enemy
        }
    }

    /// Whether the configured player may move the piece on `square` right now.
    pub fn can_move_piece(&self, square: Square, player: PlayerColor) -> bool {
        let turn = self.engine.turn();
        match self.engine.get(square) {
            None => false,
            Some(piece) => match player {
                PlayerColor::Both => piece.color == turn,
                PlayerColor::White => piece.color == Color::White && turn == Color::White,
                PlayerColor::Black => piece.color == Color::Black && turn == Color::Black,
            },
        }
    }

    pub fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, BoardError> {
        let played = self.engine.make_move(from, to, promotion)?;
        debug!("Move {} played", played);
        Ok(played)
    }

    /// Re-plays a move recorded earlier in the history.
    pub fn replay(&mut self, recorded: &Move) -> Result<Move, BoardError> {
        self.engine
            .make_move(recorded.from, recorded.to, recorded.promotion)
    }

    pub fn undo(&mut self) -> Option<Move> {
        self.engine.undo()
    }

    pub fn is_promotion_move(&self, from: Square, to: Square) -> bool {
        match self.engine.get(from) {
            Some(piece) if piece.kind == PieceKind::Pawn => {
                to.rank() == piece.color.promotion_rank()
            }
            _ => false,
        }
    }

    pub fn is_check(&self) -> bool {
        self.engine.is_check()
    }

    /// First matching status in priority order.
    pub fn game_status(&self) -> GameStatus {
        if self.engine.is_checkmate() {
            GameStatus::Checkmate
        } else if self.engine.is_stalemate() {
            GameStatus::Stalemate
        } else if self.engine.is_threefold_repetition() {
            GameStatus::ThreefoldRepetition
        } else if self.engine.is_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else if self.engine.is_draw() {
            GameStatus::Draw
        } else if self.engine.is_check() {
            GameStatus::Check
        } else {
            GameStatus::None
        }
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&square| {
            self.engine.get(square) == Some(Piece::new(PieceKind::King, color))
        })
    }
}
