use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::{Duration, Instant};

use log::trace;
use thiserror::Error;

use crate::board::config::Style;
use crate::core::annotations::{AnnotationKey, Paint};
use crate::core::definitions::{Orientation, Piece, Square};
use crate::core::utils::square_to_grid;

pub const MOVE_ANIMATION: Duration = Duration::from_millis(100);
pub const CHECK_FLASH: Duration = Duration::from_millis(250);
/// Pointer travel, in pixels along either axis, before a press becomes a drag.
pub const DRAG_THRESHOLD: f32 = 10.0;

const ARROW_START_OFFSET: f32 = 0.35;
const ARROW_BASE_OFFSET: f32 = 0.35;
const ARROW_HALF_SHAFT: f32 = 0.1;
const ARROW_HALF_TIP: f32 = 0.25;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("no piece element on {0}")]
    MissingPiece(Square),
}

/// Legal-move indicator target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegalTarget {
    pub square: Square,
    /// An enemy piece stands on the target.
    pub capture: bool,
}

/// Selected square and whether its piece belongs to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Highlight {
    pub square: Square,
    pub own: bool,
}

/// Drawing side of the board. Every call replaces the matching layer, so
/// calling twice with the same arguments changes nothing.
pub trait Renderer {
    fn apply_style(&mut self, style: &Style);
    fn set_orientation(&mut self, orientation: Orientation);
    /// Rows from rank 8 down to rank 1, files a to h.
    fn sync_pieces(&mut self, board: &[[Option<Piece>; 8]; 8]);
    fn set_selected(&mut self, selected: Option<Highlight>);
    fn set_legal_moves(&mut self, targets: &[LegalTarget]);
    fn set_last_move(&mut self, last_move: Option<(Square, Square)>);
    /// Shows the check indicator on `king` for `duration`, then drops it.
    fn flash_check(&mut self, king: Square, duration: Duration);
    fn put_annotation(&mut self, key: AnnotationKey, paint: &Paint);
    fn remove_annotation(&mut self, key: AnnotationKey);
    /// Lists the choices and hides the pawn waiting on `pawn`.
    fn show_promotion(&mut self, choices: &[(Square, Piece)], pawn: Square);
    fn clear_promotion(&mut self);
    fn begin_drag(&mut self, origin: Square) -> Result<(), RenderError>;
    fn move_drag(&mut self, x: f32, y: f32);
    fn set_drag_target(&mut self, target: Option<Square>);
    fn end_drag(&mut self);
    /// Slides the piece now standing on `square` in from `from`.
    fn animate(&mut self, square: Square, from: Square, duration: Duration) -> Result<(), RenderError>;
}

/// Outline of an arrow between two squares, in grid units (one square = 1.0,
/// origin at the top-left corner of the drawn board).
///
/// Points run shaft, tip, shaft back, as a closed polygon. `None` when both
/// squares coincide.
pub fn arrow_polygon(from: Square, to: Square, orientation: Orientation) -> Option<[(f32, f32); 7]> {
    let (x1, y1) = square_to_grid(from, orientation);
    let (x2, y2) = square_to_grid(to, orientation);
    let (sx, sy) = (x1 as f32 + 0.5, y1 as f32 + 0.5);
    let (ex, ey) = (x2 as f32 + 0.5, y2 as f32 + 0.5);
    let (dx, dy) = (ex - sx, ey - sy);
    let dist = dx.hypot(dy);
    if dist == 0.0 {
        return None;
    }
    let (ux, uy) = (dx / dist, dy / dist);
    let (start_x, start_y) = (sx + ux * ARROW_START_OFFSET, sy + uy * ARROW_START_OFFSET);
    let (base_x, base_y) = (ex - ux * ARROW_BASE_OFFSET, ey - uy * ARROW_BASE_OFFSET);
    let (px, py) = (-uy, ux);
    Some([
        (start_x + px * ARROW_HALF_SHAFT, start_y + py * ARROW_HALF_SHAFT),
        (base_x + px * ARROW_HALF_SHAFT, base_y + py * ARROW_HALF_SHAFT),
        (base_x + px * ARROW_HALF_TIP, base_y + py * ARROW_HALF_TIP),
        (ex, ey),
        (base_x - px * ARROW_HALF_TIP, base_y - py * ARROW_HALF_TIP),
        (base_x - px * ARROW_HALF_SHAFT, base_y - py * ARROW_HALF_SHAFT),
        (start_x - px * ARROW_HALF_SHAFT, start_y - py * ARROW_HALF_SHAFT),
    ])
}

/// Fire-and-forget visual effect with a deadline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effect {
    pub square: Square,
    /// Where an animated piece starts from; equals `square` for flashes.
    pub from: Square,
    pub started: Instant,
    pub duration: Duration,
}

impl Effect {
    fn new(square: Square, from: Square, duration: Duration) -> Self {
        Effect {
            square,
            from,
            started: Instant::now(),
            duration,
        }
    }

    /// Elapsed share of the effect in `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// The piece following the pointer while dragging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragProxy {
    pub piece: Piece,
    pub origin: Square,
    /// Last pointer position; `None` until the pointer passed the threshold.
    pub pointer: Option<(f32, f32)>,
}

/// In-memory retained renderer: one entry per square for pieces and one per
/// [`AnnotationKey`] for overlays. Hosts paint from it; tests inspect it.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    style: Style,
    orientation: Orientation,
    pieces: HashMap<Square, Piece>,
    hidden: HashSet<Square>,
    selected: Option<Highlight>,
    legal_moves: Vec<LegalTarget>,
    last_move: Option<(Square, Square)>,
    check_flashes: Vec<Effect>,
    annotations: BTreeMap<AnnotationKey, Paint>,
    promotion: Vec<(Square, Piece)>,
    promotion_pawn: Option<Square>,
    drag: Option<DragProxy>,
    drag_target: Option<Square>,
    animations: Vec<Effect>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.pieces.get(&square).copied()
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces.iter().map(|(square, piece)| (*square, *piece))
    }

    /// Piece is on the board but not drawn (dragged away or awaiting promotion).
    pub fn is_hidden(&self, square: Square) -> bool {
        self.hidden.contains(&square)
    }

    pub fn selected(&self) -> Option<Highlight> {
        self.selected
    }

    pub fn legal_moves(&self) -> &[LegalTarget] {
        &self.legal_moves
    }

    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    pub fn check_flashes(&self) -> &[Effect] {
        &self.check_flashes
    }

    pub fn annotations(&self) -> &BTreeMap<AnnotationKey, Paint> {
        &self.annotations
    }

    pub fn promotion_choices(&self) -> &[(Square, Piece)] {
        &self.promotion
    }

    pub fn drag(&self) -> Option<&DragProxy> {
        self.drag.as_ref()
    }

    pub fn drag_target(&self) -> Option<Square> {
        self.drag_target
    }

    pub fn animations(&self) -> &[Effect] {
        &self.animations
    }

    pub fn is_animating(&self) -> bool {
        !self.animations.is_empty() || !self.check_flashes.is_empty()
    }

    /// Drops effects whose time is up.
    pub fn tick(&mut self, now: Instant) {
        self.animations.retain(|effect| !effect.is_finished(now));
        self.check_flashes.retain(|effect| !effect.is_finished(now));
    }

    /// Grid position a piece is drawn at right now, interpolated while animating.
    pub fn piece_position(&self, square: Square, now: Instant) -> (f32, f32) {
        let (x, y) = square_to_grid(square, self.orientation);
        let target = (x as f32, y as f32);
        let Some(effect) = self.animations.iter().rev().find(|effect| effect.square == square) else {
            return target;
        };
        let (fx, fy) = square_to_grid(effect.from, self.orientation);
        let t = ease_out(effect.progress(now));
        (
            fx as f32 + (target.0 - fx as f32) * t,
            fy as f32 + (target.1 - fy as f32) * t,
        )
    }
}

fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

impl Renderer for Scene {
    fn apply_style(&mut self, style: &Style) {
        self.style = style.clone();
    }

    fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    fn sync_pieces(&mut self, board: &[[Option<Piece>; 8]; 8]) {
        self.pieces.clear();
        for square in Square::all() {
            if let Some(piece) = board[7 - square.rank() as usize][square.file() as usize] {
                self.pieces.insert(square, piece);
            }
        }
        self.hidden.retain(|square| self.pieces.contains_key(square));
        // running animations refer to squares that may have been vacated
        let pieces = &self.pieces;
        self.animations.retain(|effect| pieces.contains_key(&effect.square));
    }

    fn set_selected(&mut self, selected: Option<Highlight>) {
        self.selected = selected;
    }

    fn set_legal_moves(&mut self, targets: &[LegalTarget]) {
        self.legal_moves = targets.to_vec();
    }

    fn set_last_move(&mut self, last_move: Option<(Square, Square)>) {
        self.last_move = last_move;
    }

    fn flash_check(&mut self, king: Square, duration: Duration) {
        self.check_flashes.push(Effect::new(king, king, duration));
    }

    fn put_annotation(&mut self, key: AnnotationKey, paint: &Paint) {
        self.annotations.insert(key, paint.clone());
    }

    fn remove_annotation(&mut self, key: AnnotationKey) {
        self.annotations.remove(&key);
    }

    fn show_promotion(&mut self, choices: &[(Square, Piece)], pawn: Square) {
        self.promotion = choices.to_vec();
        self.promotion_pawn = Some(pawn);
        self.hidden.insert(pawn);
    }

    fn clear_promotion(&mut self) {
        self.promotion.clear();
        if let Some(pawn) = self.promotion_pawn.take() {
            self.hidden.remove(&pawn);
        }
    }

    fn begin_drag(&mut self, origin: Square) -> Result<(), RenderError> {
        let piece = self.piece_at(origin).ok_or(RenderError::MissingPiece(origin))?;
        self.hidden.insert(origin);
        self.drag = Some(DragProxy {
            piece,
            origin,
            pointer: None,
        });
        Ok(())
    }

    fn move_drag(&mut self, x: f32, y: f32) {
        if let Some(proxy) = self.drag.as_mut() {
            proxy.pointer = Some((x, y));
        }
    }

    fn set_drag_target(&mut self, target: Option<Square>) {
        self.drag_target = target;
    }

    fn end_drag(&mut self) {
        if let Some(proxy) = self.drag.take() {
            self.hidden.remove(&proxy.origin);
        }
        self.drag_target = None;
    }

    fn animate(&mut self, square: Square, from: Square, duration: Duration) -> Result<(), RenderError> {
        if !self.pieces.contains_key(&square) {
            return Err(RenderError::MissingPiece(square));
        }
        trace!("Animating {} from {}", square, from);
        self.animations.retain(|effect| effect.square != square);
        self.animations.push(Effect::new(square, from, duration));
        Ok(())
    }
}
