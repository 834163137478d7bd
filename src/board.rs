pub mod config;
pub mod handlers;
pub mod input;
mod interaction;
mod moves;
pub mod render;

use log::{debug, info};

use crate::board::config::BoardConfig;
use crate::board::handlers::Handlers;
use crate::board::input::{NoCapture, PointerSource};
use crate::board::render::{Highlight, LegalTarget, RenderError, Renderer, Scene, CHECK_FLASH};
use crate::core::annotations::{AnnotationKey, AnnotationStore, Paint, Toggle, Variant};
use crate::core::definitions::{Move, Orientation, Ownership, PieceKind, Square};
use crate::core::engine::{RulesAdapter, RulesEngine, ShakmatyEngine};
use crate::core::error::BoardError;
use crate::core::history::MoveHistory;
use crate::core::utils::BoardGeometry;

pub use crate::board::interaction::{DragState, InteractionState, PromotionRequest};
use crate::board::interaction::Interaction;

/// Interactive chessboard: turns pointer and keyboard input into moves,
/// history navigation and annotations, and mirrors the result on a [`Renderer`].
///
/// Everything runs synchronously inside the event call that triggered it.
pub struct ChessBoard<E: RulesEngine = ShakmatyEngine, R: Renderer = Scene> {
    rules: RulesAdapter<E>,
    history: MoveHistory,
    annotations: AnnotationStore,
    renderer: R,
    config: BoardConfig,
    handlers: Handlers,
    geometry: BoardGeometry,
    pointer_source: Box<dyn PointerSource>,
    interaction: Interaction,
}

impl ChessBoard<ShakmatyEngine, Scene> {
    /// Board on the bundled engine and the in-memory scene.
    pub fn with_config(config: BoardConfig) -> Result<Self, BoardError> {
        ChessBoard::new(ShakmatyEngine::new(), Scene::new(), config)
    }
}

impl<E: RulesEngine, R: Renderer> ChessBoard<E, R> {
    /// Loads `config.position` into `engine` and draws the initial state.
    pub fn new(mut engine: E, mut renderer: R, config: BoardConfig) -> Result<Self, BoardError> {
        engine.load(&config.position)?;
        renderer.apply_style(&config.style);
        renderer.set_orientation(config.orientation);
        let mut board = ChessBoard {
            rules: RulesAdapter::new(engine),
            history: MoveHistory::new(),
            annotations: AnnotationStore::new(),
            renderer,
            config,
            handlers: Handlers::default(),
            geometry: BoardGeometry::default(),
            pointer_source: Box::new(NoCapture),
            interaction: Interaction::new(),
        };
        board.sync_board();
        info!("Board ready at {}", board.rules.fen());
        Ok(board)
    }

    pub fn with_handlers(mut self, handlers: Handlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn with_pointer_source(mut self, source: impl PointerSource + 'static) -> Self {
        self.pointer_source = Box::new(source);
        self
    }

    pub fn with_geometry(mut self, geometry: BoardGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn handlers_mut(&mut self) -> &mut Handlers {
        &mut self.handlers
    }

    /// Pixel bounds used to map pointer positions to squares.
    pub fn set_geometry(&mut self, geometry: BoardGeometry) {
        self.geometry = geometry;
    }

    pub fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn rules(&self) -> &RulesAdapter<E> {
        &self.rules
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn selected(&self) -> Option<Square> {
        self.interaction.selected
    }

    pub fn state(&self) -> InteractionState {
        self.interaction.state()
    }

    /// Origin square of a right-button press still held down.
    pub fn right_click_origin(&self) -> Option<Square> {
        self.interaction.right_click_from
    }

    /// Move leading to the displayed position.
    pub fn last_move(&self) -> Option<&Move> {
        self.history.current()
    }

    /// Current position as FEN.
    pub fn position(&self) -> String {
        self.rules.fen()
    }

    /// Replaces the position and resets history. A position the engine
    /// rejects leaves the board exactly as it was.
    pub fn set_position(&mut self, position: &str) -> Result<(), BoardError> {
        self.rules.load(position)?;
        self.config.position = position.to_string();
        self.close_promotion();
        self.end_drag();
        self.interaction.reset();
        self.history.clear();
        self.clear_selection();
        self.renderer.set_last_move(None);
        self.sync_board();
        Ok(())
    }

    pub fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.config.orientation = orientation;
        self.renderer.set_orientation(orientation);
    }

    pub fn flip_board(&mut self) {
        self.set_orientation(self.config.orientation.flipped());
    }

    /// Plays a move as if it had been clicked, without animation.
    pub fn play_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, BoardError> {
        if !self.rules.is_legal_destination(from, to) {
            return Err(BoardError::IllegalMove {
                from,
                to,
                promotion,
            });
        }
        self.close_promotion();
        self.execute_move(from, to, promotion, false)
            .ok_or(BoardError::IllegalMove {
                from,
                to,
                promotion,
            })
    }

    /// Toggles a standard mark, as a right click would. `Variant::Custom` is
    /// ignored; use [`ChessBoard::add_custom_mark`] for those.
    pub fn render_right_click_mark(&mut self, square: Square, variant: Variant, paint: Option<Paint>) -> Toggle {
        let toggle = self.annotations.toggle_mark(square, variant, paint.clone());
        self.show_toggle(toggle, paint);
        toggle
    }

    /// Toggles an arrow, as a right-button drag would.
    pub fn render_right_drag_arrow(
        &mut self,
        from: Square,
        to: Square,
        variant: Variant,
        paint: Option<Paint>,
    ) -> Toggle {
        let toggle = self.annotations.toggle_arrow(from, to, variant, paint.clone());
        self.show_toggle(toggle, paint);
        toggle
    }

    pub fn add_custom_mark(&mut self, square: Square, paint: Option<Paint>) {
        let key = self.annotations.add_custom_mark(square, paint.clone());
        self.put_annotation(key, paint);
    }

    pub fn remove_custom_mark(&mut self, square: Square) {
        if let Some(key) = self.annotations.remove_custom_mark(square) {
            self.renderer.remove_annotation(key);
        }
    }

    pub fn clear_custom_marks(&mut self) {
        for key in self.annotations.clear_custom_marks() {
            self.renderer.remove_annotation(key);
        }
    }

    pub fn add_custom_arrow(&mut self, from: Square, to: Square, paint: Option<Paint>) {
        let key = self.annotations.add_custom_arrow(from, to, paint.clone());
        self.put_annotation(key, paint);
    }

    pub fn remove_custom_arrow(&mut self, from: Square, to: Square) {
        if let Some(key) = self.annotations.remove_custom_arrow(from, to) {
            self.renderer.remove_annotation(key);
        }
    }

    pub fn clear_custom_arrows(&mut self) {
        for key in self.annotations.clear_custom_arrows() {
            self.renderer.remove_annotation(key);
        }
    }

    fn show_toggle(&mut self, toggle: Toggle, paint: Option<Paint>) {
        match toggle {
            Toggle::Added(key) => self.put_annotation(key, paint),
            Toggle::Removed(key) => self.renderer.remove_annotation(key),
            Toggle::Retagged { from, to } => {
                self.renderer.remove_annotation(from);
                self.put_annotation(to, paint);
            }
            Toggle::Ignored => {}
        }
    }

    fn put_annotation(&mut self, key: AnnotationKey, paint: Option<Paint>) {
        let paint = paint.unwrap_or_else(|| self.config.style.annotation_paint(&key).clone());
        self.renderer.put_annotation(key, &paint);
    }

    /// Bulk clear of plain/shift/ctrl/alt marks and arrows.
    fn clear_standard_annotations(&mut self) {
        for key in self.annotations.clear_standard() {
            self.renderer.remove_annotation(key);
        }
    }

    fn sync_board(&mut self) {
        self.renderer.sync_pieces(&self.rules.board());
    }

    fn ownership(&self, square: Square) -> Ownership {
        self.rules
            .is_own(self.rules.piece_at(square), self.config.player_color)
    }

    fn select_square(&mut self, square: Square) {
        self.interaction.selected = Some(square);
        if self.config.visual.show_legal_moves {
            let targets: Vec<LegalTarget> = self
                .rules
                .legal_destinations(square)
                .into_iter()
                .map(|target| LegalTarget {
                    square: target,
                    capture: self.rules.piece_at(target).is_some(),
                })
                .collect();
            self.renderer.set_legal_moves(&targets);
        }
        if self.last_move().map(|last| last.to) == Some(square) {
            return;
        }
        let own = self.ownership(square).is_own();
        let visual = &self.config.visual;
        if (own && !visual.highlight_selected_piece_square_own)
            || (!own && !visual.highlight_selected_piece_square_enemy)
        {
            return;
        }
        self.renderer.set_selected(Some(Highlight { square, own }));
        debug!("Selected {square}");
    }

    fn clear_selection(&mut self) {
        self.interaction.selected = None;
        self.interaction.immune_first_release = true;
        self.renderer.set_selected(None);
        self.renderer.set_legal_moves(&[]);
    }

    /// Selected square when `target` is one of its legal destinations.
    ///
    /// Flashes the king when the side to move is in check and `target` is
    /// not a legal answer.
    fn legal_move_to(&mut self, target: Square) -> Option<Square> {
        let from = self.interaction.selected?;
        if from == target || !self.rules.can_move_piece(from, self.config.player_color) {
            return None;
        }
        let legal = self.rules.is_legal_destination(from, target);
        if !legal && self.rules.is_check() {
            if let Some(king) = self.rules.king_square(self.rules.turn()) {
                self.renderer.flash_check(king, CHECK_FLASH);
            }
        }
        legal.then_some(from)
    }

    fn update_last_move(&mut self) {
        let last = self.last_move().map(|last| (last.from, last.to));
        match last {
            Some(last) if self.config.visual.highlight_last_move => {
                self.renderer.set_last_move(Some(last))
            }
            _ => self.renderer.set_last_move(None),
        }
    }

    /// Renderer desync is fatal while debugging and only costs the effect in release.
    fn degrade(&self, result: Result<(), RenderError>) {
        if let Err(err) = result {
            #[cfg(debug_assertions)]
            panic!("Renderer out of sync with the board: {err}");
            #[cfg(not(debug_assertions))]
            log::warn!("Skipping visual effect: {err}");
        }
    }
}

impl<E: RulesEngine, R: Renderer> std::fmt::Debug for ChessBoard<E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChessBoard")
            .field("position", &self.rules.fen())
            .field("history", &self.history)
            .field("annotations", &self.annotations)
            .field("state", &self.interaction.state())
            .field("handlers", &self.handlers)
            .finish()
    }
}
