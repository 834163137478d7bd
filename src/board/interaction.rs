use log::trace;

use crate::board::input::{Key, PointerEvent};
use crate::board::render::{Renderer, DRAG_THRESHOLD};
use crate::board::ChessBoard;
use crate::core::annotations::Variant;
use crate::core::definitions::{Color, Piece, PieceKind, Square};
use crate::core::engine::RulesEngine;

/// A press on a piece that may turn into a drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
    pub piece: Piece,
    pub origin_square: Square,
    pub pointer_origin: (f32, f32),
    /// The pointer travelled far enough for the proxy to follow it.
    pub has_exceeded_threshold: bool,
}

/// Pawn move waiting for the promotion piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromotionRequest {
    pub from: Square,
    pub target_square: Square,
    pub color: Color,
    /// Choice squares run from the target toward the centre of the board.
    pub choices: Vec<(Square, PieceKind)>,
}

impl PromotionRequest {
    pub fn new(from: Square, target_square: Square, color: Color) -> Self {
        let step = match color {
            Color::White => -1,
            Color::Black => 1,
        };
        let choices = PieceKind::PROMOTION_CHOICES
            .iter()
            .enumerate()
            .filter_map(|(i, &kind)| Some((target_square.offset(0, step * i as i8)?, kind)))
            .collect();
        PromotionRequest {
            from,
            target_square,
            color,
            choices,
        }
    }

    pub fn choice_at(&self, square: Square) -> Option<PieceKind> {
        self.choices
            .iter()
            .find(|(choice, _)| *choice == square)
            .map(|(_, kind)| *kind)
    }
}

/// Observable interaction state.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionState {
    Idle,
    Selected(Square),
    Dragging(DragState),
    PromotionPending(PromotionRequest),
}

#[derive(Debug)]
pub(crate) struct Interaction {
    pub(crate) selected: Option<Square>,
    pub(crate) drag: Option<DragState>,
    pub(crate) promotion: Option<PromotionRequest>,
    /// Held only while the secondary button is down.
    pub(crate) right_click_from: Option<Square>,
    /// Swallow the next pointer-up (after a both-buttons cancel).
    pub(crate) cancel_pointer_up: bool,
    /// The release right after a fresh selection never deselects.
    pub(crate) immune_first_release: bool,
}

impl Interaction {
    pub(crate) fn new() -> Self {
        Interaction {
            selected: None,
            drag: None,
            promotion: None,
            right_click_from: None,
            cancel_pointer_up: false,
            immune_first_release: true,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Interaction::new();
    }

    pub(crate) fn state(&self) -> InteractionState {
        if let Some(request) = &self.promotion {
            InteractionState::PromotionPending(request.clone())
        } else if let Some(drag) = self.drag {
            InteractionState::Dragging(drag)
        } else if let Some(square) = self.selected {
            InteractionState::Selected(square)
        } else {
            InteractionState::Idle
        }
    }
}

impl<E: RulesEngine, R: Renderer> ChessBoard<E, R> {
    pub fn pointer_down(&mut self, event: &PointerEvent) {
        let Some(square) = self
            .geometry
            .square_at(event.x, event.y, self.config.orientation)
        else {
            trace!("Pointer down outside the board at ({}, {})", event.x, event.y);
            return;
        };
        self.handlers.square_pointer_down(square, event.buttons);
        if !self.config.interactivity.enabled || self.interaction.drag.is_some() {
            return;
        }

        if event.buttons.is_secondary_only() {
            trace!("Right button down on {square}");
            self.interaction.right_click_from = Some(square);
            return;
        }

        if let Some(request) = self.interaction.promotion.take() {
            self.renderer.clear_promotion();
            match request.choice_at(square) {
                Some(kind) => {
                    trace!("Promotion choice {:?} on {square}", kind);
                    self.execute_move(request.from, request.target_square, Some(kind), true);
                }
                None => trace!("Promotion dismissed"),
            }
            self.clear_selection();
            return;
        }

        self.clear_standard_annotations();

        if let Some(from) = self.legal_move_to(square) {
            if self.rules.is_promotion_move(from, square) {
                self.begin_promotion(from, square);
            } else {
                self.execute_move(from, square, None, true);
            }
            return;
        }

        let piece = self.rules.piece_at(square);
        let ownership = self.ownership(square);
        if let Some(piece) = piece {
            if self.config.interactivity.can_start_drag(ownership.is_own()) {
                self.begin_drag(square, piece, event);
            }
        }

        if self.interaction.selected == Some(square) {
            return;
        }

        let own = ownership.is_own();
        if piece.is_none() || (!own && !self.config.interactivity.select_enemy_pieces) {
            if self.config.interactivity.deselect_on_empty_click {
                self.clear_selection();
            }
            return;
        }

        self.clear_selection();
        self.select_square(square);
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) {
        if self.interaction.drag.is_none() || self.interaction.right_click_from.is_some() {
            return;
        }
        if event.buttons.is_both() {
            trace!("Both buttons pressed, cancelling drag");
            self.pointer_up(event);
            self.interaction.cancel_pointer_up = true;
            return;
        }
        if !self.config.interactivity.enabled {
            return;
        }
        let Some(drag) = self.interaction.drag.as_mut() else {
            return;
        };
        let (ox, oy) = drag.pointer_origin;
        if drag.has_exceeded_threshold
            || (event.x - ox).abs() >= DRAG_THRESHOLD
            || (event.y - oy).abs() >= DRAG_THRESHOLD
        {
            drag.has_exceeded_threshold = true;
            self.renderer.move_drag(event.x, event.y);
            if self.config.visual.drag_square_circle {
                let target = self
                    .geometry
                    .square_at(event.x, event.y, self.config.orientation);
                self.renderer.set_drag_target(target);
            }
        }
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) {
        let dropped = self
            .geometry
            .square_at(event.x, event.y, self.config.orientation);

        if let Some(origin) = self.interaction.right_click_from.take() {
            let modifiers = event.modifiers;
            let variant = Variant::from_modifiers(modifiers.shift, modifiers.ctrl, modifiers.alt);
            match dropped {
                Some(target) if target == origin => {
                    if self.config.interactivity.marks {
                        self.render_right_click_mark(target, variant, None);
                    }
                }
                Some(target) => {
                    if self.config.interactivity.arrows {
                        self.render_right_drag_arrow(origin, target, variant, None);
                    }
                }
                None => trace!("Right button released outside the board"),
            }
            self.clear_selection();
            return;
        }

        if self.interaction.cancel_pointer_up {
            self.interaction.cancel_pointer_up = false;
            return;
        }

        let selected_own = self
            .interaction
            .selected
            .map(|square| self.ownership(square).is_own())
            .unwrap_or(false);
        if !self.config.interactivity.can_drop(selected_own) {
            // a drag can only be live here if the selection changed under it
            self.end_drag();
            self.release_on_selection(dropped);
            return;
        }

        if self.interaction.drag.is_none() || self.interaction.promotion.is_some() {
            return;
        }
        self.end_drag();

        if let Some(target) = dropped {
            if let Some(from) = self.legal_move_to(target) {
                if self.rules.is_promotion_move(from, target) {
                    self.begin_promotion(from, target);
                } else {
                    self.execute_move(from, target, None, false);
                }
                return;
            }
        }

        let interactivity = &self.config.interactivity;
        let on_selected = dropped.is_some() && dropped == self.interaction.selected;
        if (interactivity.deselect_on_empty_drop && !on_selected)
            || (interactivity.deselect_on_selected_square_drop && on_selected)
        {
            self.clear_selection();
        }
        self.release_on_selection(dropped);
    }

    pub fn key_down(&mut self, key: Key) {
        let interactivity = &self.config.interactivity;
        if !interactivity.enabled || !interactivity.keyboard_navigation {
            return;
        }
        match key {
            Key::ArrowLeft => {
                self.undo();
            }
            Key::ArrowRight => {
                self.redo();
            }
            Key::ArrowUp => self.go_to_start(),
            Key::ArrowDown => self.go_to_end(),
            Key::Other => {}
        }
    }

    /// Second release on the selected square deselects it.
    fn release_on_selection(&mut self, dropped: Option<Square>) {
        if !self.config.interactivity.keep_selected_on_click
            && !self.interaction.immune_first_release
            && dropped.is_some()
            && dropped == self.interaction.selected
        {
            self.clear_selection();
        }
        self.interaction.immune_first_release = false;
    }

    fn begin_drag(&mut self, square: Square, piece: Piece, event: &PointerEvent) {
        trace!("Drag armed on {square}");
        self.interaction.drag = Some(DragState {
            piece,
            origin_square: square,
            pointer_origin: (event.x, event.y),
            has_exceeded_threshold: false,
        });
        let result = self.renderer.begin_drag(square);
        self.degrade(result);
        self.pointer_source.subscribe();
    }

    pub(crate) fn end_drag(&mut self) {
        if self.interaction.drag.take().is_some() {
            self.renderer.end_drag();
            self.pointer_source.unsubscribe();
        }
    }

    fn begin_promotion(&mut self, from: Square, target: Square) {
        let color = self.rules.turn();
        let request = PromotionRequest::new(from, target, color);
        let choices: Vec<(Square, Piece)> = request
            .choices
            .iter()
            .map(|(square, kind)| (*square, Piece::new(*kind, color)))
            .collect();
        trace!("Promotion pending {from}->{target}");
        self.renderer.show_promotion(&choices, from);
        self.renderer.set_legal_moves(&[]);
        self.interaction.promotion = Some(request);
    }

    pub(crate) fn close_promotion(&mut self) {
        if self.interaction.promotion.take().is_some() {
            self.renderer.clear_promotion();
        }
    }
}
