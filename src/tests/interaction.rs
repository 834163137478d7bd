use std::cell::Cell;
use std::time::Duration;

use super::*;
use crate::board::input::Key;
use crate::board::render::{arrow_polygon, Highlight, LegalTarget, CHECK_FLASH, MOVE_ANIMATION};

#[test]
fn standard_opening() {
    let mut board = board_at("default");
    click(&mut board, "e2");
    assert_eq!(board.selected(), Some(sq("e2")));
    assert_eq!(board.state(), InteractionState::Selected(sq("e2")));
    let destinations = board.rules().legal_destinations(sq("e2"));
    assert!(destinations.contains(&sq("e3")) && destinations.contains(&sq("e4")));
    assert_eq!(
        board.renderer().selected(),
        Some(Highlight {
            square: sq("e2"),
            own: true
        })
    );

    click(&mut board, "e4");
    assert_eq!(board.history().len(), 1);
    assert_eq!(board.history().current_index(), Some(0));
    assert_eq!(board.renderer().last_move(), Some((sq("e2"), sq("e4"))));
    assert_eq!(board.selected(), None);
    assert_eq!(board.renderer().selected(), None);
    assert_eq!(board.rules().turn(), Color::Black);
    let scene = board.renderer();
    assert_eq!(scene.piece_at(sq("e4")), Some(Piece::new(PieceKind::Pawn, Color::White)));
    assert_eq!(scene.piece_at(sq("e2")), None);
    assert!(scene
        .animations()
        .iter()
        .any(|effect| effect.square == sq("e4") && effect.from == sq("e2") && effect.duration == MOVE_ANIMATION));
}

#[test]
fn legal_move_indicators_when_enabled() {
    let mut board = board_with("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1", |config| {
        config.visual.show_legal_moves = true;
    });
    click(&mut board, "e1");
    let targets = board.renderer().legal_moves().to_vec();
    assert!(targets.contains(&LegalTarget {
        square: sq("d2"),
        capture: true
    }));
    assert!(targets.contains(&LegalTarget {
        square: sq("f2"),
        capture: false
    }));
    click(&mut board, "a8");
    assert!(board.renderer().legal_moves().is_empty());
}

#[test]
fn second_click_on_selection_deselects() {
    let mut board = board_at("default");
    click(&mut board, "g1");
    assert_eq!(board.selected(), Some(sq("g1")));
    click(&mut board, "g1");
    assert_eq!(board.selected(), None);
}

#[test]
fn keep_selected_on_click() {
    let mut board = board_with("default", |config| {
        config.interactivity.keep_selected_on_click = true;
    });
    click(&mut board, "g1");
    click(&mut board, "g1");
    assert_eq!(board.selected(), Some(sq("g1")));
}

#[test]
fn clicks_on_empty_and_enemy_squares() {
    let mut board = board_at("default");
    click(&mut board, "e2");
    click(&mut board, "e5");
    assert_eq!(board.selected(), None, "empty click deselects");

    click(&mut board, "e7");
    assert_eq!(board.selected(), Some(sq("e7")), "enemy pieces are selectable");
    assert_eq!(
        board.renderer().selected(),
        Some(Highlight {
            square: sq("e7"),
            own: false
        })
    );

    let mut strict = board_with("default", |config| {
        config.interactivity.select_enemy_pieces = false;
        config.interactivity.deselect_on_empty_click = false;
    });
    click(&mut strict, "e2");
    click(&mut strict, "e7");
    assert_eq!(strict.selected(), Some(sq("e2")));
    click(&mut strict, "e5");
    assert_eq!(strict.selected(), Some(sq("e2")));
}

#[test]
fn fixed_player_color_cannot_move_other_side() {
    let mut board = board_with("default", |config| {
        config.player_color = PlayerColor::Black;
    });
    click(&mut board, "e2");
    click(&mut board, "e4");
    assert!(board.history().is_empty());
    assert_eq!(board.rules().piece_at(sq("e2")), Some(Piece::new(PieceKind::Pawn, Color::White)));
}

#[test]
fn promotion_flow() {
    let mut board = board_at("8/4P3/8/8/8/8/k7/7K w - - 0 1");
    click(&mut board, "e7");
    click(&mut board, "e8");
    let InteractionState::PromotionPending(request) = board.state() else {
        panic!("expected a pending promotion, got {:?}", board.state());
    };
    assert_eq!(request.from, sq("e7"));
    assert_eq!(request.target_square, sq("e8"));
    assert_eq!(
        request.choices,
        vec![
            (sq("e8"), PieceKind::Queen),
            (sq("e7"), PieceKind::Knight),
            (sq("e6"), PieceKind::Rook),
            (sq("e5"), PieceKind::Bishop),
        ]
    );
    assert!(board.history().is_empty());
    assert!(board.renderer().is_hidden(sq("e7")));
    assert_eq!(board.renderer().promotion_choices().len(), 4);

    click(&mut board, "e8");
    assert_eq!(board.state(), InteractionState::Idle);
    assert_eq!(board.history().len(), 1);
    let promoted = &board.history().moves()[0];
    assert_eq!(promoted.promotion, Some(PieceKind::Queen));
    assert_eq!(promoted.to_string(), "e7e8q");
    let scene = board.renderer();
    assert_eq!(scene.piece_at(sq("e8")), Some(Piece::new(PieceKind::Queen, Color::White)));
    assert!(scene.promotion_choices().is_empty());
    assert!(!scene.is_hidden(sq("e7")));
    assert!(scene.animations().is_empty(), "promotion moves do not animate");
}

#[test]
fn promotion_choice_below_target() {
    let mut board = board_at("8/4P3/8/8/8/8/k7/7K w - - 0 1");
    click_move(&mut board, "e7", "e8");
    click(&mut board, "e7");
    assert_eq!(board.history().moves()[0].promotion, Some(PieceKind::Knight));
    assert_eq!(
        board.renderer().piece_at(sq("e8")),
        Some(Piece::new(PieceKind::Knight, Color::White))
    );
}

#[test]
fn promotion_dismissed_by_other_click() {
    let mut board = board_at("8/4P3/8/8/8/8/k7/7K w - - 0 1");
    click_move(&mut board, "e7", "e8");
    click(&mut board, "a1");
    assert_eq!(board.state(), InteractionState::Idle);
    assert!(board.history().is_empty());
    assert_eq!(
        board.renderer().piece_at(sq("e7")),
        Some(Piece::new(PieceKind::Pawn, Color::White))
    );
    assert!(!board.renderer().is_hidden(sq("e7")));
}

#[test]
fn black_promotion_choices_run_upward() {
    let mut board = board_at("7k/8/8/8/8/8/3p4/K7 b - - 0 1");
    drag(&mut board, "d2", "d1");
    let InteractionState::PromotionPending(request) = board.state() else {
        panic!("expected a pending promotion");
    };
    let squares: Vec<Square> = request.choices.iter().map(|(square, _)| *square).collect();
    assert_eq!(squares, vec![sq("d1"), sq("d2"), sq("d3"), sq("d4")]);
    assert_eq!(request.color, Color::Black);
    click(&mut board, "d3");
    assert_eq!(
        board.renderer().piece_at(sq("d1")),
        Some(Piece::new(PieceKind::Rook, Color::Black))
    );
}

#[test]
fn castling_undo_returns_king_and_rook() {
    let mut board = board_at("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    click_move(&mut board, "e1", "g1");
    assert_eq!(board.last_move().map(|m| m.san.as_str()), Some("O-O"));
    assert_eq!(
        board.renderer().piece_at(sq("f1")),
        Some(Piece::new(PieceKind::Rook, Color::White))
    );
    let animated: Vec<(Square, Square)> = board
        .renderer()
        .animations()
        .iter()
        .map(|effect| (effect.from, effect.square))
        .collect();
    assert!(animated.contains(&(sq("e1"), sq("g1"))));
    assert!(animated.contains(&(sq("h1"), sq("f1"))));

    let undone = board.undo().unwrap();
    assert_eq!(undone.san, "O-O");
    let scene = board.renderer();
    assert_eq!(scene.piece_at(sq("e1")), Some(Piece::new(PieceKind::King, Color::White)));
    assert_eq!(scene.piece_at(sq("h1")), Some(Piece::new(PieceKind::Rook, Color::White)));
    assert_eq!(scene.piece_at(sq("g1")), None);
    assert_eq!(scene.piece_at(sq("f1")), None);
    let animated: Vec<(Square, Square)> = scene
        .animations()
        .iter()
        .map(|effect| (effect.from, effect.square))
        .collect();
    assert!(animated.contains(&(sq("g1"), sq("e1"))));
    assert!(animated.contains(&(sq("f1"), sq("h1"))));
}

#[test]
fn right_drag_toggles_arrow() {
    let mut board = board_at("default");
    right_drag(&mut board, "b1", "c3", Modifiers::default());
    assert_eq!(board.annotations().arrow_at(sq("b1"), sq("c3")), Some(Variant::Plain));
    let key = AnnotationKey::Arrow {
        from: sq("b1"),
        to: sq("c3"),
        variant: Variant::Plain,
    };
    assert_eq!(
        board.renderer().annotations().get(&key),
        Some(&board.config().style.arrows.plain)
    );
    assert!(board.history().is_empty());

    right_drag(&mut board, "b1", "c3", Modifiers::default());
    assert_eq!(board.annotations().arrow_at(sq("b1"), sq("c3")), None);
    assert!(board.renderer().annotations().is_empty());
}

#[test]
fn right_click_marks_follow_modifiers() {
    let mut board = board_at("default");
    right_drag(&mut board, "d4", "d4", Modifiers::SHIFT);
    assert_eq!(board.annotations().mark_at(sq("d4")), Some(Variant::Shift));
    right_drag(&mut board, "d4", "d4", Modifiers::CTRL);
    assert_eq!(board.annotations().mark_at(sq("d4")), Some(Variant::Ctrl));
    let scene_keys: Vec<AnnotationKey> = board.renderer().annotations().keys().copied().collect();
    assert_eq!(
        scene_keys,
        vec![AnnotationKey::Mark {
            square: sq("d4"),
            variant: Variant::Ctrl
        }]
    );
    assert_eq!(board.right_click_origin(), None);
}

#[test]
fn right_click_clears_selection_and_respects_switches() {
    let mut board = board_with("default", |config| {
        config.interactivity.marks = false;
    });
    click(&mut board, "e2");
    right_drag(&mut board, "e4", "e4", Modifiers::default());
    assert_eq!(board.selected(), None);
    assert!(board.annotations().is_empty());
    right_drag(&mut board, "e4", "e5", Modifiers::ALT);
    assert_eq!(board.annotations().arrow_at(sq("e4"), sq("e5")), Some(Variant::Alt));
}

#[test]
fn primary_click_clears_standard_annotations_only() {
    let mut board = board_at("default");
    right_drag(&mut board, "e4", "e4", Modifiers::default());
    right_drag(&mut board, "e2", "e4", Modifiers::default());
    board.add_custom_mark(sq("h5"), None);
    board.add_custom_arrow(sq("a1"), sq("a8"), Some(Paint::new("#0000ff", 0.5)));
    assert_eq!(board.renderer().annotations().len(), 4);

    click(&mut board, "a3");
    assert_eq!(board.annotations().len(), 2);
    assert!(board.annotations().has_custom_mark(sq("h5")));
    let custom_arrow = AnnotationKey::Arrow {
        from: sq("a1"),
        to: sq("a8"),
        variant: Variant::Custom,
    };
    assert_eq!(
        board.renderer().annotations().get(&custom_arrow),
        Some(&Paint::new("#0000ff", 0.5))
    );

    board.clear_custom_marks();
    board.remove_custom_arrow(sq("a1"), sq("a8"));
    assert!(board.renderer().annotations().is_empty());
}

#[test]
fn custom_variant_toggle_leaves_overlays_alone() {
    let mut board = board_at("default");
    board.add_custom_mark(sq("h5"), None);
    assert_eq!(board.render_right_click_mark(sq("h5"), Variant::Custom, None), Toggle::Ignored);
    assert_eq!(
        board.render_right_drag_arrow(sq("a1"), sq("a8"), Variant::Custom, None),
        Toggle::Ignored
    );
    assert_eq!(board.renderer().annotations().len(), 1);
    assert!(board.annotations().has_custom_mark(sq("h5")));
}

#[test]
fn programmatic_annotations() {
    let mut board = board_at("default");
    let toggle = board.render_right_click_mark(sq("f7"), Variant::Alt, Some(Paint::new("red", 1.0)));
    assert!(matches!(toggle, Toggle::Added(_)));
    let key = AnnotationKey::Mark {
        square: sq("f7"),
        variant: Variant::Alt,
    };
    assert_eq!(board.renderer().annotations().get(&key), Some(&Paint::new("red", 1.0)));
    let toggle = board.render_right_drag_arrow(sq("g1"), sq("f3"), Variant::Plain, None);
    assert!(matches!(toggle, Toggle::Added(_)));
    board.render_right_drag_arrow(sq("g1"), sq("f3"), Variant::Plain, None);
    assert_eq!(board.annotations().len(), 1);
}

#[test]
fn check_flash_on_illegal_target() {
    let mut board = board_at("4k3/8/8/8/8/8/3P4/r3K3 w - - 0 1");
    click(&mut board, "d2");
    assert_eq!(board.selected(), Some(sq("d2")));
    assert!(board.renderer().check_flashes().is_empty());
    click(&mut board, "d3");
    let flashes = board.renderer().check_flashes();
    assert_eq!(flashes.len(), 1);
    assert_eq!(flashes[0].square, sq("e1"));
    assert_eq!(flashes[0].duration, CHECK_FLASH);
    assert!(board.history().is_empty());
}

#[test]
fn no_flash_without_check() {
    let mut board = board_at("default");
    click(&mut board, "e2");
    click(&mut board, "e5");
    assert!(board.renderer().check_flashes().is_empty());
}

#[test]
fn scene_effects_expire() {
    let mut board = board_at("default");
    click_move(&mut board, "e2", "e4");
    assert!(board.renderer().is_animating());
    let later = std::time::Instant::now() + Duration::from_secs(1);
    board.renderer_mut().tick(later);
    assert!(!board.renderer().is_animating());
}

#[test]
fn fools_mate_fires_checkmate_once() {
    let log: Log = Rc::default();
    let mut board = board_at("default").with_handlers(logging_handlers(&log));
    click_move(&mut board, "f2", "f3");
    click_move(&mut board, "e7", "e5");
    click_move(&mut board, "g2", "g4");
    click_move(&mut board, "d8", "h4");
    assert_eq!(game_events(&log), vec!["checkmate"]);
    assert_eq!(board.rules().game_status(), GameStatus::Checkmate);
    assert_eq!(board.last_move().map(|m| m.san.as_str()), Some("Qh4#"));
}

#[test]
fn knight_shuffle_reports_threefold() {
    let log: Log = Rc::default();
    let mut board = board_at("default").with_handlers(logging_handlers(&log));
    let shuffle = [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")];
    for _ in 0..2 {
        for (from, to) in shuffle {
            board.play_move(sq(from), sq(to), None).unwrap();
        }
    }
    assert_eq!(game_events(&log), vec!["threefold"]);
}

#[test]
fn insufficient_material_after_capture() {
    let log: Log = Rc::default();
    let mut board = board_at("4k3/8/8/8/8/8/3q4/4K3 w - - 0 1").with_handlers(logging_handlers(&log));
    log.borrow_mut().clear();
    board.play_move(sq("e1"), sq("d2"), None).unwrap();
    assert_eq!(game_events(&log), vec!["insufficient"]);
}

#[test]
fn callbacks_fire_in_order() {
    let log: Log = Rc::default();
    let mut board = board_at("4k3/8/8/8/8/8/8/4K2R w K - 0 1").with_handlers(logging_handlers(&log));
    click_move(&mut board, "h1", "h8");
    assert_eq!(
        *log.borrow(),
        vec!["down h1", "down h8", "start h1h8", "end Rh8+", "check"]
    );
}

#[test]
fn pointer_down_callback_fires_while_disabled() {
    let log: Log = Rc::default();
    let mut board = board_with("default", |config| {
        config.interactivity.enabled = false;
    })
    .with_handlers(logging_handlers(&log));
    click(&mut board, "e2");
    right_drag(&mut board, "e4", "e4", Modifiers::default());
    board.key_down(Key::ArrowLeft);
    assert_eq!(*log.borrow(), vec!["down e2", "down e4"]);
    assert_eq!(board.selected(), None);
    assert!(board.annotations().is_empty());
}

#[test]
fn drag_and_drop_moves_without_animation() {
    let mut board = board_at("default");
    let down = event_at(&board, "e2", Buttons::PRIMARY);
    board.pointer_down(&down);
    let InteractionState::Dragging(state) = board.state() else {
        panic!("expected a drag, got {:?}", board.state());
    };
    assert_eq!(state.origin_square, sq("e2"));
    assert!(!state.has_exceeded_threshold);
    assert!(board.renderer().is_hidden(sq("e2")));

    let over = event_at(&board, "e4", Buttons::PRIMARY);
    board.pointer_move(&over);
    let proxy = board.renderer().drag().copied().unwrap();
    assert_eq!(proxy.pointer, Some((over.x, over.y)));

    let up = event_at(&board, "e4", Buttons::NONE);
    board.pointer_up(&up);
    assert_eq!(board.history().len(), 1);
    assert_eq!(board.state(), InteractionState::Idle);
    let scene = board.renderer();
    assert!(scene.drag().is_none());
    assert!(!scene.is_hidden(sq("e2")));
    assert!(scene.animations().is_empty());
}

#[test]
fn small_moves_stay_below_threshold() {
    let mut board = board_with("default", |config| {
        config.visual.drag_square_circle = true;
    });
    let down = event_at(&board, "e2", Buttons::PRIMARY);
    board.pointer_down(&down);
    board.pointer_move(&PointerEvent::new(down.x + 9.0, down.y - 9.0, Buttons::PRIMARY));
    assert_eq!(board.renderer().drag().and_then(|proxy| proxy.pointer), None);
    board.pointer_move(&PointerEvent::new(down.x, down.y - 10.0, Buttons::PRIMARY));
    assert!(board.renderer().drag().and_then(|proxy| proxy.pointer).is_some());
    assert_eq!(board.renderer().drag_target(), Some(sq("e2")));
    let over = event_at(&board, "e3", Buttons::PRIMARY);
    board.pointer_move(&over);
    assert_eq!(board.renderer().drag_target(), Some(sq("e3")));
}

#[test]
fn drop_on_origin_keeps_selection_until_second_release() {
    let mut board = board_at("default");
    drag(&mut board, "e2", "e2");
    assert_eq!(board.selected(), Some(sq("e2")));
    drag(&mut board, "e2", "e2");
    assert_eq!(board.selected(), None);
}

#[test]
fn drop_on_illegal_square_deselects() {
    let mut board = board_at("default");
    drag(&mut board, "e2", "e5");
    assert_eq!(board.selected(), None);
    assert!(board.history().is_empty());
    assert_eq!(board.renderer().piece_at(sq("e2")), Some(Piece::new(PieceKind::Pawn, Color::White)));

    let mut sticky = board_with("default", |config| {
        config.interactivity.deselect_on_empty_drop = false;
    });
    drag(&mut sticky, "e2", "e5");
    assert_eq!(sticky.selected(), Some(sq("e2")));
}

#[test]
fn enemy_drag_needs_selection_permission() {
    let mut board = board_with("default", |config| {
        config.interactivity.drag_enemy_pieces = true;
        config.interactivity.select_enemy_pieces = false;
    });
    let down = event_at(&board, "e7", Buttons::PRIMARY);
    board.pointer_down(&down);
    assert_eq!(board.state(), InteractionState::Idle);

    let mut board = board_with("default", |config| {
        config.interactivity.drag_enemy_pieces = true;
    });
    let down = event_at(&board, "e7", Buttons::PRIMARY);
    board.pointer_down(&down);
    assert!(matches!(board.state(), InteractionState::Dragging(_)));
}

#[test]
fn both_buttons_cancel_drag_and_swallow_release() {
    let mut board = board_at("default");
    let down = event_at(&board, "e2", Buttons::PRIMARY);
    board.pointer_down(&down);
    board.pointer_move(&PointerEvent::new(down.x + 30.0, down.y, Buttons::PRIMARY));
    board.pointer_move(&PointerEvent::new(down.x + 30.0, down.y, Buttons::BOTH));
    assert!(board.renderer().drag().is_none());
    assert_eq!(board.state(), InteractionState::Selected(sq("e2")));

    // without the swallow this release would deselect
    board.pointer_up(&PointerEvent::new(down.x + 30.0, down.y, Buttons::NONE));
    assert_eq!(board.selected(), Some(sq("e2")));
    assert!(board.history().is_empty());
}

#[test]
fn pointer_source_follows_drag() {
    #[derive(Clone, Default)]
    struct Counting(Rc<Cell<i32>>, Rc<Cell<u32>>);

    impl PointerSource for Counting {
        fn subscribe(&mut self) {
            self.0.set(self.0.get() + 1);
            self.1.set(self.1.get() + 1);
        }

        fn unsubscribe(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    let source = Counting::default();
    let mut board = board_at("default").with_pointer_source(source.clone());
    drag(&mut board, "g1", "f3");
    drag(&mut board, "e7", "e5");
    assert_eq!(source.0.get(), 0, "every subscription is released");
    assert_eq!(source.1.get(), 2);
    assert_eq!(board.history().len(), 2);
}

#[test]
fn keyboard_navigation() {
    let mut board = board_at("default");
    for (from, to) in [("e2", "e4"), ("e7", "e5"), ("g1", "f3")] {
        board.play_move(sq(from), sq(to), None).unwrap();
    }
    let end = board.position();

    board.key_down(Key::ArrowLeft);
    assert_eq!(board.history().current_index(), Some(1));
    assert_eq!(board.renderer().last_move(), Some((sq("e7"), sq("e5"))));
    board.key_down(Key::ArrowUp);
    assert_eq!(board.history().current_index(), None);
    assert_eq!(board.renderer().last_move(), None);
    assert_eq!(board.position(), board.rules().initial_position());
    board.key_down(Key::ArrowRight);
    assert_eq!(board.history().current_index(), Some(0));
    board.key_down(Key::ArrowDown);
    assert_eq!(board.history().current_index(), Some(2));
    assert_eq!(board.position(), end);
    board.key_down(Key::ArrowRight);
    board.key_down(Key::Other);
    assert_eq!(board.history().current_index(), Some(2));

    let mut quiet = board_with("default", |config| {
        config.interactivity.keyboard_navigation = false;
    });
    quiet.play_move(sq("e2"), sq("e4"), None).unwrap();
    quiet.key_down(Key::ArrowLeft);
    assert_eq!(quiet.history().current_index(), Some(0));
}

#[test]
fn keyboard_closes_pending_promotion() {
    let mut board = board_at("8/4P3/8/8/8/8/k7/7K w - - 0 1");
    board.play_move(sq("h1"), sq("g1"), None).unwrap();
    board.play_move(sq("a2"), sq("a3"), None).unwrap();
    click_move(&mut board, "e7", "e8");
    assert!(matches!(board.state(), InteractionState::PromotionPending(_)));
    board.key_down(Key::ArrowLeft);
    assert!(!matches!(board.state(), InteractionState::PromotionPending(_)));
    assert!(!board.renderer().is_hidden(sq("e7")));
    assert_eq!(board.history().current_index(), Some(0));
    assert!(board.renderer().promotion_choices().is_empty());
}

#[test]
fn replaying_an_undone_move_keeps_the_branch() {
    let log: Log = Rc::default();
    let mut board = board_at("default").with_handlers(logging_handlers(&log));
    board.play_move(sq("e2"), sq("e4"), None).unwrap();
    board.play_move(sq("e7"), sq("e5"), None).unwrap();
    board.undo();
    board.undo();
    click_move(&mut board, "e2", "e4");
    assert_eq!(board.history().len(), 2);
    assert_eq!(board.history().current_index(), Some(0));
    assert_eq!(log.borrow().iter().filter(|line| line.starts_with("end ")).count(), 3);

    click_move(&mut board, "c7", "c5");
    assert_eq!(board.history().len(), 2);
    assert_eq!(board.history().moves()[1].san, "c5");
}

#[test]
fn flipped_orientation_maps_pointer() {
    let mut board = board_with("default", |config| {
        config.orientation = Orientation::Black;
    });
    board.pointer_down(&PointerEvent::new(50.0, 50.0, Buttons::PRIMARY));
    board.pointer_up(&PointerEvent::new(50.0, 50.0, Buttons::NONE));
    assert_eq!(board.selected(), Some(sq("h1")));

    board.flip_board();
    assert_eq!(board.orientation(), Orientation::White);
    assert_eq!(board.renderer().orientation(), Orientation::White);
    board.pointer_down(&PointerEvent::new(50.0, 750.0, Buttons::PRIMARY));
    board.pointer_up(&PointerEvent::new(50.0, 750.0, Buttons::NONE));
    assert_eq!(board.selected(), Some(sq("a1")));
}

#[test]
fn pointer_outside_board_is_ignored() {
    let log: Log = Rc::default();
    let mut board = board_at("default").with_handlers(logging_handlers(&log));
    click(&mut board, "e2");
    board.pointer_down(&PointerEvent::new(-5.0, 400.0, Buttons::PRIMARY));
    board.pointer_up(&PointerEvent::new(-5.0, 400.0, Buttons::NONE));
    assert_eq!(*log.borrow(), vec!["down e2"]);
    assert_eq!(board.selected(), Some(sq("e2")));
}

#[test]
fn invalid_position_leaves_board_untouched() {
    let mut board = board_at("default");
    board.play_move(sq("e2"), sq("e4"), None).unwrap();
    let before = board.position();
    assert!(matches!(
        board.set_position("not a position"),
        Err(BoardError::InvalidPosition { .. })
    ));
    assert_eq!(board.position(), before);
    assert_eq!(board.history().len(), 1);
    assert_eq!(board.renderer().last_move(), Some((sq("e2"), sq("e4"))));

    board.set_position("start").unwrap();
    assert!(board.history().is_empty());
    assert_eq!(board.renderer().last_move(), None);
    assert_eq!(board.renderer().piece_at(sq("e4")), None);
}

#[test]
fn play_move_rejects_illegal_moves() {
    let mut board = board_at("default");
    assert!(matches!(
        board.play_move(sq("e2"), sq("e5"), None),
        Err(BoardError::IllegalMove { .. })
    ));
    assert!(board.history().is_empty());
}

#[test]
fn arrow_geometry() {
    assert!(arrow_polygon(sq("e4"), sq("e4"), Orientation::White).is_none());
    let points = arrow_polygon(sq("e2"), sq("e4"), Orientation::White).unwrap();
    // e2 centre (4.5, 6.5), e4 centre (4.5, 4.5), pointing up
    let close = |a: f32, b: f32| (a - b).abs() < 1e-5;
    assert!(close(points[3].0, 4.5) && close(points[3].1, 4.5));
    assert!(close(points[0].1, 6.15) && close(points[1].1, 4.85));
    let tip_width = (points[2].0 - points[4].0).abs();
    assert!(close(tip_width, 0.5));
    let flipped = arrow_polygon(sq("e2"), sq("e4"), Orientation::Black).unwrap();
    assert!(close(flipped[3].0, 3.5) && close(flipped[3].1, 3.5));
}
