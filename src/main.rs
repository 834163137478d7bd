use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use chess_board::board::render::{arrow_polygon, Scene};
use chess_board::core::utils::square_to_grid;
use chess_board::{
    AnnotationKey, BoardConfig, BoardGeometry, Buttons, ChessBoard, Color, Handlers, Key, Modifiers, Move,
    Orientation, Paint, Piece, PieceKind, PointerEvent, Square,
};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};

const BOARD_SIZE: f32 = 480.0;

struct App {
    board: ChessBoard,
    held: Buttons,
    status: Rc<RefCell<String>>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).
    let config = match std::env::args().nth(1) {
        Some(path) => BoardConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => BoardConfig::default(),
    };
    let status = Rc::new(RefCell::new(String::new()));
    let board = ChessBoard::with_config(config)?.with_handlers(status_handlers(&status));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([BOARD_SIZE + 220.0, BOARD_SIZE + 20.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Chess board",
        options,
        Box::new(|_cc| {
            Box::new(App {
                board,
                held: Buttons::NONE,
                status,
            })
        }),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}

fn announce(status: &Rc<RefCell<String>>, label: &'static str) -> impl FnMut(&Move) + 'static {
    let status = Rc::clone(status);
    move |played: &Move| *status.borrow_mut() = format!("{label} after {}", played.san)
}

fn status_handlers(status: &Rc<RefCell<String>>) -> Handlers {
    let cleared = Rc::clone(status);
    Handlers::new()
        .on_move_end(move |played, fen| {
            log::debug!("Played {} -> {fen}", played.san);
            cleared.borrow_mut().clear();
        })
        .on_checkmate(announce(status, "Checkmate"))
        .on_stalemate(announce(status, "Stalemate"))
        .on_threefold_repetition(announce(status, "Threefold repetition"))
        .on_insufficient_material(announce(status, "Insufficient material"))
        .on_draw(announce(status, "Draw"))
        .on_check(announce(status, "Check"))
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::right("controls").show(ctx, |ui| self.control_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(Vec2::splat(BOARD_SIZE), Sense::click_and_drag());
            let rect = response.rect;
            self.board
                .set_geometry(BoardGeometry::new(rect.left(), rect.top(), rect.width(), rect.height()));
            self.handle_input(ctx);
            let now = Instant::now();
            self.board.renderer_mut().tick(now);
            paint_scene(&painter, rect, self.board.renderer(), now);
        });
        if self.board.renderer().is_animating() {
            ctx.request_repaint();
        }
    }
}

impl App {
    fn control_panel(&mut self, ui: &mut egui::Ui) {
        ui.vertical(|ui| {
            ui.heading("Chess board");
            let turn = match self.board.rules().turn() {
                Color::White => "White",
                Color::Black => "Black",
            };
            ui.label(format!("To move: {turn}"));
            ui.label(orientation_label(self.board.orientation()));
            if let Some(last) = self.board.last_move() {
                ui.label(format!("Last move: {}", last.san));
            }
            let status = self.status.borrow().clone();
            if !status.is_empty() {
                ui.label(status);
            }
            ui.horizontal(|ui| {
                if ui.button("|<").clicked() {
                    self.board.go_to_start();
                }
                if ui.button("<").clicked() {
                    self.board.undo();
                }
                if ui.button(">").clicked() {
                    self.board.redo();
                }
                if ui.button(">|").clicked() {
                    self.board.go_to_end();
                }
            });
            if ui.button("Flip board").clicked() {
                self.board.flip_board();
            }
            if ui.button("Restart").clicked() {
                if let Err(err) = self.board.set_position("default") {
                    log::error!("{err}");
                }
                self.status.borrow_mut().clear();
            }
            ui.separator();
            ui.label(self.board.position());
        });
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|input| input.events.clone());
        for event in events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    modifiers,
                    ..
                } => {
                    match button {
                        egui::PointerButton::Primary => self.held.primary = pressed,
                        egui::PointerButton::Secondary => self.held.secondary = pressed,
                        _ => continue,
                    }
                    let event = PointerEvent::new(pos.x, pos.y, self.held).with_modifiers(Modifiers {
                        shift: modifiers.shift,
                        ctrl: modifiers.ctrl,
                        alt: modifiers.alt,
                    });
                    if pressed {
                        self.board.pointer_down(&event);
                    } else {
                        self.board.pointer_up(&event);
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    self.board.pointer_move(&PointerEvent::new(pos.x, pos.y, self.held));
                }
                egui::Event::Key {
                    key, pressed: true, ..
                } => {
                    let key = match key {
                        egui::Key::ArrowLeft => Key::ArrowLeft,
                        egui::Key::ArrowRight => Key::ArrowRight,
                        egui::Key::ArrowUp => Key::ArrowUp,
                        egui::Key::ArrowDown => Key::ArrowDown,
                        _ => Key::Other,
                    };
                    self.board.key_down(key);
                }
                _ => {}
            }
        }
    }
}

fn paint_scene(painter: &egui::Painter, rect: Rect, scene: &Scene, now: Instant) {
    let cell = rect.width() / 8.0;
    let orientation = scene.orientation();
    let style = scene.style();
    let square_rect = |square: Square| {
        let (x, y) = square_to_grid(square, orientation);
        Rect::from_min_size(
            rect.min + Vec2::new(x as f32 * cell, y as f32 * cell),
            Vec2::splat(cell),
        )
    };
    let grid_pos = |(x, y): (f32, f32)| rect.min + Vec2::new(x * cell, y * cell);

    for square in Square::all() {
        let dark = (square.file() + square.rank()) % 2 == 0;
        let color = if dark { &style.board.dark } else { &style.board.light };
        painter.rect_filled(square_rect(square), 0.0, parse_color(color, 1.0));
    }
    if let Some((from, to)) = scene.last_move() {
        painter.rect_filled(square_rect(from), 0.0, paint_color(&style.last_move.from));
        painter.rect_filled(square_rect(to), 0.0, paint_color(&style.last_move.to));
    }
    if let Some(selected) = scene.selected() {
        let paint = if selected.own {
            &style.selected_piece_square.own
        } else {
            &style.selected_piece_square.enemy
        };
        painter.rect_filled(square_rect(selected.square), 0.0, paint_color(paint));
    }
    for flash in scene.check_flashes() {
        painter.rect_filled(square_rect(flash.square), 0.0, paint_color(&style.check));
    }
    for (key, paint) in scene.annotations() {
        if let AnnotationKey::Mark { square, .. } = key {
            painter.rect_filled(square_rect(*square), 0.0, paint_color(paint));
        }
    }

    for (square, piece) in scene.pieces() {
        if scene.is_hidden(square) {
            if scene.drag().map(|proxy| proxy.origin) == Some(square) {
                let (x, y) = scene.piece_position(square, now);
                paint_piece(painter, grid_pos((x + 0.5, y + 0.5)), cell, piece, style.drag.opacity_original);
            }
            continue;
        }
        let (x, y) = scene.piece_position(square, now);
        paint_piece(painter, grid_pos((x + 0.5, y + 0.5)), cell, piece, 1.0);
    }

    for target in scene.legal_moves() {
        let circle = if target.capture {
            &style.legal_moves.capture
        } else {
            &style.legal_moves.empty
        };
        painter.circle_filled(
            square_rect(target.square).center(),
            circle.radius * cell,
            parse_color(&circle.color, 1.0),
        );
    }
    if let Some(target) = scene.drag_target() {
        painter.circle_filled(square_rect(target).center(), cell, Color32::from_black_alpha(25));
    }
    for (key, paint) in scene.annotations() {
        if let AnnotationKey::Arrow { from, to, .. } = key {
            if let Some(points) = arrow_polygon(*from, *to, orientation) {
                let points: Vec<Pos2> = points.iter().map(|&point| grid_pos(point)).collect();
                painter.add(Shape::convex_polygon(points, paint_color(paint), Stroke::NONE));
            }
        }
    }

    for (square, piece) in scene.promotion_choices() {
        painter.rect_filled(square_rect(*square), 0.0, Color32::WHITE);
        paint_piece(painter, square_rect(*square).center(), cell, *piece, 1.0);
    }
    if let Some(proxy) = scene.drag() {
        if let Some((x, y)) = proxy.pointer {
            paint_piece(painter, Pos2::new(x, y), cell, proxy.piece, style.drag.opacity_clone);
        }
    }
}

fn paint_piece(painter: &egui::Painter, center: Pos2, cell: f32, piece: Piece, opacity: f32) {
    if opacity <= 0.0 {
        return;
    }
    let glyph = match piece.kind {
        PieceKind::King => "\u{265A}",
        PieceKind::Queen => "\u{265B}",
        PieceKind::Rook => "\u{265C}",
        PieceKind::Bishop => "\u{265D}",
        PieceKind::Knight => "\u{265E}",
        PieceKind::Pawn => "\u{265F}",
    };
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
    let (fill, outline) = match piece.color {
        Color::White => (
            Color32::from_rgba_unmultiplied(255, 255, 255, alpha),
            Color32::from_rgba_unmultiplied(0, 0, 0, alpha),
        ),
        Color::Black => (
            Color32::from_rgba_unmultiplied(0, 0, 0, alpha),
            Color32::from_rgba_unmultiplied(255, 255, 255, alpha / 2),
        ),
    };
    let font = FontId::proportional(cell * 0.8);
    for offset in [Vec2::new(1.0, 1.0), Vec2::new(-1.0, -1.0)] {
        painter.text(center + offset, Align2::CENTER_CENTER, glyph, font.clone(), outline);
    }
    painter.text(center, Align2::CENTER_CENTER, glyph, font, fill);
}

fn paint_color(paint: &Paint) -> Color32 {
    parse_color(&paint.color, paint.opacity)
}

/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)` and `rgba(..)`; anything else is grey.
fn parse_color(color: &str, opacity: f32) -> Color32 {
    let [r, g, b, a] = parse_rgba(color.trim()).unwrap_or([128, 128, 128, 255]);
    let alpha = (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}

fn parse_rgba(color: &str) -> Option<[u8; 4]> {
    if let Some(hex) = color.strip_prefix('#') {
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return match hex.len() {
            3 => {
                let mut rgba = [255; 4];
                for (i, digit) in hex.chars().enumerate() {
                    let value = digit.to_digit(16)? as u8;
                    rgba[i] = value * 17;
                }
                Some(rgba)
            }
            6 => Some([channel(0)?, channel(2)?, channel(4)?, 255]),
            8 => Some([channel(0)?, channel(2)?, channel(4)?, channel(6)?]),
            _ => None,
        };
    }
    let inner = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let channel = |i: usize| parts.get(i)?.parse::<u8>().ok();
    let alpha = match parts.get(3) {
        Some(alpha) => (alpha.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
        None => 255,
    };
    Some([channel(0)?, channel(1)?, channel(2)?, alpha])
}

fn orientation_label(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::White => "White at the bottom",
        Orientation::Black => "Black at the bottom",
    }
}
