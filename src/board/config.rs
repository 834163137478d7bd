use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::annotations::{AnnotationKey, Paint, Variant};
use crate::core::definitions::{Orientation, PlayerColor};
use crate::core::engine::DEFAULT_POSITION;
use crate::core::error::BoardError;

/// Everything a board is constructed with, apart from the engine and renderer.
///
/// A partial JSON document is merged over the defaults key by key, down to
/// single paint fields: `{"style":{"lastMove":{"from":{"color":"red"}}}}`
/// keeps the default opacity of `from` and the whole of `to`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// FEN, or `"default"` for the standard starting position.
    pub position: String,
    pub player_color: PlayerColor,
    pub orientation: Orientation,
    pub interactivity: Interactivity,
    pub visual: Visual,
    pub style: Style,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            position: DEFAULT_POSITION.to_string(),
            player_color: PlayerColor::default(),
            orientation: Orientation::default(),
            interactivity: Interactivity::default(),
            visual: Visual::default(),
            style: Style::default(),
        }
    }
}

impl BoardConfig {
    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let patch: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(BoardConfig::default())?;
        merge(&mut merged, patch);
        Ok(serde_json::from_value(merged)?)
    }

    pub fn to_json(&self) -> Result<String, BoardError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Older key spellings, folded onto the serialized names before merging.
const KEY_ALIASES: [(&str, &str); 4] = [
    ("color1", "dark"),
    ("color2", "light"),
    ("opacity_original", "opacityOriginal"),
    ("opacity_clone", "opacityClone"),
];

fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                let key = match KEY_ALIASES.iter().find(|(alias, _)| *alias == key) {
                    Some((_, canonical)) => canonical.to_string(),
                    None => key,
                };
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Interactivity {
    /// Master switch for pointer and keyboard interpretation.
    pub enabled: bool,
    pub drag: bool,
    pub drag_own_pieces: bool,
    pub drag_enemy_pieces: bool,
    pub deselect_on_empty_drop: bool,
    pub deselect_on_selected_square_drop: bool,
    pub deselect_on_empty_click: bool,
    pub select_enemy_pieces: bool,
    pub keep_selected_on_click: bool,
    pub marks: bool,
    pub arrows: bool,
    pub keyboard_navigation: bool,
}

impl Default for Interactivity {
    fn default() -> Self {
        Interactivity {
            enabled: true,
            drag: true,
            drag_own_pieces: true,
            drag_enemy_pieces: false,
            deselect_on_empty_drop: true,
            deselect_on_selected_square_drop: false,
            deselect_on_empty_click: true,
            select_enemy_pieces: true,
            keep_selected_on_click: false,
            marks: true,
            arrows: true,
            keyboard_navigation: true,
        }
    }
}

impl Interactivity {
    /// Drag permission when a drag starts on a piece.
    ///
    /// Enemy pieces additionally need `select_enemy_pieces`, unlike on drop.
    pub fn can_start_drag(&self, own: bool) -> bool {
        self.drag
            && if own {
                self.drag_own_pieces
            } else {
                self.drag_enemy_pieces && self.select_enemy_pieces
            }
    }

    /// Drag permission checked when the pointer is released.
    pub fn can_drop(&self, own: bool) -> bool {
        self.drag
            && if own {
                self.drag_own_pieces
            } else {
                self.drag_enemy_pieces
            }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Visual {
    pub show_legal_moves: bool,
    pub highlight_selected_piece_square_own: bool,
    pub highlight_selected_piece_square_enemy: bool,
    pub highlight_last_move: bool,
    pub drag_square_circle: bool,
}

impl Default for Visual {
    fn default() -> Self {
        Visual {
            show_legal_moves: false,
            highlight_selected_piece_square_own: true,
            highlight_selected_piece_square_enemy: true,
            highlight_last_move: true,
            drag_square_circle: false,
        }
    }
}

/// Colours and sizes handed to the renderer as they are.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    pub board: BoardColors,
    pub drag: DragStyle,
    pub legal_moves: LegalMoveStyle,
    pub selected_piece_square: OwnEnemy,
    pub last_move: FromTo,
    pub check: Paint,
    pub marks: VariantPaints,
    pub arrows: VariantPaints,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            board: BoardColors::default(),
            drag: DragStyle::default(),
            legal_moves: LegalMoveStyle::default(),
            selected_piece_square: OwnEnemy::default(),
            last_move: FromTo::default(),
            check: Paint::new("#ff0000ab", 1.0),
            marks: VariantPaints::marks(),
            arrows: VariantPaints::arrows(),
        }
    }
}

impl Style {
    /// Default paint for an annotation that carries no override.
    pub fn annotation_paint(&self, key: &AnnotationKey) -> &Paint {
        match key {
            AnnotationKey::Mark { variant, .. } => self.marks.get(*variant),
            AnnotationKey::Arrow { variant, .. } => self.arrows.get(*variant),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardColors {
    #[serde(alias = "color1")]
    pub dark: String,
    #[serde(alias = "color2")]
    pub light: String,
}

impl Default for BoardColors {
    fn default() -> Self {
        BoardColors {
            dark: "#739552".to_string(),
            light: "#EBECD0".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragStyle {
    /// Opacity of the piece left behind on its square while dragging.
    #[serde(alias = "opacity_original")]
    pub opacity_original: f32,
    /// Opacity of the proxy following the pointer.
    #[serde(alias = "opacity_clone")]
    pub opacity_clone: f32,
}

impl Default for DragStyle {
    fn default() -> Self {
        DragStyle {
            opacity_original: 0.0,
            opacity_clone: 1.0,
        }
    }
}

/// Filled circle, radius in square units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Circle {
    pub radius: f32,
    pub color: String,
}

impl Default for Circle {
    fn default() -> Self {
        Circle {
            radius: 0.17,
            color: "#00000024".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalMoveStyle {
    pub empty: Circle,
    pub capture: Circle,
}

impl Default for LegalMoveStyle {
    fn default() -> Self {
        LegalMoveStyle {
            empty: Circle::default(),
            capture: Circle {
                radius: 0.45,
                ..Circle::default()
            },
        }
    }
}

fn highlight() -> Paint {
    Paint::new("rgb(255, 255, 51)", 0.5)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnEnemy {
    pub own: Paint,
    pub enemy: Paint,
}

impl Default for OwnEnemy {
    fn default() -> Self {
        OwnEnemy {
            own: highlight(),
            enemy: highlight(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FromTo {
    pub from: Paint,
    pub to: Paint,
}

impl Default for FromTo {
    fn default() -> Self {
        FromTo {
            from: highlight(),
            to: highlight(),
        }
    }
}

/// One paint per modifier variant. Defaults to the mark palette.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantPaints {
    pub plain: Paint,
    pub shift: Paint,
    pub ctrl: Paint,
    pub alt: Paint,
    pub custom: Paint,
}

impl Default for VariantPaints {
    fn default() -> Self {
        VariantPaints::marks()
    }
}

impl VariantPaints {
    pub fn marks() -> Self {
        VariantPaints {
            plain: Paint::new("rgb(235, 97, 80)", 0.8),
            shift: Paint::new("rgb(172, 206, 89)", 0.8),
            ctrl: Paint::new("rgb(255, 170, 0)", 0.8),
            alt: Paint::new("rgb(82, 176, 220)", 0.8),
            custom: Paint::new("rgb(235, 97, 80)", 0.8),
        }
    }

    pub fn arrows() -> Self {
        VariantPaints {
            plain: Paint::new("rgba(255, 170, 0, 0.8)", 0.8),
            shift: Paint::new("rgba(159, 207, 63, 0.8)", 0.8),
            ctrl: Paint::new("rgba(248, 85, 63, 0.8)", 0.8),
            alt: Paint::new("rgba(72, 193, 249, 0.8)", 0.8),
            custom: Paint::new("rgba(255, 170, 0, 0.8)", 0.8),
        }
    }

    pub fn get(&self, variant: Variant) -> &Paint {
        match variant {
            Variant::Plain => &self.plain,
            Variant::Shift => &self.shift,
            Variant::Ctrl => &self.ctrl,
            Variant::Alt => &self.alt,
            Variant::Custom => &self.custom,
        }
    }
}
