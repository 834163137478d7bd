use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::definitions::Square;

/// Modifier category a right-click annotation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Plain,
    Shift,
    Ctrl,
    Alt,
    /// Caller-managed, never toggled or bulk-cleared.
    Custom,
}

impl Variant {
    pub const STANDARD: [Variant; 4] = [Variant::Plain, Variant::Shift, Variant::Ctrl, Variant::Alt];

    /// Shift wins over ctrl, ctrl over alt.
    pub fn from_modifiers(shift: bool, ctrl: bool, alt: bool) -> Variant {
        if shift {
            Variant::Shift
        } else if ctrl {
            Variant::Ctrl
        } else if alt {
            Variant::Alt
        } else {
            Variant::Plain
        }
    }

    pub fn is_custom(self) -> bool {
        self == Variant::Custom
    }
}

/// Fill colour and opacity, passed through to the renderer untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paint {
    pub color: String,
    pub opacity: f32,
}

impl Default for Paint {
    fn default() -> Self {
        Paint::new("#000000", 1.0)
    }
}

impl Paint {
    pub fn new(color: impl Into<String>, opacity: f32) -> Self {
        Paint {
            color: color.into(),
            opacity,
        }
    }
}

/// Structured identity of one overlay on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnnotationKey {
    Mark { square: Square, variant: Variant },
    Arrow { from: Square, to: Square, variant: Variant },
}

impl AnnotationKey {
    pub fn variant(&self) -> Variant {
        match self {
            AnnotationKey::Mark { variant, .. } | AnnotationKey::Arrow { variant, .. } => *variant,
        }
    }
}

/// What a toggle did, in terms of overlays to add or remove.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    Added(AnnotationKey),
    Removed(AnnotationKey),
    Retagged {
        from: AnnotationKey,
        to: AnnotationKey,
    },
    /// Custom annotations only change through the explicit add and remove calls.
    Ignored,
}

#[derive(Clone, Debug, PartialEq)]
struct Annotation {
    variant: Variant,
    paint: Option<Paint>,
}

/// Anchor of an annotation: a square for marks, an ordered pair for arrows.
trait Anchor: Copy + Eq + std::hash::Hash {
    fn key(self, variant: Variant) -> AnnotationKey;
}

impl Anchor for Square {
    fn key(self, variant: Variant) -> AnnotationKey {
        AnnotationKey::Mark {
            square: self,
            variant,
        }
    }
}

impl Anchor for (Square, Square) {
    fn key(self, variant: Variant) -> AnnotationKey {
        AnnotationKey::Arrow {
            from: self.0,
            to: self.1,
            variant,
        }
    }
}

/// One kind of overlay (marks or arrows), standard variants and custom ones apart.
#[derive(Clone, Debug)]
struct Layer<A: Anchor> {
    standard: HashMap<A, Annotation>,
    custom: HashMap<A, Option<Paint>>,
}

impl<A: Anchor> Default for Layer<A> {
    fn default() -> Self {
        Layer {
            standard: HashMap::new(),
            custom: HashMap::new(),
        }
    }
}

impl<A: Anchor> Layer<A> {
    fn toggle(&mut self, anchor: A, variant: Variant, paint: Option<Paint>) -> Toggle {
        if variant.is_custom() {
            return Toggle::Ignored;
        }
        match self.standard.get_mut(&anchor) {
            Some(existing) if existing.variant == variant => {
                self.standard.remove(&anchor);
                Toggle::Removed(anchor.key(variant))
            }
            Some(existing) => {
                let previous = existing.variant;
                existing.variant = variant;
                existing.paint = paint;
                Toggle::Retagged {
                    from: anchor.key(previous),
                    to: anchor.key(variant),
                }
            }
            None => {
                self.standard.insert(anchor, Annotation { variant, paint });
                Toggle::Added(anchor.key(variant))
            }
        }
    }

    fn variant_at(&self, anchor: A) -> Option<Variant> {
        self.standard.get(&anchor).map(|annotation| annotation.variant)
    }

    fn clear_standard(&mut self) -> Vec<AnnotationKey> {
        self.standard
            .drain()
            .map(|(anchor, annotation)| anchor.key(annotation.variant))
            .collect()
    }

    fn clear_custom(&mut self) -> Vec<AnnotationKey> {
        self.custom
            .drain()
            .map(|(anchor, _)| anchor.key(Variant::Custom))
            .collect()
    }

    fn iter(&self) -> impl Iterator<Item = (AnnotationKey, Option<&Paint>)> + '_ {
        let standard = self
            .standard
            .iter()
            .map(|(anchor, annotation)| (anchor.key(annotation.variant), annotation.paint.as_ref()));
        let custom = self
            .custom
            .iter()
            .map(|(anchor, paint)| (anchor.key(Variant::Custom), paint.as_ref()));
        standard.chain(custom)
    }
}

/// Right-click marks and arrows plus caller-owned custom ones.
///
/// At most one standard mark lives on a square and at most one standard arrow
/// on an ordered square pair. Custom annotations are keyed independently.
#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    marks: Layer<Square>,
    arrows: Layer<(Square, Square)>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        AnnotationStore::default()
    }

    pub fn toggle_mark(&mut self, square: Square, variant: Variant, paint: Option<Paint>) -> Toggle {
        let toggle = self.marks.toggle(square, variant, paint);
        debug!("Mark toggle at {square}: {toggle:?}");
        toggle
    }

    pub fn toggle_arrow(
        &mut self,
        from: Square,
        to: Square,
        variant: Variant,
        paint: Option<Paint>,
    ) -> Toggle {
        let toggle = self.arrows.toggle((from, to), variant, paint);
        debug!("Arrow toggle {from}->{to}: {toggle:?}");
        toggle
    }

    /// Standard variant of the mark on `square`, if any.
    pub fn mark_at(&self, square: Square) -> Option<Variant> {
        self.marks.variant_at(square)
    }

    pub fn arrow_at(&self, from: Square, to: Square) -> Option<Variant> {
        self.arrows.variant_at((from, to))
    }

    pub fn has_custom_mark(&self, square: Square) -> bool {
        self.marks.custom.contains_key(&square)
    }

    pub fn has_custom_arrow(&self, from: Square, to: Square) -> bool {
        self.arrows.custom.contains_key(&(from, to))
    }

    /// Removes every plain/shift/ctrl/alt mark and arrow, keeping custom ones.
    pub fn clear_standard(&mut self) -> Vec<AnnotationKey> {
        let mut removed = self.marks.clear_standard();
        removed.extend(self.arrows.clear_standard());
        removed
    }

    /// Adds (or repaints) a custom mark.
    pub fn add_custom_mark(&mut self, square: Square, paint: Option<Paint>) -> AnnotationKey {
        self.marks.custom.insert(square, paint);
        square.key(Variant::Custom)
    }

    pub fn add_custom_arrow(&mut self, from: Square, to: Square, paint: Option<Paint>) -> AnnotationKey {
        self.arrows.custom.insert((from, to), paint);
        (from, to).key(Variant::Custom)
    }

    pub fn remove_custom_mark(&mut self, square: Square) -> Option<AnnotationKey> {
        self.marks
            .custom
            .remove(&square)
            .map(|_| square.key(Variant::Custom))
    }

    pub fn remove_custom_arrow(&mut self, from: Square, to: Square) -> Option<AnnotationKey> {
        self.arrows
            .custom
            .remove(&(from, to))
            .map(|_| (from, to).key(Variant::Custom))
    }

    pub fn clear_custom_marks(&mut self) -> Vec<AnnotationKey> {
        self.marks.clear_custom()
    }

    pub fn clear_custom_arrows(&mut self) -> Vec<AnnotationKey> {
        self.arrows.clear_custom()
    }

    /// Every annotation with its paint override, marks first.
    pub fn iter(&self) -> impl Iterator<Item = (AnnotationKey, Option<&Paint>)> + '_ {
        self.marks.iter().chain(self.arrows.iter())
    }

    pub fn len(&self) -> usize {
        self.marks.standard.len()
            + self.marks.custom.len()
            + self.arrows.standard.len()
            + self.arrows.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
