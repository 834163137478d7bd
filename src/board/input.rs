/// Pointer buttons held during an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buttons {
    pub primary: bool,
    pub secondary: bool,
}

impl Buttons {
    pub const NONE: Buttons = Buttons {
        primary: false,
        secondary: false,
    };
    pub const PRIMARY: Buttons = Buttons {
        primary: true,
        secondary: false,
    };
    pub const SECONDARY: Buttons = Buttons {
        primary: false,
        secondary: true,
    };
    pub const BOTH: Buttons = Buttons {
        primary: true,
        secondary: true,
    };

    /// From a DOM-style bitmask: bit 0 primary, bit 1 secondary.
    pub fn from_bits(bits: u8) -> Buttons {
        Buttons {
            primary: bits & 0x01 != 0,
            secondary: bits & 0x02 != 0,
        }
    }

    pub fn is_secondary_only(self) -> bool {
        self == Buttons::SECONDARY
    }

    pub fn is_both(self) -> bool {
        self.primary && self.secondary
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };
    pub const ALT: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

/// Pointer event in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub buttons: Buttons,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, buttons: Buttons) -> Self {
        PointerEvent {
            x,
            y,
            buttons,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Other,
}

/// Capture of pointer movement outside the board for the length of a drag.
///
/// The board subscribes when a drag begins and unsubscribes when it ends.
pub trait PointerSource {
    fn subscribe(&mut self) {}
    fn unsubscribe(&mut self) {}
}

/// Source for hosts that already deliver every pointer event to the board.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCapture;

impl PointerSource for NoCapture {}
