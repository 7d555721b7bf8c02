//! User-adjustable foreground colors.

/// The seven foreground colors selectable with SGR codes 31 to 37.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiColor {
    /// SGR 31.
    Red,
    /// SGR 32.
    Green,
    /// SGR 33.
    Yellow,
    /// SGR 34.
    Blue,
    /// SGR 35.
    Magenta,
    /// SGR 36.
    Cyan,
    /// SGR 37.
    White,
}

impl AnsiColor {
    /// SGR foreground code.
    pub fn sgr(self) -> u8 {
        match self {
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
        }
    }

    /// The previous color, wrapping from red back to white.
    pub fn cycle(self) -> Self {
        match self {
            Self::Red => Self::White,
            Self::Green => Self::Red,
            Self::Yellow => Self::Green,
            Self::Blue => Self::Yellow,
            Self::Magenta => Self::Blue,
            Self::Cyan => Self::Magenta,
            Self::White => Self::Cyan,
        }
    }
}

/// Which of the three adjustable colors a shortcut targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSlot {
    /// Borders and chrome.
    Window,
    /// Own messages.
    Own,
    /// Messages from other users, and the roster.
    Other,
}

/// The session's colors. Errors always render in [`Palette::ALERT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Borders and chrome.
    pub window: AnsiColor,
    /// Own messages.
    pub own: AnsiColor,
    /// Messages from other users, and the roster.
    pub other: AnsiColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self { window: AnsiColor::Magenta, own: AnsiColor::Cyan, other: AnsiColor::Yellow }
    }
}

impl Palette {
    /// Fixed color for error rows.
    pub const ALERT: AnsiColor = AnsiColor::Red;

    /// Color in a slot.
    pub fn get(&self, slot: PaletteSlot) -> AnsiColor {
        match slot {
            PaletteSlot::Window => self.window,
            PaletteSlot::Own => self.own,
            PaletteSlot::Other => self.other,
        }
    }

    /// Step one slot to its previous color.
    pub fn cycle(&mut self, slot: PaletteSlot) {
        let color = match slot {
            PaletteSlot::Window => &mut self.window,
            PaletteSlot::Own => &mut self.own,
            PaletteSlot::Other => &mut self.other,
        };
        *color = color.cycle();
    }
}
