//! The flow palette.

use std::fmt::{Display, Formatter};

use strum::VariantArray;

/// The fixed palette of flow colors.
///
/// A color is identified by its variant alone; [`rgb`](Color::rgb) is only a display hint for renderers.
/// Every color has a one letter native code, which is also the name of its variant.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray)]
#[allow(missing_docs)]
pub enum Color {
    R,
    O,
    S,
    G,
    B,
    C,
    Q,
    P,
    M,
    W,
    J,
    T,
    E,
    Z,
    I,
    X,
    K,
    Y,
    D,
}

impl Color {
    /// The native code of this color as it appears in level encodings.
    pub const fn code(&self) -> char {
        match self {
            Self::R => 'R',
            Self::O => 'O',
            Self::S => 'S',
            Self::G => 'G',
            Self::B => 'B',
            Self::C => 'C',
            Self::Q => 'Q',
            Self::P => 'P',
            Self::M => 'M',
            Self::W => 'W',
            Self::J => 'J',
            Self::T => 'T',
            Self::E => 'E',
            Self::Z => 'Z',
            Self::I => 'I',
            Self::X => 'X',
            Self::K => 'K',
            Self::Y => 'Y',
            Self::D => 'D',
        }
    }

    /// The color whose native code is `code`, if any.
    pub fn from_code(code: char) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|color| color.code() == code)
    }

    /// Red, green and blue channels for drawing this color.
    pub const fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::R => (240, 52, 52),
            Self::O => (249, 105, 14),
            Self::S => (150, 40, 27),
            Self::G => (0, 177, 106),
            Self::B => (31, 58, 147),
            Self::C => (34, 167, 240),
            Self::Q => (255, 255, 126),
            Self::P => (103, 65, 114),
            Self::M => (191, 85, 236),
            Self::W => (242, 241, 239),
            Self::J => (29, 209, 161),
            Self::T => (1, 163, 164),
            Self::E => (255, 159, 243),
            Self::Z => (131, 149, 167),
            Self::I => (24, 44, 97),
            Self::X => (163, 203, 56),
            Self::K => (0, 98, 102),
            Self::Y => (241, 196, 15),
            Self::D => (253, 150, 68),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
