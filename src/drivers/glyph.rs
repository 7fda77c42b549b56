//! Seven-segment glyph encoding.
//!
//! Segment bit assignment, matching the PD0..PD6 wiring:
//! ```text
//!      A          bit 0 = A   bit 3 = D   bit 6 = G
//!    F   B        bit 1 = B   bit 4 = E
//!      G          bit 2 = C   bit 5 = F
//!    E   C
//!      D          bit = 1 means segment lit
//! ```
//! The decimal point is not part of the mask; the refresh driver owns it.

pub const SEG_A: u8 = 1 << 0;
pub const SEG_B: u8 = 1 << 1;
pub const SEG_C: u8 = 1 << 2;
pub const SEG_D: u8 = 1 << 3;
pub const SEG_E: u8 = 1 << 4;
pub const SEG_F: u8 = 1 << 5;
pub const SEG_G: u8 = 1 << 6;

/// Displayable symbol. `Dash` doubles as the error-indicator glyph and the
/// fallback for anything `from_char` does not recognize.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Glyph {
    Zero = 0,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Pico,
    Nano,
    Micro,
    A,
    B,
    C,
    D,
    E,
    F,
    Dash,
}

pub const GLYPH_COUNT: usize = 20;

static SEGMENT_TABLE: [u8; GLYPH_COUNT] = [
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,         // 0
    SEG_B | SEG_C,                                         // 1
    SEG_A | SEG_B | SEG_D | SEG_E | SEG_G,                 // 2
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_G,                 // 3
    SEG_B | SEG_C | SEG_F | SEG_G,                         // 4
    SEG_A | SEG_C | SEG_D | SEG_F | SEG_G,                 // 5
    SEG_A | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,         // 6
    SEG_A | SEG_B | SEG_C,                                 // 7
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G, // 8
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G,         // 9
    SEG_A | SEG_B | SEG_E | SEG_F | SEG_G,                 // p
    SEG_C | SEG_E | SEG_G,                                 // n
    SEG_C | SEG_D | SEG_E,                                 // u
    SEG_A | SEG_B | SEG_C | SEG_E | SEG_F | SEG_G,         // A
    SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,                 // b
    SEG_D | SEG_E | SEG_G,                                 // c
    SEG_B | SEG_C | SEG_D | SEG_E | SEG_G,                 // d
    SEG_A | SEG_D | SEG_E | SEG_F | SEG_G,                 // E
    SEG_A | SEG_E | SEG_F | SEG_G,                         // F
    SEG_G,                                                 // -
];

impl Glyph {
    /// Segment mask for this glyph. Total; every variant has a fixed entry.
    #[inline]
    pub fn encode(self) -> u8 {
        SEGMENT_TABLE[self as usize]
    }

    /// Glyph for a decimal digit; anything above 9 renders as `Dash`.
    pub fn digit(value: u8) -> Self {
        match value {
            0 => Glyph::Zero,
            1 => Glyph::One,
            2 => Glyph::Two,
            3 => Glyph::Three,
            4 => Glyph::Four,
            5 => Glyph::Five,
            6 => Glyph::Six,
            7 => Glyph::Seven,
            8 => Glyph::Eight,
            9 => Glyph::Nine,
            _ => Glyph::Dash,
        }
    }

    /// Glyph for a character; unrecognized characters render as `Dash`.
    pub fn from_char(c: char) -> Self {
        match c {
            '0'..='9' => Glyph::digit(c as u8 - b'0'),
            'p' => Glyph::Pico,
            'n' => Glyph::Nano,
            'u' => Glyph::Micro,
            'a' => Glyph::A,
            'b' => Glyph::B,
            'c' => Glyph::C,
            'd' => Glyph::D,
            'e' => Glyph::E,
            'f' => Glyph::F,
            _ => Glyph::Dash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Glyph; GLYPH_COUNT] = [
        Glyph::Zero,
        Glyph::One,
        Glyph::Two,
        Glyph::Three,
        Glyph::Four,
        Glyph::Five,
        Glyph::Six,
        Glyph::Seven,
        Glyph::Eight,
        Glyph::Nine,
        Glyph::Pico,
        Glyph::Nano,
        Glyph::Micro,
        Glyph::A,
        Glyph::B,
        Glyph::C,
        Glyph::D,
        Glyph::E,
        Glyph::F,
        Glyph::Dash,
    ];

    #[test]
    fn every_glyph_has_a_unique_fixed_mask() {
        for (i, &a) in ALL.iter().enumerate() {
            assert_eq!(a.encode(), SEGMENT_TABLE[i]);
            for &b in &ALL[i + 1..] {
                assert_ne!(a.encode(), b.encode(), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn conventional_patterns() {
        assert_eq!(Glyph::Zero.encode(), 0x3F);
        assert_eq!(Glyph::One.encode(), 0x06);
        assert_eq!(Glyph::Eight.encode(), 0x7F);
        assert_eq!(Glyph::Nano.encode(), SEG_C | SEG_E | SEG_G);
        assert_eq!(Glyph::Micro.encode(), SEG_C | SEG_D | SEG_E);
        assert_eq!(Glyph::Dash.encode(), SEG_G);
    }

    #[test]
    fn unrecognized_chars_fall_back_to_dash() {
        for c in ['z', 'X', ' ', '!', '\u{1F600}'] {
            assert_eq!(Glyph::from_char(c), Glyph::Dash);
        }
        assert_eq!(Glyph::from_char('7'), Glyph::Seven);
        assert_eq!(Glyph::from_char('n'), Glyph::Nano);
    }

    #[test]
    fn digits_above_nine_fall_back_to_dash() {
        assert_eq!(Glyph::digit(10), Glyph::Dash);
        assert_eq!(Glyph::digit(255), Glyph::Dash);
    }
}
