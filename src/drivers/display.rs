//! Four-digit multiplexed seven-segment display.
//!
//! Segment lines share PD0..PD6 across all digits; the refresh tick
//! (Timer0 overflow) selects one digit common line at a time, fast enough
//! that persistence of vision shows four steady digits.
//!
//! The buffer is written by the measurement loop and read by the refresh
//! interrupt. Both sides go through one `interrupt::free` critical section
//! per access, so the interrupt can never observe a half-written buffer.

use crate::config::DIGIT_COUNT;
use crate::drivers::glyph::Glyph;
use crate::hal::gpio::board::{Digit0, Digit1, Digit2, Digit3, DpPin};
use crate::hal::timer::{Prescaler, Timer};
use avr_device::atmega128a::{PORTD, TC0};
use avr_device::interrupt::{self, Mutex};
use core::cell::RefCell;
use embedded_hal::digital::v2::OutputPin;

/// PD0..PD6 carry segments A..G; PD7 is not ours
const SEGMENT_MASK: u8 = 0x7F;

/// What the display currently shows: four glyphs, most significant first,
/// plus which digit (if any) lights its decimal point.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DisplayBuffer {
    pub glyphs: [Glyph; 4],
    pub dp: Option<u8>,
}

impl DisplayBuffer {
    /// Power-up pattern: dashes, no decimal point.
    pub const fn blank() -> Self {
        Self {
            glyphs: [Glyph::Dash; 4],
            dp: None,
        }
    }

    /// A converted reading: hundreds/tens/ones digits in positions 0..2,
    /// the unit glyph in position 3.
    pub fn reading(hundreds: u8, tens: u8, ones: u8, unit: Glyph, dp: Option<u8>) -> Self {
        Self {
            glyphs: [
                Glyph::digit(hundreds),
                Glyph::digit(tens),
                Glyph::digit(ones),
                unit,
            ],
            dp,
        }
    }
}

/// One refresh tick's worth of output, fully decoded.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Frame {
    pub digit: u8,
    pub segments: u8,
    pub dp: bool,
}

/// Buffer plus the rotating digit cursor. Pure; the hardware driver and
/// the tests both step it the same way.
pub struct DisplayState {
    buffer: DisplayBuffer,
    cursor: u8,
}

impl DisplayState {
    pub const fn new() -> Self {
        Self {
            buffer: DisplayBuffer::blank(),
            cursor: 0,
        }
    }

    pub fn store(&mut self, buffer: DisplayBuffer) {
        self.buffer = buffer;
    }

    /// Frame for the current cursor position, then advance (wrapping at 4).
    pub fn advance(&mut self) -> Frame {
        let digit = self.cursor;
        let frame = Frame {
            digit,
            segments: self.buffer.glyphs[digit as usize].encode(),
            dp: self.buffer.dp == Some(digit),
        };
        self.cursor = (self.cursor + 1) % DIGIT_COUNT;
        frame
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SevenSeg {
    state: DisplayState,
    dp: DpPin,
    digit0: Digit0,
    digit1: Digit1,
    digit2: Digit2,
    digit3: Digit3,
}

static DISPLAY: Mutex<RefCell<Option<SevenSeg>>> = Mutex::new(RefCell::new(None));

impl SevenSeg {
    /// Configure the segment port and the refresh tick, then park the
    /// driver in the interrupt-shared slot. Refresh starts once global
    /// interrupts are enabled.
    pub fn install(dp: DpPin, digit0: Digit0, digit1: Digit1, digit2: Digit2, digit3: Digit3) {
        unsafe {
            (*PORTD::ptr())
                .ddrd
                .modify(|r, w| w.bits(r.bits() | SEGMENT_MASK));
        }

        let mut tick = Timer::<TC0>::new();
        tick.enable_overflow_interrupt();
        tick.start(Prescaler::Div64);

        let driver = Self {
            state: DisplayState::new(),
            dp,
            digit0,
            digit1,
            digit2,
            digit3,
        };

        interrupt::free(|cs| {
            DISPLAY.borrow(cs).replace(Some(driver));
        });
    }

    fn deselect_all(&mut self) {
        self.digit0.release();
        self.digit1.release();
        self.digit2.release();
        self.digit3.release();
    }

    // Digit commons sink current, so "selected" means driven low
    fn select(&mut self, digit: u8) {
        match digit {
            0 => self.digit0.drive_low(),
            1 => self.digit1.drive_low(),
            2 => self.digit2.drive_low(),
            _ => self.digit3.drive_low(),
        }
    }

    fn write_segments(mask: u8) {
        unsafe {
            (*PORTD::ptr())
                .portd
                .modify(|r, w| w.bits((r.bits() & !SEGMENT_MASK) | (mask & SEGMENT_MASK)));
        }
    }

    fn refresh(&mut self) {
        // Blank before switching commons so the previous digit's pattern
        // never ghosts onto the next one
        Self::write_segments(0);
        set_dp(&mut self.dp, false);
        self.deselect_all();

        let frame = self.state.advance();
        self.select(frame.digit);
        Self::write_segments(frame.segments);
        set_dp(&mut self.dp, frame.dp);
    }
}

fn set_dp<P: OutputPin>(pin: &mut P, lit: bool) {
    let _ = if lit { pin.set_high() } else { pin.set_low() };
}

/// Replace the displayed reading. All five fields change inside one
/// critical section.
pub fn update(buffer: DisplayBuffer) {
    interrupt::free(|cs| {
        if let Some(display) = DISPLAY.borrow(cs).borrow_mut().as_mut() {
            display.state.store(buffer);
        }
    });
}

#[cfg(target_arch = "avr")]
#[avr_device::interrupt(atmega128a)]
fn TIMER0_OVF() {
    interrupt::free(|cs| {
        if let Some(display) = DISPLAY.borrow(cs).borrow_mut().as_mut() {
            display.refresh();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_covers_each_digit_once_in_order() {
        let mut state = DisplayState::new();
        for expected in [0u8, 1, 2, 3, 0, 1, 2, 3] {
            assert_eq!(state.advance().digit, expected);
        }
    }

    #[test]
    fn frames_decode_the_stored_buffer() {
        let mut state = DisplayState::new();
        state.store(DisplayBuffer::reading(0, 4, 5, Glyph::Nano, None));

        let frames = [
            state.advance(),
            state.advance(),
            state.advance(),
            state.advance(),
        ];
        assert_eq!(frames[0].segments, Glyph::Zero.encode());
        assert_eq!(frames[1].segments, Glyph::Four.encode());
        assert_eq!(frames[2].segments, Glyph::Five.encode());
        assert_eq!(frames[3].segments, Glyph::Nano.encode());
        assert!(frames.iter().all(|f| !f.dp));
    }

    #[test]
    fn dp_lights_only_on_its_digit() {
        let mut state = DisplayState::new();
        state.store(DisplayBuffer::reading(1, 2, 3, Glyph::Micro, Some(1)));
        for _ in 0..2 {
            for digit in 0u8..4 {
                let frame = state.advance();
                assert_eq!(frame.dp, digit == 1);
            }
        }
    }

    // A buffer update is a single struct store under the display lock, so
    // any frame sequence mixes fields from exactly one buffer generation.
    #[test]
    fn frames_never_mix_buffer_generations() {
        let old = DisplayBuffer::reading(1, 1, 1, Glyph::Pico, Some(1));
        let new = DisplayBuffer::reading(9, 9, 9, Glyph::Micro, None);

        // Interleave an update at every possible cursor boundary
        for boundary in 0..4 {
            let mut state = DisplayState::new();
            state.store(old);
            for tick in 0..8 {
                if tick == boundary {
                    state.store(new);
                }
                let frame = state.advance();
                let source = if tick >= boundary { new } else { old };
                assert_eq!(
                    frame.segments,
                    source.glyphs[frame.digit as usize].encode()
                );
                assert_eq!(frame.dp, source.dp == Some(frame.digit));
            }
        }
    }
}
