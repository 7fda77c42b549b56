//! Charge-time capture: analog comparator routed into Timer1's input
//! capture unit.
//!
//! The comparator compares the capacitor voltage on ADC0 (through the
//! comparator multiplexer) against the AIN+ reference. When the capacitor
//! crosses the threshold, Timer1 latches its free-running count into ICR1
//! and the capture interrupt stores it here. At most one sample is kept
//! per armed interval; re-triggers before `disarm` are ignored.

use avr_device::atmega128a::{AC, ADC, TC1};
use avr_device::interrupt::{self, Mutex};
use core::cell::Cell;
use core::convert::Infallible;

// ADCSRA
const ADEN: u8 = 1 << 7;
// SFIOR
const ACME: u8 = 1 << 3;
// ADMUX channel select
const MUX_MASK: u8 = 0x1F;
// ACSR
const ACIC: u8 = 1 << 2;
// TCCR1B: noise canceler, rising edge, clk/1
const ICNC1: u8 = 1 << 7;
const ICES1: u8 = 1 << 6;
const CS10: u8 = 1 << 0;
// TIMSK / TIFR
const TICIE1: u8 = 1 << 5;
const ICF1: u8 = 1 << 5;

static SAMPLE: Mutex<Cell<Option<u16>>> = Mutex::new(Cell::new(None));

pub struct Capture {
    _private: (),
}

impl Capture {
    /// Route ADC0 through the comparator and wire the comparator output to
    /// Timer1's capture trigger. Takes the ADC out of service; the meter
    /// has no other use for it.
    pub fn new() -> Self {
        unsafe {
            // Comparator multiplexer needs the ADC disabled
            (*ADC::ptr()).adcsra.modify(|r, w| w.bits(r.bits() & !ADEN));
            (*AC::ptr()).sfior.modify(|r, w| w.bits(r.bits() | ACME));
            (*ADC::ptr()).admux.modify(|r, w| w.bits(r.bits() & !MUX_MASK));

            // Comparator output clocks the input capture unit
            (*AC::ptr()).acsr.write(|w| w.bits(ACIC));

            // Timer1 free-running at clk/1, capture on rising edge
            (*TC1::ptr()).tccr1b.write(|w| w.bits(ICNC1 | ICES1 | CS10));
        }
        Self { _private: () }
    }

    /// Reset the timing reference and enable the capture interrupt.
    /// Any sample left over from a previous interval is dropped.
    pub fn arm(&mut self) {
        interrupt::free(|cs| SAMPLE.borrow(cs).set(None));
        unsafe {
            // Clear a stale capture flag so arming can't fire immediately
            (*TC1::ptr()).tifr.write(|w| w.bits(ICF1));
            (*TC1::ptr()).tcnt1.write(|w| w.bits(0));
            (*TC1::ptr()).timsk.modify(|r, w| w.bits(r.bits() | TICIE1));
        }
    }

    /// Disable the capture interrupt; the timeout guard at the end of the
    /// charge window.
    pub fn disarm(&mut self) {
        unsafe {
            (*TC1::ptr()).timsk.modify(|r, w| w.bits(r.bits() & !TICIE1));
        }
    }

    /// Non-blocking check for a latched sample without consuming it.
    pub fn poll(&mut self) -> nb::Result<u16, Infallible> {
        interrupt::free(|cs| SAMPLE.borrow(cs).get()).ok_or(nb::Error::WouldBlock)
    }

    /// Consume the latched sample, if any arrived since `arm`.
    pub fn take(&mut self) -> Option<u16> {
        interrupt::free(|cs| SAMPLE.borrow(cs).take())
    }
}

impl Default for Capture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "avr")]
#[avr_device::interrupt(atmega128a)]
fn TIMER1_CAPT() {
    let ticks = unsafe { (*TC1::ptr()).icr1.read().bits() };
    interrupt::free(|cs| {
        let slot = SAMPLE.borrow(cs);
        // First crossing wins; later edges in the same interval are echoes
        if slot.get().is_none() {
            slot.set(Some(ticks));
        }
    });
}
