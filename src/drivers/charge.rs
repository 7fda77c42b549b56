//! Charge/discharge control for the capacitor under test.
//!
//! Each selectable resistor hangs off its own pin. A resistor charges the
//! capacitor while its pin is driven high and drops out of the circuit
//! when the pin is released to high impedance, so only the selected one
//! ever conducts. The low-ohm pin doubles as the discharge path.

use crate::config::DISCHARGE_MS;
use crate::hal::gpio::board::{ChargeHighOhm, ChargeLowOhm};
use embedded_hal::blocking::delay::DelayMs;

/// Which charging resistor a range uses.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Resistor {
    /// High-value resistor: slow charge, ranges 1-4
    HighOhm,
    /// Low-value resistor: fast charge, range 5
    LowOhm,
}

pub struct ChargeControl {
    high: ChargeHighOhm,
    low: ChargeLowOhm,
}

impl ChargeControl {
    pub fn new(mut high: ChargeHighOhm, mut low: ChargeLowOhm) -> Self {
        high.release();
        low.release();
        Self { high, low }
    }

    /// Pull the capacitor down to a known low state through the low-ohm
    /// path, then let the node float again.
    pub fn discharge(&mut self, delay: &mut impl DelayMs<u16>) {
        self.low.drive_low();
        delay.delay_ms(DISCHARGE_MS);
        self.low.release();
    }

    /// Start charging through the given resistor.
    pub fn begin_charge(&mut self, resistor: Resistor) {
        match resistor {
            Resistor::HighOhm => self.high.drive_high(),
            Resistor::LowOhm => self.low.drive_high(),
        }
    }

    /// Stop charging and take the resistor back out of the circuit.
    pub fn end_charge(&mut self, resistor: Resistor) {
        match resistor {
            Resistor::HighOhm => self.high.release(),
            Resistor::LowOhm => self.low.release(),
        }
    }
}
