use avr_device::atmega128a::{PORTB, PORTC, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;

pub trait PinMode {}

/// High-impedance input, pull-up off
pub struct Input;
/// Push-pull output
pub struct Output;
/// Alternates between driven output and released (high-impedance) states
/// without changing the pin's type; used for the charge-resistor lines and
/// the digit common lines
pub struct TriState;

impl PinMode for Input {}
impl PinMode for Output {}
impl PinMode for TriState {}

pub struct Pin<PORT, const PIN: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

macro_rules! impl_port {
    ($PORT:ident, $ddr:ident, $port:ident, $pin:ident) => {
        impl<const P: u8, MODE: PinMode> Pin<$PORT, P, MODE> {
            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }

            pub fn into_input(self) -> Pin<$PORT, P, Input> {
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }

            pub fn into_tri_state(self) -> Pin<$PORT, P, TriState> {
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }
        }

        impl<const P: u8> Pin<$PORT, P, Output> {
            #[inline]
            pub fn set_high(&mut self) {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
            }

            #[inline]
            pub fn set_low(&mut self) {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
            }

            #[inline]
            pub fn toggle(&mut self) {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() ^ (1 << P)));
                }
            }
        }

        impl<const P: u8> Pin<$PORT, P, Input> {
            #[inline]
            pub fn is_high(&self) -> bool {
                unsafe { ((*$PORT::ptr()).$pin.read().bits() & (1 << P)) != 0 }
            }

            #[inline]
            pub fn is_low(&self) -> bool {
                !self.is_high()
            }
        }

        impl<const P: u8> Pin<$PORT, P, TriState> {
            /// Drive the line high (output, PORT bit set)
            #[inline]
            pub fn drive_high(&mut self) {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
            }

            /// Drive the line low (output, PORT bit clear)
            #[inline]
            pub fn drive_low(&mut self) {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
            }

            /// Release the line to high impedance, pull-up off
            #[inline]
            pub fn release(&mut self) {
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
            }
        }

        impl<const P: u8> embedded_hal::digital::v2::OutputPin for Pin<$PORT, P, Output> {
            type Error = Infallible;

            fn set_high(&mut self) -> Result<(), Infallible> {
                // Method syntax resolves to the inherent impl
                self.set_high();
                Ok(())
            }

            fn set_low(&mut self) -> Result<(), Infallible> {
                self.set_low();
                Ok(())
            }
        }
    };
}

impl_port!(PORTB, ddrb, portb, pinb);
impl_port!(PORTC, ddrc, portc, pinc);
impl_port!(PORTD, ddrd, portd, pind);

impl<PORT, const P: u8> Pin<PORT, P, Input> {
    /// Handle to a pin in its reset state (input, high impedance).
    ///
    /// # Safety
    /// Callers must not hold two handles to the same physical pin.
    pub const unsafe fn new() -> Self {
        Self {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

// Board pin assignments for the capacitance meter
pub mod board {
    use super::*;

    /// Decimal-point segment
    pub type DpPin = Pin<PORTB, 0, Output>;

    /// High-value charging resistor, ranges 1-4
    pub type ChargeHighOhm = Pin<PORTB, 4, TriState>;
    /// Low-value charging resistor, range 5; doubles as the discharge path
    pub type ChargeLowOhm = Pin<PORTB, 5, TriState>;

    /// Digit common lines, most significant digit first (PC1..PC4)
    pub type Digit0 = Pin<PORTC, 1, TriState>;
    pub type Digit1 = Pin<PORTC, 2, TriState>;
    pub type Digit2 = Pin<PORTC, 3, TriState>;
    pub type Digit3 = Pin<PORTC, 4, TriState>;

    /// All meter pins, configured into their working modes.
    pub struct Pins {
        pub dp: DpPin,
        pub charge_high: ChargeHighOhm,
        pub charge_low: ChargeLowOhm,
        pub digit0: Digit0,
        pub digit1: Digit1,
        pub digit2: Digit2,
        pub digit3: Digit3,
    }

    impl Pins {
        /// # Safety
        /// Call at most once; aliases the pin hardware otherwise.
        pub unsafe fn take() -> Self {
            Self {
                dp: Pin::<PORTB, 0, Input>::new().into_output(),
                charge_high: Pin::<PORTB, 4, Input>::new().into_tri_state(),
                charge_low: Pin::<PORTB, 5, Input>::new().into_tri_state(),
                digit0: Pin::<PORTC, 1, Input>::new().into_tri_state(),
                digit1: Pin::<PORTC, 2, Input>::new().into_tri_state(),
                digit2: Pin::<PORTC, 3, Input>::new().into_tri_state(),
                digit3: Pin::<PORTC, 4, Input>::new().into_tri_state(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Type-level check only; no register access on the host
    #[test]
    fn output_pins_satisfy_the_hal_trait() {
        fn check<P: embedded_hal::digital::v2::OutputPin<Error = Infallible>>() {}
        check::<board::DpPin>();
        check::<Pin<PORTD, 2, Output>>();
    }
}
