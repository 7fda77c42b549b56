use avr_device::atmega128a::{TC0, TC2};
use core::marker::PhantomData;
use embedded_hal::blocking::delay::DelayMs;

#[derive(Clone, Copy)]
pub enum Prescaler {
    Stop,
    Direct,
    Div8,
    Div64,
    Div256,
    Div1024,
}

/// 8-bit timer/counter register access.
///
/// TC0 and TC2 on the ATmega128 have distinct register names and, because
/// TC0 is the asynchronous timer, distinct prescaler encodings, so each
/// implementor supplies its own bit patterns.
pub trait TickSource {
    fn presc_bits(prescaler: Prescaler) -> u8;
    fn set_control(bits: u8);
    fn counter() -> u8;
    fn set_counter(value: u8);
}

impl TickSource for TC0 {
    fn presc_bits(prescaler: Prescaler) -> u8 {
        match prescaler {
            Prescaler::Stop => 0,
            Prescaler::Direct => 1,
            Prescaler::Div8 => 2,
            Prescaler::Div64 => 4,
            Prescaler::Div256 => 6,
            Prescaler::Div1024 => 7,
        }
    }

    fn set_control(bits: u8) {
        unsafe { (*TC0::ptr()).tccr0.write(|w| w.bits(bits)) }
    }

    fn counter() -> u8 {
        unsafe { (*TC0::ptr()).tcnt0.read().bits() }
    }

    fn set_counter(value: u8) {
        unsafe { (*TC0::ptr()).tcnt0.write(|w| w.bits(value)) }
    }
}

impl TickSource for TC2 {
    fn presc_bits(prescaler: Prescaler) -> u8 {
        match prescaler {
            Prescaler::Stop => 0,
            Prescaler::Direct => 1,
            Prescaler::Div8 => 2,
            Prescaler::Div64 => 3,
            Prescaler::Div256 => 4,
            Prescaler::Div1024 => 5,
        }
    }

    fn set_control(bits: u8) {
        unsafe { (*TC2::ptr()).tccr2.write(|w| w.bits(bits)) }
    }

    fn counter() -> u8 {
        unsafe { (*TC2::ptr()).tcnt2.read().bits() }
    }

    fn set_counter(value: u8) {
        unsafe { (*TC2::ptr()).tcnt2.write(|w| w.bits(value)) }
    }
}

pub struct Timer<T> {
    _timer: PhantomData<T>,
}

impl<T: TickSource> Timer<T> {
    pub fn new() -> Self {
        T::set_control(0);
        T::set_counter(0);
        Self { _timer: PhantomData }
    }

    pub fn start(&mut self, prescaler: Prescaler) {
        T::set_control(T::presc_bits(prescaler));
    }

    pub fn stop(&mut self) {
        T::set_control(0);
    }

    pub fn set_counter(&mut self, value: u8) {
        T::set_counter(value);
    }

    pub fn counter(&self) -> u8 {
        T::counter()
    }
}

// TOIE0 is TIMSK bit 0
const TOIE0: u8 = 0x01;

impl Timer<TC0> {
    pub fn enable_overflow_interrupt(&mut self) {
        unsafe {
            (*TC0::ptr()).timsk.modify(|r, w| w.bits(r.bits() | TOIE0));
        }
    }

    pub fn disable_overflow_interrupt(&mut self) {
        unsafe {
            (*TC0::ptr()).timsk.modify(|r, w| w.bits(r.bits() & !TOIE0));
        }
    }
}

impl<T: TickSource> Default for Timer<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Millisecond delay on Timer2; Timer0 belongs to the display refresh tick
pub fn delay_ms(ms: u16) {
    let mut timer = Timer::<TC2>::new();

    // 16MHz / 64 = 250kHz, 250 ticks = 1ms
    timer.set_counter(0);
    timer.start(Prescaler::Div64);

    for _ in 0..ms {
        while timer.counter() < 250 {}
        timer.set_counter(0);
    }

    timer.stop();
}

/// Blocking delay provider over Timer2
pub struct Delay {
    _private: (),
}

impl Delay {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        delay_ms(ms);
    }
}
