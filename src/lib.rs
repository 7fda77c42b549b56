//! Capacitance meter firmware for the ATmega128.
//!
//! Charges the capacitor under test through a selectable resistor, times
//! the charge with the analog comparator and Timer1's input capture, and
//! shows the auto-ranged result on a multiplexed 4-digit seven-segment
//! display.
//!
//! The library half exists so the self-test runner and host unit tests can
//! reach the pure core; the firmware entry point lives in `main.rs`.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

pub mod config;
pub mod drivers;
pub mod hal;
pub mod meter;
pub mod testing;
