//! Flashes as a standalone image and reports the pure-logic self-test
//! suite over the serial console at 9600 baud.

#![cfg_attr(target_arch = "avr", no_std, no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    use capmeter_firmware::hal::delay_ms;
    use capmeter_firmware::testing::{TestRunner, SELF_TESTS};

    let _peripherals = avr_device::atmega128a::Peripherals::take().unwrap();

    let mut runner = TestRunner::new();
    runner.run_suite("capmeter self-test", &SELF_TESTS);

    loop {
        delay_ms(1000);
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
