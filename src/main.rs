#![cfg_attr(target_arch = "avr", no_std, no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    use capmeter_firmware::drivers::{ChargeControl, SerialConsole, SevenSeg};
    use capmeter_firmware::hal::{board, Capture, Delay};
    use capmeter_firmware::meter::{CycleOutcome, Meter};
    use ufmt::uwriteln;

    let _peripherals = avr_device::atmega128a::Peripherals::take().unwrap();
    let pins = unsafe { board::Pins::take() };

    let mut console = SerialConsole::new();
    let mut capture = Capture::new();
    let mut charge = ChargeControl::new(pins.charge_high, pins.charge_low);
    SevenSeg::install(pins.dp, pins.digit0, pins.digit1, pins.digit2, pins.digit3);

    let mut delay = Delay::new();
    let mut meter = Meter::new();

    unsafe { avr_device::interrupt::enable() };

    console.write_line("capmeter v0.1.0");

    loop {
        let range = meter.range();
        match meter.run_cycle(&mut charge, &mut capture, &mut delay) {
            CycleOutcome::Reading { ticks, scaled } => {
                let _ = uwriteln!(
                    &mut console,
                    "range {} ticks {} scaled {}\r",
                    range.get(),
                    ticks,
                    scaled
                );
            }
            CycleOutcome::NoSample => {
                let _ = uwriteln!(
                    &mut console,
                    "range {} no capture, backing off\r",
                    range.get()
                );
            }
            CycleOutcome::Rejected { ticks } => {
                let _ = uwriteln!(
                    &mut console,
                    "range {} rejected sample {}\r",
                    range.get(),
                    ticks
                );
            }
        }
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
