use std::env;

fn main() {
    let target = env::var("TARGET").unwrap();

    // AVR-only link flags; host builds (unit tests) skip them
    if target.contains("avr") {
        println!("cargo:rustc-link-arg=-mmcu=atmega128");
    }

    // Pass CPU frequency for timing calculations
    println!("cargo:rustc-env=MCU_FREQ_HZ=16000000");

    if env::var("PROFILE").unwrap() == "debug" {
        println!("cargo:rustc-cfg=feature=\"debug\"");
    }
}
