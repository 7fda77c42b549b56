//! Configuration constants for the capacitance meter firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate for the debug console
pub const UART_BAUD: u32 = 9600;

/// Discharge hold time in milliseconds; long enough to pull even a large
/// electrolytic down to a known low state before the next measurement
pub const DISCHARGE_MS: u16 = 1000;

/// Maximum charge window in milliseconds; the capture interrupt is
/// disarmed unconditionally once this elapses
pub const CHARGE_WINDOW_MS: u16 = 250;

/// Captured tick counts below this are comparator noise or a trigger
/// artifact and are discarded
pub const PLAUSIBLE_MIN_TICKS: u16 = 10;

/// Captured tick counts above this are counter wraparound or a stale
/// reading and are discarded
pub const PLAUSIBLE_MAX_TICKS: u16 = 50_000;

/// Scaled readings below this step the range one notch more sensitive
pub const RERANGE_LOW: u32 = 10;

/// Scaled readings above this step the range one notch less sensitive
pub const RERANGE_HIGH: u32 = 1000;

/// Mid-scale range selected at power-up
pub const DEFAULT_RANGE: u8 = 3;

/// Number of display digits
pub const DIGIT_COUNT: u8 = 4;
