pub mod capture;
pub mod gpio;
pub mod timer;
pub mod uart;

// Re-export commonly used types
pub use capture::Capture;
pub use gpio::{board, Input, Output, Pin, TriState};
pub use timer::{delay_ms, Delay, Prescaler, Timer};
pub use uart::Uart;
