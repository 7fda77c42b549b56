pub mod charge;
pub mod display;
pub mod glyph;
pub mod serial_console;

pub use charge::{ChargeControl, Resistor};
pub use display::{DisplayBuffer, DisplayState, Frame, SevenSeg};
pub use glyph::Glyph;
pub use serial_console::SerialConsole;
