use crate::hal::Uart;
use core::convert::Infallible;

/// Log-only console on USART0. Never a command surface; the meter has no
/// input path.
pub struct SerialConsole {
    uart: Uart,
}

impl SerialConsole {
    pub fn new() -> Self {
        Self { uart: Uart::new() }
    }

    pub fn write_line(&mut self, s: &str) {
        use ufmt::uWrite;
        let _ = self.write_str(s);
        let _ = self.write_str("\r\n");
    }
}

impl Default for SerialConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl ufmt::uWrite for SerialConsole {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        ufmt::uWrite::write_str(&mut self.uart, s)
    }
}
