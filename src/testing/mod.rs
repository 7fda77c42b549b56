//! On-target self-test support: a small suite runner that reports over the
//! serial console, plus cases covering the meter's pure properties. Wiring
//! up a bench PSU or scope is not needed; these run on logic alone.

use crate::drivers::display::{DisplayBuffer, DisplayState};
use crate::drivers::glyph::{Glyph, GLYPH_COUNT};
use crate::drivers::SerialConsole;
use crate::meter::{convert, next_range, plausible, CycleOutcome, Range};
use ufmt::uwriteln;

pub trait TestCase: Sync {
    fn run(&self) -> TestResult;
    fn name(&self) -> &'static str;
}

#[derive(PartialEq)]
pub enum TestResult {
    Pass,
    Fail(&'static str),
}

macro_rules! expect {
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return TestResult::Fail($msg);
        }
    };
}

pub struct TestRunner {
    console: SerialConsole,
    total: u32,
    passed: u32,
}

impl TestRunner {
    pub fn new() -> Self {
        Self {
            console: SerialConsole::new(),
            total: 0,
            passed: 0,
        }
    }

    pub fn run_suite(&mut self, name: &'static str, tests: &[&dyn TestCase]) {
        let _ = uwriteln!(&mut self.console, "\r\n=== {} ===\r", name);

        for test in tests {
            self.total += 1;
            match test.run() {
                TestResult::Pass => {
                    self.passed += 1;
                    let _ = uwriteln!(&mut self.console, "{}: PASS\r", test.name());
                }
                TestResult::Fail(reason) => {
                    let _ = uwriteln!(&mut self.console, "{}: FAIL - {}\r", test.name(), reason);
                }
            }
        }

        let _ = uwriteln!(
            &mut self.console,
            "passed {}/{}\r",
            self.passed,
            self.total
        );
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

pub struct GlyphTotalityTest;
impl TestCase for GlyphTotalityTest {
    fn name(&self) -> &'static str {
        "glyph table totality"
    }

    fn run(&self) -> TestResult {
        // Every supported character maps to its glyph, everything else to
        // the dash fallback, and no two glyphs share a mask
        let supported = "0123456789pnuabcdef-";
        for c in supported.chars() {
            expect!(
                c == '-' || Glyph::from_char(c) != Glyph::Dash,
                "supported char hit the fallback"
            );
        }
        expect!(
            Glyph::from_char('z') == Glyph::Dash,
            "unsupported char missed the fallback"
        );

        let mut seen = [false; 128];
        for c in supported.chars() {
            let mask = Glyph::from_char(c).encode() as usize;
            expect!(!seen[mask], "duplicate segment mask");
            seen[mask] = true;
        }
        expect!(seen.iter().filter(|&&s| s).count() == GLYPH_COUNT, "mask count mismatch");
        TestResult::Pass
    }
}

pub struct RefreshRotationTest;
impl TestCase for RefreshRotationTest {
    fn name(&self) -> &'static str {
        "refresh rotation"
    }

    fn run(&self) -> TestResult {
        let mut state = DisplayState::new();
        for expected in [0u8, 1, 2, 3, 0] {
            expect!(state.advance().digit == expected, "cursor out of order");
        }
        TestResult::Pass
    }
}

pub struct RangeTableTest;
impl TestCase for RangeTableTest {
    fn name(&self) -> &'static str {
        "range conversion table"
    }

    fn run(&self) -> TestResult {
        let reading = convert(450, Range::new(3));
        expect!(reading.scaled == 45, "range 3 scaling");
        expect!(
            reading.buffer
                == DisplayBuffer::reading(0, 4, 5, Glyph::Nano, None),
            "range 3 display image"
        );

        expect!(convert(45, Range::new(1)).scaled == 450, "range 1 scaling");
        expect!(convert(45, Range::new(2)).scaled == 45, "range 2 scaling");
        expect!(convert(4500, Range::new(4)).scaled == 45, "range 4 scaling");
        expect!(
            convert(45_000, Range::new(5)).scaled == 4,
            "range 5 scaling"
        );
        TestResult::Pass
    }
}

pub struct SampleRejectionTest;
impl TestCase for SampleRejectionTest {
    fn name(&self) -> &'static str {
        "sample plausibility filter"
    }

    fn run(&self) -> TestResult {
        expect!(!plausible(0), "0 ticks accepted");
        expect!(!plausible(60_000), "60000 ticks accepted");
        expect!(plausible(450), "plausible sample rejected");
        expect!(
            next_range(Range::new(3), &CycleOutcome::Rejected { ticks: 0 }) == Range::new(3),
            "rejected sample moved the range"
        );
        TestResult::Pass
    }
}

pub struct RangeClampingTest;
impl TestCase for RangeClampingTest {
    fn name(&self) -> &'static str {
        "range clamping"
    }

    fn run(&self) -> TestResult {
        let mut range = Range::MAX;
        for _ in 0..8 {
            range = next_range(range, &CycleOutcome::NoSample);
        }
        expect!(range == Range::MAX, "range ran past 5");

        let low = CycleOutcome::Reading { ticks: 20, scaled: 2 };
        let mut range = Range::MIN;
        for _ in 0..8 {
            range = next_range(range, &low);
        }
        expect!(range == Range::MIN, "range ran past 1");
        TestResult::Pass
    }
}

/// The full pure-logic suite, ready for a runner binary.
pub static SELF_TESTS: [&dyn TestCase; 5] = [
    &GlyphTotalityTest,
    &RefreshRotationTest,
    &RangeTableTest,
    &SampleRejectionTest,
    &RangeClampingTest,
];
