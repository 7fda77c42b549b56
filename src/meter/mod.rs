//! RC-charge measurement and auto-ranging.
//!
//! One cycle: DISCHARGE -> CHARGE (capture armed) -> WAIT -> DISARM ->
//! CONVERT -> RERANGE. The capture interrupt only latches a tick count;
//! conversion and the display write happen here in the mainline, so the
//! display buffer has exactly one writer.

use crate::config::{
    CHARGE_WINDOW_MS, DEFAULT_RANGE, PLAUSIBLE_MAX_TICKS, PLAUSIBLE_MIN_TICKS, RERANGE_HIGH,
    RERANGE_LOW,
};
use crate::drivers::charge::{ChargeControl, Resistor};
use crate::drivers::display::{self, DisplayBuffer};
use crate::drivers::glyph::Glyph;
use crate::hal::Capture;
use embedded_hal::blocking::delay::DelayMs;

/// Selected resistor/scale combination, always within [1, 5]. Lower is
/// more sensitive.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Range(u8);

impl Range {
    pub const MIN: Range = Range(1);
    pub const MAX: Range = Range(5);

    pub fn new(n: u8) -> Self {
        Range(n.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// One step toward range 1, clamped.
    pub fn more_sensitive(self) -> Self {
        Range::new(self.0.saturating_sub(1))
    }

    /// One step toward range 5, clamped.
    pub fn less_sensitive(self) -> Self {
        Range::new(self.0 + 1)
    }

    pub fn params(self) -> &'static RangeParams {
        &RANGE_TABLE[(self.0 - 1) as usize]
    }
}

impl Default for Range {
    fn default() -> Self {
        Range::new(DEFAULT_RANGE)
    }
}

#[derive(Copy, Clone, Debug)]
pub enum Scaling {
    Times(u16),
    DividedBy(u16),
}

impl Scaling {
    pub fn apply(self, ticks: u16) -> u32 {
        match self {
            Scaling::Times(m) => u32::from(ticks) * u32::from(m),
            Scaling::DividedBy(d) => u32::from(ticks) / u32::from(d),
        }
    }
}

/// Per-range conversion parameters. A lookup, not a formula.
pub struct RangeParams {
    pub scaling: Scaling,
    pub unit: Glyph,
    pub dp: Option<u8>,
    pub resistor: Resistor,
}

pub static RANGE_TABLE: [RangeParams; 5] = [
    // 1: pF
    RangeParams {
        scaling: Scaling::Times(10),
        unit: Glyph::Pico,
        dp: Some(1),
        resistor: Resistor::HighOhm,
    },
    // 2: 1-10 nF
    RangeParams {
        scaling: Scaling::DividedBy(1),
        unit: Glyph::Nano,
        dp: Some(1),
        resistor: Resistor::HighOhm,
    },
    // 3: 10-100 nF
    RangeParams {
        scaling: Scaling::DividedBy(10),
        unit: Glyph::Nano,
        dp: None,
        resistor: Resistor::HighOhm,
    },
    // 4: 0.1-10 uF
    RangeParams {
        scaling: Scaling::DividedBy(100),
        unit: Glyph::Micro,
        dp: Some(1),
        resistor: Resistor::HighOhm,
    },
    // 5: 10+ uF
    RangeParams {
        scaling: Scaling::DividedBy(10_000),
        unit: Glyph::Micro,
        dp: None,
        resistor: Resistor::LowOhm,
    },
];

/// A converted measurement: the scaled magnitude (kept for the reranging
/// decision) and the display image it produces.
#[derive(Copy, Clone, Debug)]
pub struct Reading {
    pub scaled: u32,
    pub buffer: DisplayBuffer,
}

/// Scale a tick count per the range table and lay out the three decimal
/// digits plus unit glyph.
pub fn convert(ticks: u16, range: Range) -> Reading {
    let params = range.params();
    let scaled = params.scaling.apply(ticks);

    let buffer = DisplayBuffer::reading(
        ((scaled / 100) % 10) as u8,
        ((scaled / 10) % 10) as u8,
        (scaled % 10) as u8,
        params.unit,
        params.dp,
    );

    Reading { scaled, buffer }
}

/// True if a raw capture could be a real threshold crossing. Below the
/// floor is comparator noise; above the ceiling is wraparound or a stale
/// latch.
pub fn plausible(ticks: u16) -> bool {
    (PLAUSIBLE_MIN_TICKS..=PLAUSIBLE_MAX_TICKS).contains(&ticks)
}

/// How one measurement cycle ended.
#[derive(Copy, Clone, Debug)]
pub enum CycleOutcome {
    /// Valid sample; the display was updated.
    Reading { ticks: u16, scaled: u32 },
    /// Nothing crossed the threshold inside the charge window: the RC
    /// constant is too large for this range.
    NoSample,
    /// A sample arrived but failed the plausibility filter; discarded.
    Rejected { ticks: u16 },
}

/// Range for the next cycle. Valid readings steer by the scaled value; a
/// timeout means "too slow here" and backs the sensitivity off one step;
/// a rejected sample is noise and must not walk the range.
pub fn next_range(range: Range, outcome: &CycleOutcome) -> Range {
    match *outcome {
        CycleOutcome::Reading { scaled, .. } if scaled < RERANGE_LOW => range.more_sensitive(),
        CycleOutcome::Reading { scaled, .. } if scaled > RERANGE_HIGH => range.less_sensitive(),
        CycleOutcome::Reading { .. } => range,
        CycleOutcome::NoSample => range.less_sensitive(),
        CycleOutcome::Rejected { .. } => range,
    }
}

pub struct Meter {
    range: Range,
}

impl Meter {
    pub fn new() -> Self {
        Self {
            range: Range::default(),
        }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// Run one full measurement cycle. Never fails; anomalies show up as
    /// the returned outcome and the device just tries again next cycle.
    pub fn run_cycle(
        &mut self,
        charge: &mut ChargeControl,
        capture: &mut Capture,
        delay: &mut impl DelayMs<u16>,
    ) -> CycleOutcome {
        charge.discharge(delay);

        let resistor = self.range.params().resistor;
        capture.arm();
        charge.begin_charge(resistor);

        // Bounded wait: the window ends early once a sample is latched,
        // and unconditionally after CHARGE_WINDOW_MS
        for _ in 0..CHARGE_WINDOW_MS {
            delay.delay_ms(1);
            if capture.poll().is_ok() {
                break;
            }
        }

        capture.disarm();
        charge.end_charge(resistor);

        let outcome = match capture.take() {
            None => CycleOutcome::NoSample,
            Some(ticks) if !plausible(ticks) => CycleOutcome::Rejected { ticks },
            Some(ticks) => {
                let reading = convert(ticks, self.range);
                display::update(reading.buffer);
                CycleOutcome::Reading {
                    ticks,
                    scaled: reading.scaled,
                }
            }
        };

        self.range = next_range(self.range, &outcome);
        outcome
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_table_matches_the_design_values() {
        let cases: [(u8, u16, u32, Glyph, Option<u8>); 5] = [
            (1, 45, 450, Glyph::Pico, Some(1)),
            (2, 45, 45, Glyph::Nano, Some(1)),
            (3, 450, 45, Glyph::Nano, None),
            (4, 4500, 45, Glyph::Micro, Some(1)),
            (5, 45_000, 4, Glyph::Micro, None),
        ];
        for (range, ticks, scaled, unit, dp) in cases {
            let reading = convert(ticks, Range::new(range));
            assert_eq!(reading.scaled, scaled, "range {}", range);
            assert_eq!(reading.buffer.glyphs[3], unit, "range {}", range);
            assert_eq!(reading.buffer.dp, dp, "range {}", range);
        }
    }

    #[test]
    fn range3_450_ticks_shows_045_nano_no_dp() {
        let reading = convert(450, Range::new(3));
        assert_eq!(reading.scaled, 45);
        assert_eq!(
            reading.buffer.glyphs,
            [Glyph::Zero, Glyph::Four, Glyph::Five, Glyph::Nano]
        );
        assert_eq!(reading.buffer.dp, None);
    }

    #[test]
    fn implausible_samples_are_rejected() {
        assert!(!plausible(0));
        assert!(!plausible(9));
        assert!(!plausible(60_000));
        assert!(plausible(10));
        assert!(plausible(50_000));
    }

    #[test]
    fn rejected_samples_do_not_move_the_range() {
        let range = Range::new(3);
        let outcome = CycleOutcome::Rejected { ticks: 60_000 };
        assert_eq!(next_range(range, &outcome), range);
    }

    #[test]
    fn timeout_backs_sensitivity_off_one_step() {
        assert_eq!(
            next_range(Range::new(3), &CycleOutcome::NoSample),
            Range::new(4)
        );
    }

    #[test]
    fn reranging_clamps_at_both_ends() {
        let mut range = Range::new(2);
        for _ in 0..10 {
            range = next_range(
                range,
                &CycleOutcome::Reading {
                    ticks: 20,
                    scaled: 2,
                },
            );
        }
        assert_eq!(range, Range::MIN);

        let mut range = Range::new(4);
        for _ in 0..10 {
            range = next_range(range, &CycleOutcome::NoSample);
        }
        assert_eq!(range, Range::MAX);
    }

    // Ranges 1-4 share one physical resistor, so a given capacitance
    // yields the same tick count on each of them; only the scaling
    // differs. Model that and check the control loop settles.
    fn settle(start: u8, ticks: u16, cycles: usize) -> Vec<Range> {
        let mut range = Range::new(start);
        let mut history = Vec::new();
        for _ in 0..cycles {
            let scaled = range.params().scaling.apply(ticks);
            let outcome = CycleOutcome::Reading { ticks, scaled };
            range = next_range(range, &outcome);
            history.push(range);
        }
        history
    }

    #[test]
    fn ranging_converges_and_holds_for_an_in_window_value() {
        // ~4.5 nF: reads 4 on range 3 (under-resolved), 45 on range 2
        let history = settle(3, 45, 10);
        assert_eq!(*history.last().unwrap(), Range::new(2));
        assert!(history[2..].iter().all(|&r| r == Range::new(2)));

        // ~0.2 uF: reads 2000 on range 3, 200 on range 4
        let history = settle(3, 20_000, 10);
        assert!(history[2..].iter().all(|&r| r == Range::new(4)));

        // 45 nF sits inside range 3's window; no movement at all
        let history = settle(3, 450, 10);
        assert!(history.iter().all(|&r| r == Range::new(3)));
    }
}
