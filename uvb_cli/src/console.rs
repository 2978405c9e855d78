//! Terminal stand-in for the meter's screen.

use std::io::Write;

use serde_json::json;
use uvb_core::readout::BAR_FULL_PX;
use uvb_core::{Display, Readout};
use uvb_traits::HwResult;

pub const UNIT_LABEL: &str = "uW/cm2";
pub const HOLD_LABEL: &str = "HOLD";

/// Writes one line per frame: plain text or a JSON object.
pub struct ConsoleDisplay<W: Write> {
    out: W,
    json: bool,
}

impl ConsoleDisplay<std::io::Stdout> {
    pub fn stdout(json: bool) -> Self {
        Self::new(std::io::stdout(), json)
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `" 103 uW/cm2  UVI=12   [##########  ] HOLD"`
pub fn format_text(r: &Readout) -> String {
    const BAR_CELLS: u8 = 12;
    let filled = (u32::from(r.bar_height()) * u32::from(BAR_CELLS) / BAR_FULL_PX as u32) as usize;
    let bar: String = (0..usize::from(BAR_CELLS))
        .map(|i| if i < filled { '#' } else { ' ' })
        .collect();
    let hold = if r.hold.is_held() { HOLD_LABEL } else { "" };
    format!(
        "{:>4} {UNIT_LABEL}  {:<7} [{bar}] {hold}",
        r.power_text(),
        r.uvi_text()
    )
    .trim_end()
    .to_string()
}

pub fn format_json(r: &Readout) -> String {
    json!({
        "event": "readout",
        "power_uw_cm2": r.power,
        "uv_index": r.uv_index,
        "uvi": r.uvi_text(),
        "bar_px": r.bar_height(),
        "hold": r.hold.is_held(),
        "fault": r.fault.is_fault(),
    })
    .to_string()
}

impl<W: Write> Display for ConsoleDisplay<W> {
    fn render(&mut self, readout: &Readout) -> HwResult<()> {
        let line = if self.json {
            format_json(readout)
        } else {
            format_text(readout)
        };
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    fn message(&mut self, text: &str) -> HwResult<()> {
        if self.json {
            writeln!(self.out, "{}", json!({ "event": "message", "text": text }))?;
        } else {
            writeln!(self.out, "{text}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uvb_core::{FaultState, HoldState};

    #[test]
    fn text_frame_shows_power_index_and_hold() {
        let r = Readout::new(0.096, HoldState::Held, FaultState::Ok);
        let line = format_text(&r);
        assert!(line.starts_with(" 103 uW/cm2"), "{line}");
        assert!(line.contains("UVI=12"));
        assert!(line.ends_with("HOLD"));
    }

    #[test]
    fn text_frame_uses_placeholders_on_fault() {
        let r = Readout::new(0.0, HoldState::Active, FaultState::Fault);
        let line = format_text(&r);
        assert!(line.contains("---- uW/cm2"));
        assert!(line.contains("UVI=---"));
        assert!(!line.contains(HOLD_LABEL));
    }

    #[test]
    fn json_frame_has_null_measurements_on_fault() {
        let r = Readout::new(0.0, HoldState::Active, FaultState::Fault);
        let v: serde_json::Value = serde_json::from_str(&format_json(&r)).unwrap();
        assert_eq!(v["event"], "readout");
        assert!(v["power_uw_cm2"].is_null());
        assert_eq!(v["fault"], true);
        assert_eq!(v["bar_px"], 0);
    }

    #[test]
    fn render_writes_one_line_per_frame() {
        let mut d = ConsoleDisplay::new(Vec::new(), false);
        let r = Readout::new(1.0, HoldState::Active, FaultState::Ok);
        d.render(&r).unwrap();
        d.message("Calibrating...").unwrap();
        let out = String::from_utf8(d.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("UVI=13+"));
        assert!(lines[0].contains("[############]"));
        assert_eq!(lines[1], "Calibrating...");
    }
}
