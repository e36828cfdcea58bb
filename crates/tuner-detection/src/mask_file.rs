//! Two-line text persistence for an [`HsvRange`]:
//!
//! ```text
//! L_H,L_S,L_V
//! U_H,U_S,U_V
//! ```

use std::num::IntErrorKind;

use crate::color::HsvRange;
use crate::error::MaskError;

pub fn encode(range: &HsvRange) -> String {
    let [lh, ls, lv] = range.lower;
    let [uh, us, uv] = range.upper;
    format!("{lh},{ls},{lv}\n{uh},{us},{uv}\n")
}

/// Parses the two-line format. Any integer is accepted; values outside a channel
/// byte saturate to 0 or 255, which thresholds identically. Neither `lower <= upper`
/// nor the hue ceiling is enforced, see [`HsvRange::is_valid`].
pub fn decode(text: &str) -> Result<HsvRange, MaskError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() != 2 {
        return Err(MaskError::malformed(format!(
            "expected 2 lines, found {}",
            lines.len()
        )));
    }

    let lower = parse_triple(lines[0], 1)?;
    let upper = parse_triple(lines[1], 2)?;
    Ok(HsvRange::new(lower, upper))
}

fn parse_triple(line: &str, line_no: usize) -> Result<[u8; 3], MaskError> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != 3 {
        return Err(MaskError::malformed(format!(
            "line {line_no}: expected 3 fields, found {}",
            fields.len()
        )));
    }

    let mut triple = [0u8; 3];
    for (slot, field) in triple.iter_mut().zip(&fields) {
        *slot = parse_bound(field.trim()).ok_or_else(|| {
            MaskError::malformed(format!("line {line_no}: `{}` is not an integer", field.trim()))
        })?;
    }
    Ok(triple)
}

// Saturates into a channel byte; `None` only for text that is not an integer.
fn parse_bound(field: &str) -> Option<u8> {
    match field.parse::<i64>() {
        Ok(value) => Some(value.clamp(0, u8::MAX as i64) as u8),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(u8::MAX),
            IntErrorKind::NegOverflow => Some(0),
            _ => None,
        },
    }
}
