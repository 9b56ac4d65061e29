//! OSC payload decoding
//!
//! Only `4;index;spec` is interpreted. Everything else is logged and
//! dropped.

use tracing::debug;

use super::action::OscAction;
use crate::core::Color;

/// Decode a complete OSC payload (without the introducer or terminator)
pub fn parse_osc(payload: &[u8]) -> Option<OscAction> {
    let text = String::from_utf8_lossy(payload);
    let mut parts = text.splitn(3, ';');
    let command = parts.next()?;

    match command {
        "4" => {
            let (Some(index), Some(spec)) = (parts.next(), parts.next()) else {
                debug!("Malformed OSC 4: {:?}", text);
                return None;
            };
            let Ok(index) = index.parse::<u8>() else {
                debug!("OSC 4 palette index out of range: {:?}", index);
                return None;
            };
            let Some(color) = Color::from_osc_spec(spec) else {
                debug!("Unparseable OSC 4 color spec: {:?}", spec);
                return None;
            };
            Some(OscAction::SetColor { index, color })
        }
        _ => {
            debug!("Unhandled OSC command: {:?}", command);
            None
        }
    }
}
