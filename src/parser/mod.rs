//! Terminal escape sequence parser
//!
//! A stateful parser that converts bytes into terminal actions, plus the
//! decoders that give CSI, SGR and OSC payloads their meaning.

mod action;
mod csi;
mod osc;
mod sgr;
mod state;

pub use action::{Action, ControlCode, CsiAction, EscAction, OscAction};
pub use csi::CsiCommand;
pub use osc::parse_osc;
pub use sgr::{parse_sgr, SgrAttribute};
pub use state::{Parser, MAX_INTERMEDIATES, MAX_PARAMS, OSC_CAPACITY};
