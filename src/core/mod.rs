pub mod harness;
pub mod probe;
pub mod report;

pub use crate::domain::model::{OutputStyle, ProbeResult, ProbeSpec, ResponseEnvelope};
pub use crate::domain::ports::{HarnessSettings, Probe};
pub use crate::utils::error::Result;
