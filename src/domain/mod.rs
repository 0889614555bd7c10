// Domain layer: probe models and the seams the harness is driven through.

pub mod model;
pub mod ports;
