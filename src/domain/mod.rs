// Domain layer: entities, audit entries and ports. No I/O here.

pub mod model;
pub mod ports;
