// Domain layer: journal and report models plus the ports the pipeline is written against.

pub mod model;
pub mod ports;
