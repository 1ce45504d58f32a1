// Domain layer: core models and ports (interfaces) for the downstream services.

pub mod model;
pub mod ports;
