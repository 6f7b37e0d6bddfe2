//! dns-bridge application layer: the engine-facing ports and the
//! request/response translation between raw wire bytes and the engine.
pub mod ports;
pub mod services;
pub mod use_cases;
