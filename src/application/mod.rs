//! Application layer: session-gated dashboard state and the controller driving it.

pub mod controller;
pub mod ports;
pub mod state;
