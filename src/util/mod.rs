//! Small formatting helpers shared by the view layer.

pub mod dates;
