//! Plain-text views rendered from [`crate::application::state::AppState`].

pub mod admin;
pub mod views;
