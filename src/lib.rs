//! Session-gated admin client for a marketplace listings backend.
//!
//! The [`application::controller::DashboardController`] owns all view state
//! and talks to the outside world through the traits in
//! [`application::ports`]. Concrete HTTP clients live in [`infra`], and
//! [`presentation::views::render_state`] turns a state snapshot into text.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
