#![deny(clippy::all, clippy::pedantic)]

use serde::Serialize;
use tracing::error;

use postdesk::application::state::AppState;
use postdesk::presentation::views::render_state;

use crate::client::CliError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Request(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}

pub fn print_screen(state: &AppState) -> Result<(), CliError> {
    let screen = render_state(state).inspect_err(|err| {
        error!(origin = err.origin(), error = ?err, "failed to render screen");
    })?;
    println!("{}", screen.trim_end());
    Ok(())
}
