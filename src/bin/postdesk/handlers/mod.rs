#![deny(clippy::all, clippy::pedantic)]

pub mod health;
pub mod posts;

use postdesk::application::controller::DashboardController;
use postdesk::application::state::{ListState, Screen};

use crate::client::{CliError, Credentials, Ctx};

/// Sign in and load the collection, failing when either step does.
pub async fn signed_in(
    ctx: &Ctx,
    credentials: &Credentials,
) -> Result<DashboardController, CliError> {
    let mut controller = ctx.controller();
    controller
        .login(&credentials.email, &credentials.password)
        .await;

    let state = controller.state();
    if state.screen != Screen::Dashboard {
        let reason = state
            .login
            .error
            .clone()
            .unwrap_or_else(|| "no session was established".to_string());
        return Err(CliError::SignIn(reason));
    }
    ensure_loaded(&controller)?;
    Ok(controller)
}

pub fn ensure_loaded(controller: &DashboardController) -> Result<(), CliError> {
    match &controller.state().list {
        ListState::Failed(message) => Err(CliError::Request(message.clone())),
        _ => Ok(()),
    }
}
