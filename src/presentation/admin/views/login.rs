use askama::Template;

use crate::application::state::{AppState, Screen};

#[derive(Clone)]
pub struct AdminLoginView {
    pub email: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl AdminLoginView {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            email: state.login.email.clone(),
            error: state.login.error.clone(),
            submitting: state.login.submitting || state.screen == Screen::LoggingIn,
        }
    }
}

#[derive(Template)]
#[template(path = "admin/login.txt")]
pub struct AdminLoginTemplate {
    pub view: AdminLoginView,
}
