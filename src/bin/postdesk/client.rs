#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use postdesk::application::controller::DashboardController;
use postdesk::application::ports::{ClientError, IdentityProvider, PostsApi};
use postdesk::config::{self, LoadError, Settings};
use postdesk::domain::error::DomainError;
use postdesk::infra::api::HttpPostsApi;
use postdesk::infra::error::InfraError;
use postdesk::infra::identity::GoTrueIdentity;
use postdesk::infra::telemetry;
use postdesk::presentation::views::TemplateRenderError;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] LoadError),
    #[error("{0}")]
    Infra(#[from] InfraError),
    #[error("email is required (use --email or POSTDESK_EMAIL)")]
    MissingEmail,
    #[error("password is required (use --password-file or POSTDESK_PASSWORD)")]
    MissingPassword,
    #[error("failed to read password file: {0}")]
    PasswordFile(std::io::Error),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("sign-in failed: {0}")]
    SignIn(String),
    #[error("{0}")]
    Request(String),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Render(#[from] TemplateRenderError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

pub struct Ctx {
    pub settings: Settings,
    pub identity: Arc<dyn IdentityProvider>,
    pub api: Arc<dyn PostsApi>,
}

impl Ctx {
    pub fn new(settings: Settings) -> Result<Self, CliError> {
        let api = HttpPostsApi::new(settings.api.base_url.clone(), settings.api.timeout)?;
        let identity = GoTrueIdentity::new(&settings.identity, settings.api.timeout)?;
        Ok(Self {
            settings,
            identity: Arc::new(identity),
            api: Arc::new(api),
        })
    }

    pub fn controller(&self) -> DashboardController {
        DashboardController::new(Arc::clone(&self.identity), Arc::clone(&self.api))
    }
}

/// Load settings, install logging and build the service clients.
pub fn build_ctx_from_cli(cli: &Cli) -> Result<Ctx, CliError> {
    let settings = config::load(&cli.config)?;
    telemetry::init(&settings.logging)?;
    Ctx::new(settings)
}

/// Resolve one-shot credentials; a password file wins over the env var.
pub fn credentials_from_cli(cli: &Cli) -> Result<Credentials, CliError> {
    let email = cli
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or(CliError::MissingEmail)?
        .to_string();
    let password = read_password(cli.password_file.as_deref(), cli.password_env.as_deref())?;
    Ok(Credentials { email, password })
}

/// Credentials for the shell are optional; it prompts for them otherwise.
pub fn optional_credentials(cli: &Cli) -> Result<Option<Credentials>, CliError> {
    match credentials_from_cli(cli) {
        Ok(credentials) => Ok(Some(credentials)),
        Err(CliError::MissingEmail | CliError::MissingPassword) => Ok(None),
        Err(err) => Err(err),
    }
}

fn read_password(file: Option<&Path>, env: Option<&str>) -> Result<String, CliError> {
    if let Some(path) = file {
        let password = fs::read_to_string(path).map_err(CliError::PasswordFile)?;
        // Strip line endings only.
        let password = password.trim_end_matches(['\r', '\n']).to_string();
        if password.is_empty() {
            return Err(CliError::MissingPassword);
        }
        return Ok(password);
    }
    env.filter(|password| !password.is_empty())
        .map(str::to_string)
        .ok_or(CliError::MissingPassword)
}
