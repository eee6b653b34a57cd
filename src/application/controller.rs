//! Session-gated dashboard controller.
//!
//! Every user action maps onto one method. Methods that talk to the network
//! re-read the session first; a missing session sends the view back to the
//! login screen. Mutations never patch the cached list: a successful create,
//! update or delete is followed by a full re-fetch.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::ports::{AuthEvent, ClientError, IdentityProvider, PostsApi, Session};
use crate::application::state::{AppState, DeleteTarget, ListState, Modal, PostEditor, Screen};
use crate::domain::error::DomainError;
use crate::domain::forms::{ImageUpload, PostForm, PostSubmission};

const SAVE_FAILURE_PREFIX: &str = "Failed to save post";
const DELETE_FAILURE_PREFIX: &str = "Failed to delete post";
const LOAD_FAILURE_PREFIX: &str = "Failed to load posts";

pub struct DashboardController {
    identity: Arc<dyn IdentityProvider>,
    api: Arc<dyn PostsApi>,
    state: AppState,
}

impl DashboardController {
    pub fn new(identity: Arc<dyn IdentityProvider>, api: Arc<dyn PostsApi>) -> Self {
        Self {
            identity,
            api,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Decide between login and dashboard based on the current session.
    pub async fn start(&mut self) {
        match self.identity.session().await {
            Ok(Some(session)) => {
                debug!(email = ?session.email, "existing session found");
                self.state.show_dashboard(session.email);
                self.refresh().await;
            }
            Ok(None) => self.state.show_login(),
            Err(err) => {
                warn!(error = %err, "session check failed");
                self.state.show_login();
            }
        }
    }

    /// A signed-out notice may be stale by the time it is handled, so the
    /// session is checked again before leaving the dashboard.
    pub async fn handle_auth_event(&mut self, event: AuthEvent) {
        debug!(?event, "auth state changed");
        if event != AuthEvent::SignedOut {
            return;
        }
        if self.gate().await.is_some() && !self.on_dashboard() {
            self.refresh().await;
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) {
        if self.state.screen == Screen::Dashboard || self.state.login.submitting {
            return;
        }

        self.state.screen = Screen::LoggingIn;
        self.state.login.email = email.to_string();
        self.state.login.error = None;
        self.state.login.submitting = true;

        match self.identity.sign_in_with_password(email, password).await {
            Ok(session) => {
                info!(email = ?session.email, "signed in");
                let email = session.email.or_else(|| Some(email.to_string()));
                self.state.show_dashboard(email);
                self.refresh().await;
            }
            Err(err) => {
                warn!(error = %err, "sign-in failed");
                self.state.screen = Screen::LoggedOut;
                self.state.login.submitting = false;
                self.state.login.error = Some(err.to_string());
            }
        }
    }

    pub async fn logout(&mut self) {
        if self.state.screen != Screen::Dashboard {
            return;
        }
        match self.identity.sign_out().await {
            Ok(()) => {
                info!("signed out");
                self.state.show_login();
            }
            Err(err) => warn!(error = %err, "sign-out failed"),
        }
    }

    /// Re-fetch the full collection and replace the cache.
    pub async fn refresh(&mut self) {
        let Some(session) = self.gate().await else {
            return;
        };
        if !self.on_dashboard() {
            self.state.show_dashboard(session.email.clone());
        }

        self.state.list = ListState::Loading;
        match self.api.list_posts(&session.access_token).await {
            Ok(posts) => {
                debug!(count = posts.len(), "posts loaded");
                self.state.replace_posts(posts);
            }
            Err(err) => {
                warn!(error = %err, "loading posts failed");
                self.state.list =
                    ListState::Failed(format!("{LOAD_FAILURE_PREFIX}: {}", err.read_detail()));
            }
        }
    }

    pub fn open_create(&mut self) {
        if !self.on_dashboard() {
            return;
        }
        self.state.modal = Modal::PostEditor(PostEditor {
            editing_id: None,
            form: PostForm::default(),
            current_image: None,
            saving: false,
        });
    }

    pub fn open_edit(&mut self, id: i64) {
        if !self.on_dashboard() {
            return;
        }
        let Some(post) = self.state.find_post(id) else {
            self.state.alert = Some(DomainError::not_found("Post", id).to_string());
            return;
        };
        let editor = PostEditor {
            editing_id: Some(post.id),
            form: PostForm::from_post(post),
            current_image: post.image_url.clone().filter(|url| !url.is_empty()),
            saving: false,
        };
        self.state.modal = Modal::PostEditor(editor);
    }

    /// Submit the open editor with the given field values.
    pub async fn submit_post(&mut self, form: PostForm, image: Option<ImageUpload>) {
        let Modal::PostEditor(editor) = &mut self.state.modal else {
            return;
        };
        if editor.saving {
            return;
        }
        editor.form = form.clone();
        editor.saving = true;
        let editing_id = editor.editing_id;

        let submission = PostSubmission { form, image };
        match self.save(editing_id, submission).await {
            Ok(()) => {
                self.state.modal = Modal::Closed;
                self.refresh().await;
            }
            Err(ClientError::NotAuthenticated) => self.state.show_login(),
            Err(err) => {
                warn!(error = %err, ?editing_id, "saving post failed");
                if let Modal::PostEditor(editor) = &mut self.state.modal {
                    editor.saving = false;
                }
                self.state.alert = Some(format!(
                    "{SAVE_FAILURE_PREFIX}: {}",
                    err.mutation_detail(SAVE_FAILURE_PREFIX)
                ));
            }
        }
    }

    /// Surface input rejected before any request was built, such as an
    /// unsupported image file. The editor stays open.
    pub fn reject_submission(&mut self, err: &DomainError) {
        if matches!(self.state.modal, Modal::PostEditor(_)) {
            self.state.alert = Some(format!("{SAVE_FAILURE_PREFIX}: {err}"));
        }
    }

    async fn save(
        &self,
        editing_id: Option<i64>,
        submission: PostSubmission,
    ) -> Result<(), ClientError> {
        submission.form.validate()?;
        let token = self.token().await?;
        let saved = match editing_id {
            Some(id) => self.api.update_post(&token, id, submission).await?,
            None => self.api.create_post(&token, submission).await?,
        };
        info!(id = saved.id, post_id = %saved.post_id, "post saved");
        Ok(())
    }

    /// Ask for confirmation before deleting; nothing is sent yet.
    pub fn open_delete(&mut self, id: i64) {
        if !self.on_dashboard() {
            return;
        }
        let Some(post) = self.state.find_post(id) else {
            self.state.alert = Some(DomainError::not_found("Post", id).to_string());
            return;
        };
        let target = DeleteTarget {
            id: post.id,
            post_id: post.post_id.clone(),
            deleting: false,
        };
        self.state.modal = Modal::DeleteConfirm(target);
    }

    pub async fn confirm_delete(&mut self) {
        let Modal::DeleteConfirm(target) = &mut self.state.modal else {
            return;
        };
        if target.deleting {
            return;
        }
        target.deleting = true;
        let id = target.id;

        match self.delete(id).await {
            Ok(()) => {
                info!(id, "post deleted");
                self.state.modal = Modal::Closed;
                self.refresh().await;
            }
            Err(ClientError::NotAuthenticated) => self.state.show_login(),
            Err(err) => {
                warn!(error = %err, id, "deleting post failed");
                if let Modal::DeleteConfirm(target) = &mut self.state.modal {
                    target.deleting = false;
                }
                self.state.alert = Some(format!(
                    "{DELETE_FAILURE_PREFIX}: {}",
                    err.mutation_detail(DELETE_FAILURE_PREFIX)
                ));
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let token = self.token().await?;
        self.api.delete_post(&token, id).await
    }

    /// Cancel or backdrop dismissal: close whichever modal is open.
    pub fn dismiss(&mut self) {
        self.state.modal = Modal::Closed;
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.state.alert.take()
    }

    fn on_dashboard(&self) -> bool {
        self.state.screen == Screen::Dashboard
    }

    async fn token(&self) -> Result<String, ClientError> {
        match self.identity.session().await? {
            Some(session) => Ok(session.access_token),
            None => Err(ClientError::NotAuthenticated),
        }
    }

    /// Fetch the session, or fall back to the login view without one.
    async fn gate(&mut self) -> Option<Session> {
        match self.identity.session().await {
            Ok(Some(session)) => Some(session),
            Ok(None) => {
                debug!("no session; showing login");
                self.state.show_login();
                None
            }
            Err(err) => {
                warn!(error = %err, "session lookup failed");
                self.state.show_login();
                None
            }
        }
    }
}
