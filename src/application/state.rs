//! Application state owned by [`crate::application::controller::DashboardController`].

use crate::domain::forms::PostForm;
use crate::domain::posts::{Post, PostStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    LoggedOut,
    LoggingIn,
    Dashboard,
}

/// Node of the view-level state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    LoggedOut,
    LoggingIn,
    Dashboard,
    PostModalOpen,
    DeleteModalOpen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEditor {
    /// Backend identifier of the post being edited; `None` creates a new post.
    pub editing_id: Option<i64>,
    pub form: PostForm,
    pub current_image: Option<String>,
    pub saving: bool,
}

impl PostEditor {
    pub fn title(&self) -> &'static str {
        if self.editing_id.is_some() {
            "Edit Post"
        } else {
            "Add New Post"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: i64,
    pub post_id: String,
    pub deleting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Closed,
    PostEditor(PostEditor),
    DeleteConfirm(DeleteTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: Screen,
    pub user_email: Option<String>,
    pub login: LoginForm,
    pub posts: Vec<Post>,
    pub stats: PostStats,
    pub list: ListState,
    pub modal: Modal,
    pub alert: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::LoggedOut,
            user_email: None,
            login: LoginForm::default(),
            posts: Vec::new(),
            stats: PostStats::default(),
            list: ListState::Idle,
            modal: Modal::Closed,
            alert: None,
        }
    }
}

impl AppState {
    pub fn view(&self) -> ViewState {
        match (self.screen, &self.modal) {
            (Screen::LoggedOut, _) => ViewState::LoggedOut,
            (Screen::LoggingIn, _) => ViewState::LoggingIn,
            (Screen::Dashboard, Modal::Closed) => ViewState::Dashboard,
            (Screen::Dashboard, Modal::PostEditor(_)) => ViewState::PostModalOpen,
            (Screen::Dashboard, Modal::DeleteConfirm(_)) => ViewState::DeleteModalOpen,
        }
    }

    pub fn editor(&self) -> Option<&PostEditor> {
        match &self.modal {
            Modal::PostEditor(editor) => Some(editor),
            _ => None,
        }
    }

    pub fn delete_target(&self) -> Option<&DeleteTarget> {
        match &self.modal {
            Modal::DeleteConfirm(target) => Some(target),
            _ => None,
        }
    }

    pub fn find_post(&self, id: i64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// Replace the cached collection wholesale and recompute its stats.
    pub(crate) fn replace_posts(&mut self, posts: Vec<Post>) {
        self.stats = PostStats::from_posts(&posts);
        self.posts = posts;
        self.list = ListState::Ready;
    }

    /// Reset to the login view, dropping everything tied to the old session.
    pub(crate) fn show_login(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn show_dashboard(&mut self, email: Option<String>) {
        self.screen = Screen::Dashboard;
        self.user_email = email;
        self.login = LoginForm::default();
    }
}
