use askama::{Error as AskamaError, Template};
use thiserror::Error;

use crate::application::state::{AppState, Screen};
use crate::presentation::admin::views::{
    AdminDashboardTemplate, AdminDashboardView, AdminLayout, AdminLoginTemplate, AdminLoginView,
};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }

    pub fn origin(&self) -> &'static str {
        self.source
    }
}

pub fn render_template<T: Template>(template: T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
    })
}

/// Render the whole screen for the given state. Pure: the same state always
/// produces the same text.
pub fn render_state(state: &AppState) -> Result<String, TemplateRenderError> {
    match state.screen {
        Screen::Dashboard => {
            let content = AdminDashboardView::from_state(state);
            render_template(AdminDashboardTemplate {
                view: AdminLayout::new(state.user_email.clone(), content),
            })
        }
        Screen::LoggedOut | Screen::LoggingIn => render_template(AdminLoginTemplate {
            view: AdminLoginView::from_state(state),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state::{DeleteTarget, ListState, Modal, PostEditor};
    use crate::domain::forms::PostForm;
    use crate::domain::posts::{Post, PostStats, PostStatus};

    fn post(id: i64, post_id: &str, country: &str, status: PostStatus) -> Post {
        Post {
            id,
            post_id: post_id.into(),
            platform: "eBay".into(),
            country: country.into(),
            status,
            image_url: None,
            created_at: "2024-01-01T09:30:00.000000".into(),
            updated_at: None,
        }
    }

    fn dashboard_state(posts: Vec<Post>) -> AppState {
        let mut state = AppState::default();
        state.show_dashboard(Some("admin@example.com".into()));
        state.replace_posts(posts);
        state
    }

    #[test]
    fn logged_out_state_renders_login_only() {
        let mut state = AppState::default();
        state.login.error = Some("Invalid login credentials".into());
        state.posts = vec![post(1, "SECRET-1", "US", PostStatus::Available)];

        let out = render_state(&state).expect("render");
        assert!(out.contains("Sign in"));
        assert!(out.contains("Invalid login credentials"));
        assert!(!out.contains("SECRET-1"));
    }

    #[test]
    fn dashboard_renders_rows_and_stats() {
        let state = dashboard_state(vec![
            post(1, "P1", "US", PostStatus::Available),
            post(2, "P2", "DE", PostStatus::Sold),
        ]);
        assert_eq!(
            state.stats,
            PostStats {
                total: 2,
                available: 1,
                on_hold: 0,
                sold: 1,
                other: 0
            }
        );

        let out = render_state(&state).expect("render");
        assert!(out.contains("admin@example.com"));
        assert!(out.contains("Total posts: 2"));
        assert!(out.contains("Available: 1"));
        assert!(out.contains("On Hold: 0"));
        assert!(out.contains("Sold: 1"));
        assert!(out.contains("P1"));
        assert!(out.contains("\u{1F1FA}\u{1F1F8} US"));
        assert!(out.contains("\u{1F30D} DE"));
        assert!(out.contains("[Sold]"));
        assert!(out.contains("2024-01-01"));
        assert!(out.contains("/api/placeholder/60/60"));
    }

    #[test]
    fn failed_read_hides_table() {
        let mut state = dashboard_state(vec![post(1, "P1", "US", PostStatus::Available)]);
        state.list = ListState::Failed("Failed to load posts: HTTP error! status: 500".into());

        let out = render_state(&state).expect("render");
        assert!(out.contains("Failed to load posts: HTTP error! status: 500"));
        assert!(!out.contains("P1"));
    }

    #[test]
    fn loading_state_hides_table() {
        let mut state = dashboard_state(vec![post(1, "P1", "US", PostStatus::Available)]);
        state.list = ListState::Loading;

        let out = render_state(&state).expect("render");
        assert!(out.contains("Loading posts"));
        assert!(!out.contains("P1"));
    }

    #[test]
    fn modals_and_alert_render_over_dashboard() {
        let mut state = dashboard_state(vec![post(4, "P4", "PK", PostStatus::OnHold)]);
        state.modal = Modal::PostEditor(PostEditor {
            editing_id: Some(4),
            form: PostForm::from_post(&state.posts[0]),
            current_image: Some("https://cdn.example/p4.png".into()),
            saving: true,
        });
        state.alert = Some("Failed to save post: invalid country".into());

        let out = render_state(&state).expect("render");
        assert!(out.contains("Edit Post"));
        assert!(out.contains("https://cdn.example/p4.png"));
        assert!(out.contains("Saving..."));
        assert!(out.contains("Failed to save post: invalid country"));

        state.modal = Modal::DeleteConfirm(DeleteTarget {
            id: 4,
            post_id: "P4".into(),
            deleting: false,
        });
        let out = render_state(&state).expect("render");
        assert!(out.contains("Delete post P4?"));
    }
}
