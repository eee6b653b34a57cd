use askama::Template;

use super::{AdminDeleteModalView, AdminLayout, AdminPostModalView, AdminPostTableView};
use crate::application::state::{AppState, ListState, Modal};
use crate::domain::posts::PostStats;

#[derive(Clone)]
pub struct AdminMetricView {
    pub label: String,
    pub value: usize,
    pub hint: Option<String>,
}

#[derive(Clone)]
pub struct AdminDashboardView {
    pub metrics: Vec<AdminMetricView>,
    pub loading: bool,
    pub error_banner: Option<String>,
    pub table: Option<AdminPostTableView>,
    pub post_modal: Option<AdminPostModalView>,
    pub delete_modal: Option<AdminDeleteModalView>,
    pub alert: Option<String>,
}

impl AdminDashboardView {
    pub fn from_state(state: &AppState) -> Self {
        let (loading, error_banner, table) = match &state.list {
            ListState::Loading => (true, None, None),
            ListState::Failed(message) => (false, Some(message.clone()), None),
            ListState::Idle | ListState::Ready => {
                (false, None, Some(AdminPostTableView::new(&state.posts)))
            }
        };
        let (post_modal, delete_modal) = match &state.modal {
            Modal::Closed => (None, None),
            Modal::PostEditor(editor) => (Some(AdminPostModalView::from_editor(editor)), None),
            Modal::DeleteConfirm(target) => {
                (None, Some(AdminDeleteModalView::from_target(target)))
            }
        };

        Self {
            metrics: metrics(&state.stats),
            loading,
            error_banner,
            table,
            post_modal,
            delete_modal,
            alert: state.alert.clone(),
        }
    }
}

fn metrics(stats: &PostStats) -> Vec<AdminMetricView> {
    let mut metrics = vec![
        AdminMetricView {
            label: "Total posts".to_string(),
            value: stats.total,
            hint: None,
        },
        AdminMetricView {
            label: "Available".to_string(),
            value: stats.available,
            hint: Some("Ready to sell".to_string()),
        },
        AdminMetricView {
            label: "On Hold".to_string(),
            value: stats.on_hold,
            hint: Some("Reserved for a buyer".to_string()),
        },
        AdminMetricView {
            label: "Sold".to_string(),
            value: stats.sold,
            hint: None,
        },
    ];
    if stats.other > 0 {
        metrics.push(AdminMetricView {
            label: "Other".to_string(),
            value: stats.other,
            hint: Some("Unrecognised status".to_string()),
        });
    }
    metrics
}

#[derive(Template)]
#[template(path = "admin/dashboard.txt")]
pub struct AdminDashboardTemplate {
    pub view: AdminLayout<AdminDashboardView>,
}
