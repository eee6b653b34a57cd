mod dashboard;
mod login;
mod modals;
mod posts;

pub use dashboard::{AdminDashboardTemplate, AdminDashboardView, AdminMetricView};
pub use login::{AdminLoginTemplate, AdminLoginView};
pub use modals::{AdminDeleteModalView, AdminPostModalView};
pub use posts::{AdminPostRowView, AdminPostTableView};

const BRAND_TITLE: &str = "postdesk admin";

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub brand: String,
    pub user_email: String,
    pub version: String,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(user_email: Option<String>, content: T) -> Self {
        Self {
            brand: BRAND_TITLE.to_string(),
            user_email: user_email.unwrap_or_default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            content,
        }
    }
}
