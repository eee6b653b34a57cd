use crate::application::state::{DeleteTarget, PostEditor};

#[derive(Clone)]
pub struct AdminPostModalView {
    pub title: String,
    pub post_id: String,
    pub platform: String,
    pub country: String,
    pub status: String,
    pub current_image: Option<String>,
    pub submit_label: String,
}

impl AdminPostModalView {
    pub fn from_editor(editor: &PostEditor) -> Self {
        let submit_label = if editor.saving {
            "Saving..."
        } else {
            "Save Post"
        };
        Self {
            title: editor.title().to_string(),
            post_id: editor.form.post_id.clone(),
            platform: editor.form.platform.clone(),
            country: editor.form.country.clone(),
            status: editor.form.status.to_string(),
            current_image: editor.current_image.clone(),
            submit_label: submit_label.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AdminDeleteModalView {
    pub id: i64,
    pub post_id: String,
    pub confirm_label: String,
}

impl AdminDeleteModalView {
    pub fn from_target(target: &DeleteTarget) -> Self {
        let confirm_label = if target.deleting {
            "Deleting..."
        } else {
            "Delete"
        };
        Self {
            id: target.id,
            post_id: target.post_id.clone(),
            confirm_label: confirm_label.to_string(),
        }
    }
}
