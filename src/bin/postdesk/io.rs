#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use postdesk::domain::forms::{ImageUpload, PostForm};
use postdesk::domain::posts::PostStatus;

use crate::args::PostFieldArgs;
use crate::client::CliError;

/// Read an image from disk and validate its extension.
pub async fn load_image(path: &Path) -> Result<ImageUpload, CliError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CliError::InvalidInput(format!("no file name in {}", path.display())))?;
    Ok(ImageUpload::new(file_name, bytes)?)
}

pub async fn load_optional_image(path: Option<&Path>) -> Result<Option<ImageUpload>, CliError> {
    match path {
        Some(path) => load_image(path).await.map(Some),
        None => Ok(None),
    }
}

/// Overlay the supplied fields onto `base`; omitted fields keep their value.
pub fn merge_fields(mut base: PostForm, fields: &PostFieldArgs) -> PostForm {
    if let Some(post_id) = fields.post_id.as_ref() {
        base.post_id = post_id.clone();
    }
    if let Some(platform) = fields.platform.as_ref() {
        base.platform = platform.clone();
    }
    if let Some(country) = fields.country.as_ref() {
        base.country = country.clone();
    }
    if let Some(status) = fields.status {
        base.status = PostStatus::from(status);
    }
    base
}
