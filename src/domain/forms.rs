//! Editor input collected before a create or update request.

use super::error::DomainError;
use super::posts::{Post, PostStatus};

const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub post_id: String,
    pub platform: String,
    pub country: String,
    pub status: PostStatus,
}

impl PostForm {
    /// Pre-fill the editor from a cached post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            post_id: post.post_id.clone(),
            platform: post.platform.clone(),
            country: post.country.clone(),
            status: post.status.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let missing = [
            ("post ID", &self.post_id),
            ("platform", &self.platform),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// An image file attached to a post submission.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, DomainError> {
        let file_name = file_name.into();
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| {
                DomainError::validation(format!("Unsupported image file `{file_name}`"))
            })?;
        let content_type = mime_guess::from_ext(&extension)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything sent to the backend for one create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSubmission {
    pub form: PostForm,
    pub image: Option<ImageUpload>,
}
