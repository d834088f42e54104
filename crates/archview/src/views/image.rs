//! Views that show a pre-rendered image instead of model content

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{ViewError, ViewResult};

/// An image attached to the workspace, optionally about one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    key: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    generated_key: bool,
    order: u32,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    element_id: Option<String>,
    /// A URL, a file path or a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
}

impl ImageView {
    pub(crate) fn new(key: String, generated_key: bool, order: u32, element_id: Option<&str>) -> Self {
        Self {
            key,
            generated_key,
            order,
            title: String::new(),
            description: String::new(),
            element_id: element_id.map(str::to_string),
            content: None,
            content_type: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_generated_key(&self) -> bool {
        self.generated_key
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn element_id(&self) -> Option<&str> {
        self.element_id.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Set the content, detecting its type from a data URI or file extension
    pub fn set_content(&mut self, content: &str) -> ViewResult<()> {
        let content_type = detect_content_type(content).ok_or_else(|| {
            ViewError::invalid_argument(format!(
                "The content type of {} could not be determined; only PNG, JPG, SVG and GIF images are supported.",
                content
            ))
        })?;
        self.set_content_with_type(content, &content_type)
    }

    /// Set the content with an explicit content type
    pub fn set_content_with_type(&mut self, content: &str, content_type: &str) -> ViewResult<()> {
        if content.trim().is_empty() {
            return Err(ViewError::invalid_argument("Image content must be specified."));
        }
        if content_type.trim().is_empty() {
            return Err(ViewError::invalid_argument("A content type must be specified."));
        }
        self.content = Some(content.to_string());
        self.content_type = Some(content_type.to_string());
        Ok(())
    }
}

/// Detect an image content type from a data URI or a file extension
pub fn detect_content_type(content: &str) -> Option<String> {
    let content = content.trim();
    if let Some(rest) = content.strip_prefix("data:") {
        let end = rest.find(|c| c == ';' || c == ',')?;
        let media_type = &rest[..end];
        return media_type
            .starts_with("image/")
            .then(|| media_type.to_string());
    }

    let path = content.split(['?', '#']).next().unwrap_or(content);
    let extension = path.rsplit_once('.')?.1.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "gif" => "image/gif",
        _ => return None,
    };
    Some(content_type.to_string())
}
