use serde::{Deserialize, Deserializer, Serialize};

use crate::coerce::{lenient_i64, lenient_string};
use crate::error::{ApiError, Result};
use crate::types::{encode_external_id, require, Template};

/// An organizational grouping of templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, deserialize_with = "templates_or_empty")]
    pub templates: Vec<Template>,
}

fn templates_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Template>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Template>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload for creating a project.
///
/// A project may be created plain, under a caller-chosen external id, or
/// from an existing layout, but not both of the latter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub project_type: String,
    #[serde(default, skip_serializing)]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub layout_id: Option<i64>,
}

impl NewProject {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        project_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            project_type: project_type.into(),
            external_id: None,
            layout_id: None,
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn from_layout(mut self, layout_id: i64) -> Self {
        self.layout_id = Some(layout_id);
        self
    }

    /// Validate the payload and return the path under `/project`.
    pub(crate) fn path_suffix(&self) -> Result<String> {
        require(&self.project_type, "project type must not be empty")?;
        require(&self.name, "project name must not be empty")?;
        require(&self.description, "project description must not be empty")?;

        match (&self.external_id, self.layout_id) {
            (Some(_), Some(_)) => Err(ApiError::InvalidParameter(
                "a project is created from a layout or under an external id, not both",
            )),
            (None, Some(layout_id)) => Ok(format!("/{layout_id}")),
            (Some(external_id), None) => Ok(format!("/id/{}", encode_external_id(external_id)?)),
            (None, None) => Ok(String::new()),
        }
    }
}

/// Replacement name and description for an existing project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub name: String,
    pub description: String,
}

impl ProjectUpdate {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require(&self.name, "project name must not be empty")?;
        require(&self.description, "project description must not be empty")
    }
}
