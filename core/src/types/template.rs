use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::{lenient_bool, lenient_datetime, lenient_i64, lenient_map, lenient_string};
use crate::error::{ApiError, Result};
use crate::types::{encode_external_id, require};

/// Summary attributes of a template.
///
/// Header keys the client does not model are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateHeader {
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub template_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_datetime", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub disabled: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub deleted: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A reusable pass layout. `fields_model` maps each field key to its
/// definition (value, label, change message, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "templateHeader", default)]
    pub header: TemplateHeader,
    #[serde(rename = "fieldsModel", default, deserialize_with = "lenient_map")]
    pub fields_model: Map<String, Value>,
}

impl Template {
    pub fn id(&self) -> Option<i64> {
        self.header.id
    }
}

/// Payload for creating a template.
///
/// `project_id` and `external_id` pick the endpoint and are not part of the
/// body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub template_type: String,
    #[serde(default)]
    pub headers: Map<String, Value>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default, skip_serializing)]
    pub project_id: Option<i64>,
    #[serde(default, skip_serializing)]
    pub external_id: Option<String>,
}

impl NewTemplate {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        template_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            template_type: template_type.into(),
            ..Self::default()
        }
    }

    pub fn in_project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_headers(mut self, headers: Map<String, Value>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_fields(mut self, fields: Map<String, Value>) -> Self {
        self.fields = fields;
        self
    }

    /// Validate the payload and return the path under `/template`.
    pub(crate) fn path_suffix(&self) -> Result<String> {
        require(&self.name, "template name must not be empty")?;
        require(&self.description, "template description must not be empty")?;
        require(&self.template_type, "template type must not be empty")?;

        let mut suffix = String::new();
        if let Some(project_id) = self.project_id {
            suffix.push_str(&format!("/{project_id}"));
        }
        if let Some(external_id) = &self.external_id {
            suffix.push_str(&format!("/id/{}", encode_external_id(external_id)?));
        }
        Ok(suffix)
    }
}

/// Partial template update; unset fields are left untouched on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
}

impl TemplateUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        let empty = self.name.is_none()
            && self.description.is_none()
            && self.template_type.is_none()
            && self.headers.is_none()
            && self.fields.is_none();
        if empty {
            return Err(ApiError::InvalidParameter("template update has no fields set"));
        }
        if let Some(name) = &self.name {
            require(name, "template name must not be empty")?;
        }
        if let Some(template_type) = &self.template_type {
            require(template_type, "template type must not be empty")?;
        }
        Ok(())
    }
}
