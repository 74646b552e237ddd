//! Domain records for the wallet API.
//!
//! # Design
//! Response records are deliberately forgiving: every field is optional or
//! defaulted and scalar fields go through `coerce`, because the records only
//! mirror whatever the server returned. Request payloads (`New*`, `*Update`)
//! are strict and are validated before a request is built.

mod location;
mod pass;
mod project;
mod tag;
mod template;

use std::fmt;

pub use location::{AttachedLocation, Location};
pub use pass::Pass;
pub use project::{NewProject, Project, ProjectUpdate};
pub use tag::Tag;
pub use template::{NewTemplate, Template, TemplateHeader, TemplateUpdate};

use crate::error::{ApiError, Result};

/// Addresses a resource either by its server-assigned numeric id or by the
/// caller-assigned external id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceId {
    Id(i64),
    External(String),
}

impl ResourceId {
    /// The path segment for this id: `"42"` or `"id/<percent-encoded>"`.
    pub fn path_segment(&self) -> Result<String> {
        match self {
            ResourceId::Id(id) => Ok(id.to_string()),
            ResourceId::External(external) => {
                Ok(format!("id/{}", encode_external_id(external)?))
            }
        }
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        ResourceId::Id(id)
    }
}

impl From<&str> for ResourceId {
    fn from(external: &str) -> Self {
        ResourceId::External(external.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(external: String) -> Self {
        ResourceId::External(external)
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(id: &ResourceId) -> Self {
        id.clone()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Id(id) => write!(f, "{id}"),
            ResourceId::External(external) => write!(f, "external id {external:?}"),
        }
    }
}

/// Percent-encode an external id for use as a single path segment.
pub(crate) fn encode_external_id(external: &str) -> Result<String> {
    if external.trim().is_empty() {
        return Err(ApiError::InvalidParameter("external id must not be empty"));
    }
    Ok(urlencoding::encode(external).into_owned())
}

/// One page of a listing. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page_size: u32,
    pub page: u32,
}

impl Page {
    pub fn new(page_size: u32, page: u32) -> Self {
        Self { page_size, page }
    }

    pub(crate) fn query(&self) -> Result<String> {
        if self.page_size == 0 {
            return Err(ApiError::InvalidParameter("page size must be at least 1"));
        }
        if self.page == 0 {
            return Err(ApiError::InvalidParameter("pages are numbered from 1"));
        }
        Ok(format!("?pageSize={}&page={}", self.page_size, self.page))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page_size: 10,
            page: 1,
        }
    }
}

/// Fail with `InvalidParameter` when a required string is empty.
pub(crate) fn require(value: &str, message: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidParameter(message));
    }
    Ok(())
}
