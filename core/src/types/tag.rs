use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coerce::{lenient_datetime, lenient_i64, lenient_string};

/// A caller-defined label grouping passes for bulk operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
