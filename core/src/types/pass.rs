use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::{lenient_i64, lenient_map, lenient_string};

/// A single wallet pass instance, created against a template.
///
/// `fields` holds the per-pass field values keyed by field name, in the shape
/// the template's fields model uses. `headers` holds the pass-level header
/// values returned by API revision 1.1 and later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pass {
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub fields: Map<String, Value>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub headers: Map<String, Value>,
}
