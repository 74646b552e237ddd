use serde::{Deserialize, Serialize};

use crate::coerce::lenient_i64;

/// A geofenced location that makes a pass relevant on the lock screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    pub fn with_relevant_text(mut self, text: impl Into<String>) -> Self {
        self.relevant_text = Some(text.into());
        self
    }
}

/// A location as stored on a pass or template, with the id needed to remove
/// it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedLocation {
    #[serde(
        rename = "passLocationId",
        alias = "locationId",
        alias = "templateLocationId",
        default,
        deserialize_with = "lenient_i64"
    )]
    pub location_id: Option<i64>,
    pub value: Location,
}
