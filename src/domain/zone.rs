use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::{is_blank, null_as_default};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Reads a GeoJSON point (`[lng, lat]`), `{latitude, longitude}` or
    /// `{lat, lng}`. Anything else is `None`.
    pub fn from_json(raw: &Value) -> Option<Self> {
        if let Some([lng, lat]) = raw.get("coordinates").and_then(Value::as_array).map(Vec::as_slice) {
            return Some(Self { latitude: lat.as_f64()?, longitude: lng.as_f64()? });
        }
        let lat = raw.get("latitude").or_else(|| raw.get("lat"))?.as_f64()?;
        let lng = raw.get("longitude").or_else(|| raw.get("lng"))?.as_f64()?;
        Some(Self { latitude: lat, longitude: lng })
    }
}

fn coordinates_any_shape<'de, D>(deserializer: D) -> Result<Option<Coordinates>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(Coordinates::from_json))
}

/// A delivery zone.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Zone {
    #[serde(rename = "_id")]
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub zone_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub pincodes: Vec<String>,
    pub service_radius: Option<f64>,
    #[serde(deserialize_with = "coordinates_any_shape")]
    pub coordinates: Option<Coordinates>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDraft {
    pub zone_name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincodes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl ZoneDraft {
    pub fn validate(&self) -> Result<(), String> {
        if is_blank(&self.zone_name) || is_blank(&self.city) || is_blank(&self.state) {
            return Err("Zone name, city and state are required".to_string());
        }
        if self.pincodes.is_empty() {
            return Err("Add at least one pincode".to_string());
        }
        if let Some(bad) = self.pincodes.iter().find(|p| p.len() != 6 || !p.bytes().all(|b| b.is_ascii_digit())) {
            return Err(format!("Invalid pincode: {}", bad));
        }
        if self.service_radius.is_some_and(|r| r <= 0.0) {
            return Err("Service radius must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Splits a comma separated pincode field as typed into the form.
    pub fn parse_pincodes(input: &str) -> Vec<String> {
        input.split(',').map(str::trim).filter(|p| !p.is_empty()).map(str::to_string).collect()
    }
}
