//! CAP alert records as served by the PAGASA alert feed, plus the
//! per-municipality record the pipeline emits.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One alert record, received as-is and never mutated.
///
/// Most text fields are populated inconsistently upstream (absent, `null`
/// or empty depending on the bulletin source), so they all read as `""`
/// when missing.  Only `identifier` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAlert {
    pub identifier: String,
    #[serde(default, deserialize_with = "nullable")]
    pub event: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub subtype: String,
    #[serde(default, deserialize_with = "nullable")]
    pub headline: String,
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
    #[serde(default, deserialize_with = "nullable")]
    pub optional_message: String,
    #[serde(default, deserialize_with = "nullable")]
    pub issued_date: String,
    #[serde(default, deserialize_with = "nullable")]
    pub valid_date: String,
    #[serde(default, deserialize_with = "nullable")]
    pub published_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expecting_intensity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_systems: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon_color: Option<String>,
    #[serde(default)]
    pub provinces: Provinces,
}

impl RawAlert {
    /// Free text the extractor reads: `message`, or `generated_message`
    /// when the former is empty.
    pub fn bulletin_text(&self) -> &str {
        if !self.message.is_empty() {
            return &self.message;
        }
        self.generated_message.as_deref().unwrap_or("")
    }

    pub fn generated_text(&self) -> &str {
        self.generated_message.as_deref().unwrap_or("")
    }
}

/// Province detail entry inside `provinces`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvinceDetail {
    #[serde(default, deserialize_with = "nullable")]
    pub province: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psgc_code: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "areaDesc", default, skip_serializing_if = "Option::is_none")]
    pub area_desc: Option<String>,
}

/// The `provinces` mapping.  Keys are arbitrary; entries keep document
/// order because municipality insertion order follows it.
///
/// Upstream sometimes sends an array instead of an object; array
/// positions become the keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Provinces(pub Vec<(String, ProvinceDetail)>);

impl Provinces {
    pub fn values(&self) -> impl Iterator<Item = &ProvinceDetail> {
        self.0.iter().map(|(_, detail)| detail)
    }
}

impl Serialize for Provinces {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, detail) in &self.0 {
            map.serialize_entry(key, detail)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Provinces {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProvincesVisitor;

        impl<'de> Visitor<'de> for ProvincesVisitor {
            type Value = Provinces;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map or list of province details")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Provinces, E> {
                Ok(Provinces::default())
            }

            fn visit_none<E: de::Error>(self) -> Result<Provinces, E> {
                Ok(Provinces::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Provinces, A::Error> {
                let mut entries = Vec::new();
                while let Some((key, detail)) = access.next_entry::<String, ProvinceDetail>()? {
                    entries.push((key, detail));
                }
                Ok(Provinces(entries))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Provinces, A::Error> {
                let mut entries = Vec::new();
                while let Some(detail) = access.next_element::<ProvinceDetail>()? {
                    entries.push((entries.len().to_string(), detail));
                }
                Ok(Provinces(entries))
            }
        }

        deserializer.deserialize_any(ProvincesVisitor)
    }
}

/// A RawAlert narrowed to a single municipality for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedAlert {
    #[serde(flatten)]
    pub alert: RawAlert,
    #[serde(rename = "municipalityName")]
    pub municipality_name: String,
}

fn nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
