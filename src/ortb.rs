//! The subset of the OpenRTB bid request that the endpoint understands, and the
//! acknowledgment it sends back.

use serde::{
    de::{self, IgnoredAny, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_json::{Map, Value};
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

/// Loosely-typed JSON object, kept verbatim.
pub type JsonObject = Map<String, Value>;

pub const SUCCESS_MESSAGE: &str = "Request processed successfully";

/// Decoding rules shared by the request and its impressions:
///
/// - only JSON objects (or `null`, which yields the zero value) are accepted;
/// - keys match declared fields regardless of ASCII case;
/// - a repeated key overwrites the earlier value;
/// - `null` leaves a scalar field untouched and clears a list or object field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BidRequest {
    pub id: String,
    /// Auction type.
    pub at: i64,
    /// Time budget for bids, in milliseconds.
    pub tmax: i64,
    pub imp: Vec<Impression>,
    pub site: Option<JsonObject>,
    pub device: Option<JsonObject>,
    pub user: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Impression {
    pub id: String,
    pub banner: Option<JsonObject>,
    pub tagid: String,
    pub bidfloor: f64,
    pub bidfloorcur: String,
}

impl BidRequest {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

fn set_unless_null<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl<'de> Deserialize<'de> for BidRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BidRequestVisitor)
    }
}

struct BidRequestVisitor;

impl<'de> Visitor<'de> for BidRequestVisitor {
    type Value = BidRequest;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a bid request object")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BidRequest::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut request = BidRequest::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.to_ascii_lowercase().as_str() {
                "id" => set_unless_null(&mut request.id, map.next_value()?),
                "at" => set_unless_null(&mut request.at, map.next_value()?),
                "tmax" => set_unless_null(&mut request.tmax, map.next_value()?),
                "imp" => {
                    request.imp = map
                        .next_value::<Option<Vec<Impression>>>()?
                        .unwrap_or_default()
                }
                "site" => request.site = map.next_value()?,
                "device" => request.device = map.next_value()?,
                "user" => {
                    // A null entry becomes an empty string rather than an error.
                    request.user = map
                        .next_value::<Option<HashMap<String, Option<String>>>>()?
                        .map(|user| {
                            user.into_iter()
                                .map(|(k, v)| (k, v.unwrap_or_default()))
                                .collect()
                        })
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(request)
    }
}

impl<'de> Deserialize<'de> for Impression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ImpressionVisitor)
    }
}

struct ImpressionVisitor;

impl<'de> Visitor<'de> for ImpressionVisitor {
    type Value = Impression;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an impression object")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Impression::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut imp = Impression::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.to_ascii_lowercase().as_str() {
                "id" => set_unless_null(&mut imp.id, map.next_value()?),
                "banner" => imp.banner = map.next_value()?,
                "tagid" => set_unless_null(&mut imp.tagid, map.next_value()?),
                "bidfloor" => set_unless_null(&mut imp.bidfloor, map.next_value()?),
                "bidfloorcur" => set_unless_null(&mut imp.bidfloorcur, map.next_value()?),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(imp)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_id: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub query_params: BTreeMap<String, String>,
    pub data: SummaryData,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub imp_count: usize,
    pub site: Option<JsonObject>,
    pub device: Option<JsonObject>,
}

impl SummaryResponse {
    pub fn acknowledge(request: &BidRequest, query_params: BTreeMap<String, String>) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            request_id: request.id.clone(),
            query_params,
            data: SummaryData {
                imp_count: request.imp.len(),
                site: request.site.clone(),
                device: request.device.clone(),
            },
        }
    }
}
