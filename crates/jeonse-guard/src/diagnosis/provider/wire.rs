//! JSON shapes returned by V-World and the single place where missing or
//! oddly typed fields are given their defaults.

use serde::Deserialize;
use serde_json::Value;

use super::{
    aggregate, ParcelId, ParcelLookup, PriceLookup, PriceRecord, ProviderError,
    UNKNOWN_BUILDING_LABEL,
};

const STATUS_OK: &str = "OK";
const STATUS_NOT_FOUND: &str = "NOT_FOUND";

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    result: Option<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PriceEnvelope {
    #[serde(rename = "apartHousingPrices", default)]
    apart_housing_prices: Option<PriceBlock>,
}

#[derive(Debug, Deserialize)]
struct PriceBlock {
    #[serde(default)]
    field: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<PriceRow>),
    One(PriceRow),
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "pblntfPc", default)]
    price: Option<Value>,
    #[serde(rename = "prvuseAr", default)]
    area: Option<Value>,
    #[serde(rename = "aphusNm", default)]
    name: Option<Value>,
}

impl From<PriceRow> for PriceRecord {
    fn from(row: PriceRow) -> Self {
        Self {
            building_name: text_or(row.name, UNKNOWN_BUILDING_LABEL),
            assessed_price: integer_or_zero(row.price),
            exclusive_area: float_or_zero(row.area),
        }
    }
}

fn integer_or_zero(value: Option<Value>) -> i64 {
    match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(raw)) => {
            let raw = raw.trim().replace(',', "");
            raw.parse::<i64>()
                .ok()
                .or_else(|| {
                    raw.parse::<f64>()
                        .ok()
                        .filter(|float| float.is_finite())
                        .map(|float| float.trunc() as i64)
                })
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn float_or_zero(value: Option<Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|float| float.is_finite()).unwrap_or(0.0)
}

fn text_or(value: Option<Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => fallback.to_string(),
    }
}

pub(super) fn interpret_search(body: &[u8]) -> ParcelLookup {
    let envelope: SearchEnvelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(err) => return ParcelLookup::Failed(ProviderError::Malformed(err.to_string())),
    };

    let SearchResponse { status, result } = envelope.response;
    match status.as_str() {
        STATUS_OK => {}
        STATUS_NOT_FOUND => return ParcelLookup::NotFound,
        _ => return ParcelLookup::Failed(ProviderError::Rejected { status }),
    }

    let Some(first) = result.and_then(|result| result.items.into_iter().next()) else {
        return ParcelLookup::NotFound;
    };

    match first.id {
        Some(Value::String(id)) if !id.trim().is_empty() => {
            ParcelLookup::Resolved(ParcelId(id.trim().to_string()))
        }
        Some(Value::Number(id)) => ParcelLookup::Resolved(ParcelId(id.to_string())),
        _ => ParcelLookup::Failed(ProviderError::Malformed(
            "first search item has no id".to_string(),
        )),
    }
}

pub(super) fn interpret_price(body: &[u8]) -> PriceLookup {
    let envelope: PriceEnvelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(err) => return PriceLookup::Failed(ProviderError::Malformed(err.to_string())),
    };

    let rows = match envelope.apart_housing_prices.and_then(|block| block.field) {
        Some(OneOrMany::Many(rows)) => rows,
        Some(OneOrMany::One(row)) => vec![row],
        None => return PriceLookup::NoData,
    };

    let records: Vec<PriceRecord> = rows.into_iter().map(PriceRecord::from).collect();
    match aggregate(&records) {
        Some(quote) => PriceLookup::Found(quote),
        None => PriceLookup::NoData,
    }
}
