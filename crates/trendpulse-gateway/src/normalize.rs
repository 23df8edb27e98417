//! Normalization from raw backend JSON to canonical entities.
//!
//! Upstream rows are loosely shaped: the same quantity may arrive under
//! several names (`velocity`, `mentions`, `value`), numbers may be strings,
//! fields may be missing. Each record is coerced field by field; absent
//! strings default to `""` and absent numbers to `0`. A record that cannot
//! be coerced yields a [`MalformedEntryError`] and is skipped. A body whose
//! top-level shape is wrong fails the whole source with
//! [`FetchError::Malformed`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use trendpulse_core::{
    HashtagAggregate, Signal, SignalSource, SkuMapping, SocialPost, SourceKey, TrendKeyword,
};

use crate::error::{FetchError, MalformedEntryError};
use crate::payload::{SocialFeed, SourcePayload, TrendsSnapshot};

type Record = Map<String, Value>;

/// Validates the top-level shape of `raw` for `key` and normalizes every
/// record in it.
///
/// # Errors
///
/// Returns [`FetchError::Malformed`] if the body does not have the shape the
/// source feeds (e.g. an object where an array is expected).
pub fn parse_payload(key: SourceKey, raw: &Value) -> Result<SourcePayload, FetchError> {
    match key {
        SourceKey::Signals | SourceKey::GoogleSignals => {
            let items = expect_array(key, raw, "body")?;
            Ok(SourcePayload::Signals(parse_records(
                key,
                items,
                parse_signal,
            )))
        }
        SourceKey::Social => {
            let body = expect_object(key, raw)?;
            let rows = body
                .get("rows")
                .ok_or_else(|| malformed(key, "missing 'rows' array"))
                .and_then(|v| expect_array(key, v, "rows"))?;
            let top_hashtags = optional_array(key, body, "top_hashtags")?;
            Ok(SourcePayload::Social(SocialFeed {
                rows: parse_records(key, rows, parse_social_post),
                top_hashtags: parse_records(key, top_hashtags, parse_hashtag_aggregate),
            }))
        }
        SourceKey::SkuMappings => {
            let items = expect_array(key, raw, "body")?;
            Ok(SourcePayload::SkuMappings(parse_records(
                key,
                items,
                parse_sku_mapping,
            )))
        }
        SourceKey::Trends => {
            let body = expect_object(key, raw)?;
            let sources = optional_array(key, body, "signal_sources")?;
            let keywords = optional_array(key, body, "trend_keywords")?;
            Ok(SourcePayload::Trends(TrendsSnapshot {
                signal_sources: parse_records(key, sources, parse_signal_source),
                trend_keywords: parse_records(key, keywords, parse_trend_keyword),
            }))
        }
    }
}

/// # Errors
///
/// Returns [`MalformedEntryError`] if `item` is not an object or a numeric
/// field is non-numeric or negative.
pub fn parse_signal(index: usize, item: &Value) -> Result<Signal, MalformedEntryError> {
    let record = as_record(index, item)?;
    Ok(Signal {
        id: text(record, &["id"]),
        sku: text(record, &["sku"]),
        source: text(record, &["source", "platform"]),
        velocity: count(index, record, &["velocity", "mentions", "value"])?,
        keyword: text(record, &["keyword", "hashtag"]),
        timestamp: parse_timestamp(&text(record, &["timestamp"])),
        text: text(record, &["text", "post"]),
    })
}

/// # Errors
///
/// Returns [`MalformedEntryError`] if `item` is not an object or `mentions`
/// is non-numeric or negative.
pub fn parse_social_post(index: usize, item: &Value) -> Result<SocialPost, MalformedEntryError> {
    let record = as_record(index, item)?;
    Ok(SocialPost {
        post_id: text(record, &["post_id", "id"]),
        source: text(record, &["source", "platform"]),
        sku: optional_text(record, &["sku"]),
        hashtag: optional_text(record, &["hashtag", "tag"]),
        date: parse_timestamp(&text(record, &["date"])),
        text: text(record, &["text"]),
        mentions: count(index, record, &["mentions"])?,
    })
}

/// # Errors
///
/// Returns [`MalformedEntryError`] if `item` is not an object, carries
/// neither a SKU nor a title, or its score is outside `[0, 1]`.
pub fn parse_sku_mapping(index: usize, item: &Value) -> Result<SkuMapping, MalformedEntryError> {
    let record = as_record(index, item)?;
    let sku = text(record, &["sku"]);
    let title = text(record, &["title", "name"]);
    if sku.is_empty() && title.is_empty() {
        return Err(entry_error(index, "missing both sku and title"));
    }
    let score = number(index, record, &["score"])?.unwrap_or(0.0);
    if !(0.0..=1.0).contains(&score) {
        return Err(entry_error(index, format!("score {score} outside [0, 1]")));
    }
    Ok(SkuMapping { sku, title, score })
}

/// # Errors
///
/// Returns [`MalformedEntryError`] if `item` is not an object, has no
/// keyword, or a numeric field is non-numeric.
pub fn parse_trend_keyword(
    index: usize,
    item: &Value,
) -> Result<TrendKeyword, MalformedEntryError> {
    let record = as_record(index, item)?;
    let keyword = text(record, &["keyword", "hashtag"]);
    if keyword.is_empty() {
        return Err(entry_error(index, "missing keyword"));
    }
    Ok(TrendKeyword {
        keyword,
        mentions: count(index, record, &["mentions"])?,
        change24: number(index, record, &["change24"])?.unwrap_or(0.0),
        change7: number(index, record, &["change7"])?.unwrap_or(0.0),
    })
}

/// # Errors
///
/// Returns [`MalformedEntryError`] if `item` is not an object, has no name,
/// or its mention count is non-numeric or negative.
pub fn parse_signal_source(
    index: usize,
    item: &Value,
) -> Result<SignalSource, MalformedEntryError> {
    let record = as_record(index, item)?;
    let name = text(record, &["name", "source"]);
    if name.is_empty() {
        return Err(entry_error(index, "missing name"));
    }
    Ok(SignalSource {
        name,
        mentions: count(index, record, &["mentions", "value"])?,
    })
}

fn parse_hashtag_aggregate(
    index: usize,
    item: &Value,
) -> Result<HashtagAggregate, MalformedEntryError> {
    let record = as_record(index, item)?;
    let hashtag = text(record, &["hashtag"]);
    if hashtag.is_empty() {
        return Err(entry_error(index, "missing hashtag"));
    }
    Ok(HashtagAggregate {
        hashtag,
        count: count(index, record, &["count"])?,
    })
}

/// Parses RFC 3339, naive ISO datetimes (assumed UTC), or bare dates
/// (midnight UTC). Anything else is treated as absent.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_records<T>(
    key: SourceKey,
    items: &[Value],
    parse: fn(usize, &Value) -> Result<T, MalformedEntryError>,
) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match parse(index, item) {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::debug!(source = %key, error = %e, "skipping malformed record");
                None
            }
        })
        .collect()
}

fn expect_array<'a>(
    key: SourceKey,
    value: &'a Value,
    field: &str,
) -> Result<&'a [Value], FetchError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| malformed(key, format!("expected '{field}' to be an array")))
}

fn expect_object(key: SourceKey, value: &Value) -> Result<&Record, FetchError> {
    value
        .as_object()
        .ok_or_else(|| malformed(key, "expected a JSON object"))
}

/// A missing or `null` field reads as empty; any other non-array is an error.
fn optional_array<'a>(
    key: SourceKey,
    body: &'a Record,
    field: &str,
) -> Result<&'a [Value], FetchError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(&[]),
        Some(value) => expect_array(key, value, field),
    }
}

fn as_record(index: usize, item: &Value) -> Result<&Record, MalformedEntryError> {
    item.as_object()
        .ok_or_else(|| entry_error(index, format!("expected object, got {}", type_name(item))))
}

/// First non-empty string among `keys`; numbers are rendered as text.
fn text(record: &Record, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| match record.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn optional_text(record: &Record, keys: &[&str]) -> Option<String> {
    let value = text(record, keys);
    (!value.is_empty()).then_some(value)
}

/// First non-null value among `keys`, coerced to a finite number. Numeric
/// strings are accepted; an empty string reads as `0`.
fn number(
    index: usize,
    record: &Record,
    keys: &[&str],
) -> Result<Option<f64>, MalformedEntryError> {
    for key in keys {
        let parsed = match record.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) if s.trim().is_empty() => Some(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(other) => {
                return Err(entry_error(
                    index,
                    format!("{key} must be numeric, got {}", type_name(other)),
                ));
            }
        };
        return match parsed {
            Some(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(entry_error(index, format!("{key} is not a finite number"))),
        };
    }
    Ok(None)
}

/// A mention/velocity count: defaults to `0`, must not be negative.
fn count(index: usize, record: &Record, keys: &[&str]) -> Result<f64, MalformedEntryError> {
    let value = number(index, record, keys)?.unwrap_or(0.0);
    if value < 0.0 {
        return Err(entry_error(
            index,
            format!("{} must not be negative, got {value}", keys[0]),
        ));
    }
    Ok(value)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn entry_error(index: usize, reason: impl Into<String>) -> MalformedEntryError {
    MalformedEntryError {
        index,
        reason: reason.into(),
    }
}

fn malformed(key: SourceKey, reason: impl Into<String>) -> FetchError {
    FetchError::Malformed {
        source_key: key,
        reason: reason.into(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
