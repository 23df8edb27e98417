use chrono::{TimeZone, Utc};
use serde_json::json;

use super::*;

// ---------------------------------------------------------------------------
// parse_signal
// ---------------------------------------------------------------------------

#[test]
fn signal_reads_canonical_fields() {
    let item = json!({
        "id": 1,
        "sku": "GS-019",
        "source": "TikTok",
        "velocity": 42,
        "keyword": "#kettle",
        "timestamp": "2026-01-08T12:00:00Z"
    });
    let signal = parse_signal(0, &item).unwrap();
    assert_eq!(signal.id, "1");
    assert_eq!(signal.sku, "GS-019");
    assert_eq!(signal.source, "TikTok");
    assert!((signal.velocity - 42.0).abs() < f64::EPSILON);
    assert_eq!(signal.keyword, "#kettle");
    assert_eq!(
        signal.timestamp,
        Some(Utc.with_ymd_and_hms(2026, 1, 8, 12, 0, 0).unwrap())
    );
    assert_eq!(signal.text, "");
}

#[test]
fn signal_falls_back_to_alias_fields() {
    let item = json!({ "hashtag": "#mug", "mentions": "18", "platform": "Instagram", "post": "nice mug" });
    let signal = parse_signal(0, &item).unwrap();
    assert_eq!(signal.keyword, "#mug");
    assert!((signal.velocity - 18.0).abs() < f64::EPSILON);
    assert_eq!(signal.source, "Instagram");
    assert_eq!(signal.text, "nice mug");
}

#[test]
fn signal_empty_keyword_falls_through_to_hashtag() {
    let item = json!({ "keyword": "", "hashtag": "#lamp" });
    assert_eq!(parse_signal(0, &item).unwrap().keyword, "#lamp");
}

#[test]
fn signal_velocity_prefers_velocity_over_value() {
    let item = json!({ "velocity": 0, "value": 9 });
    assert!(parse_signal(0, &item).unwrap().velocity.abs() < f64::EPSILON);
}

#[test]
fn signal_null_velocity_falls_through_to_value() {
    let item = json!({ "velocity": null, "value": 9 });
    assert!((parse_signal(0, &item).unwrap().velocity - 9.0).abs() < f64::EPSILON);
}

#[test]
fn signal_with_missing_fields_defaults() {
    let signal = parse_signal(3, &json!({})).unwrap();
    assert_eq!(signal, Signal::default());
}

#[test]
fn signal_rejects_non_object() {
    let err = parse_signal(4, &json!("nope")).unwrap_err();
    assert_eq!(err.index, 4);
    assert!(err.reason.contains("string"), "unexpected reason: {}", err.reason);
}

#[test]
fn signal_rejects_non_numeric_velocity() {
    let err = parse_signal(0, &json!({ "velocity": "fast" })).unwrap_err();
    assert!(err.reason.contains("velocity"), "unexpected reason: {}", err.reason);
}

#[test]
fn signal_rejects_negative_velocity() {
    assert!(parse_signal(0, &json!({ "velocity": -3 })).is_err());
}

#[test]
fn signal_rejects_object_velocity() {
    assert!(parse_signal(0, &json!({ "velocity": { "n": 1 } })).is_err());
}

// ---------------------------------------------------------------------------
// parse_social_post / parse_sku_mapping / trends records
// ---------------------------------------------------------------------------

#[test]
fn social_post_optional_fields_are_none_when_empty() {
    let item = json!({ "post_id": "p1", "source": "TikTok", "sku": "", "mentions": 12 });
    let post = parse_social_post(0, &item).unwrap();
    assert_eq!(post.post_id, "p1");
    assert_eq!(post.sku, None);
    assert_eq!(post.hashtag, None);
    assert!((post.mentions - 12.0).abs() < f64::EPSILON);
}

#[test]
fn social_post_reads_tag_alias_and_bare_date() {
    let item = json!({ "tag": "#kettle", "date": "2026-01-08" });
    let post = parse_social_post(0, &item).unwrap();
    assert_eq!(post.hashtag.as_deref(), Some("#kettle"));
    assert_eq!(
        post.date,
        Some(Utc.with_ymd_and_hms(2026, 1, 8, 0, 0, 0).unwrap())
    );
}

#[test]
fn sku_mapping_requires_sku_or_title() {
    assert!(parse_sku_mapping(0, &json!({ "score": 0.5 })).is_err());
    let only_title = parse_sku_mapping(0, &json!({ "title": "Blender" })).unwrap();
    assert_eq!(only_title.title, "Blender");
    assert!(only_title.score.abs() < f64::EPSILON);
}

#[test]
fn sku_mapping_rejects_out_of_range_score() {
    let err = parse_sku_mapping(2, &json!({ "sku": "GS-019", "score": 1.2 })).unwrap_err();
    assert_eq!(err.index, 2);
    assert!(err.reason.contains("outside"), "unexpected reason: {}", err.reason);
}

#[test]
fn trend_keyword_keeps_signed_changes() {
    let item = json!({ "keyword": "air fryer", "mentions": 900, "change24": -4.5, "change7": "12" });
    let kw = parse_trend_keyword(0, &item).unwrap();
    assert!((kw.change24 + 4.5).abs() < f64::EPSILON);
    assert!((kw.change7 - 12.0).abs() < f64::EPSILON);
}

#[test]
fn signal_source_reads_value_alias() {
    let src = parse_signal_source(0, &json!({ "name": "Google", "value": 12 })).unwrap();
    assert_eq!(src.name, "Google");
    assert!((src.mentions - 12.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// parse_payload
// ---------------------------------------------------------------------------

#[test]
fn signals_payload_skips_malformed_records() {
    let raw = json!([
        { "keyword": "#kettle", "velocity": 42 },
        "garbage",
        { "keyword": "#mug", "velocity": -1 },
        { "keyword": "#mug", "velocity": 18 }
    ]);
    let payload = parse_payload(SourceKey::Signals, &raw).unwrap();
    let signals = payload.as_signals().unwrap();
    assert_eq!(signals.len(), 2);
    assert_eq!(signals[0].keyword, "#kettle");
    assert_eq!(signals[1].keyword, "#mug");
}

#[test]
fn signals_payload_rejects_object_body() {
    let result = parse_payload(SourceKey::GoogleSignals, &json!({ "rows": [] }));
    assert!(
        matches!(
            result,
            Err(FetchError::Malformed {
                source_key: SourceKey::GoogleSignals,
                ..
            })
        ),
        "expected Malformed, got: {result:?}"
    );
}

#[test]
fn empty_signals_payload_is_well_formed() {
    let payload = parse_payload(SourceKey::Signals, &json!([])).unwrap();
    assert!(payload.is_empty());
}

#[test]
fn social_payload_requires_rows() {
    assert!(parse_payload(SourceKey::Social, &json!({ "top_hashtags": [] })).is_err());
    assert!(parse_payload(SourceKey::Social, &json!([])).is_err());
}

#[test]
fn social_payload_reads_rows_and_top_hashtags() {
    let raw = json!({
        "rows": [{ "post_id": "a", "hashtag": "#kettle", "mentions": 120 }],
        "top_hashtags": [{ "hashtag": "#kettle", "count": 3 }, { "count": 1 }]
    });
    let payload = parse_payload(SourceKey::Social, &raw).unwrap();
    let feed = payload.as_social().unwrap();
    assert_eq!(feed.rows.len(), 1);
    assert_eq!(feed.top_hashtags.len(), 1);
    assert_eq!(feed.top_hashtags[0].hashtag, "#kettle");
}

#[test]
fn social_payload_null_top_hashtags_is_empty() {
    let raw = json!({ "rows": [], "top_hashtags": null });
    let payload = parse_payload(SourceKey::Social, &raw).unwrap();
    assert!(payload.as_social().unwrap().top_hashtags.is_empty());
    assert!(payload.is_empty());
}

#[test]
fn social_payload_with_only_a_ranking_is_not_empty() {
    let raw = json!({ "rows": [], "top_hashtags": [{ "hashtag": "#kettle", "count": 3 }] });
    let payload = parse_payload(SourceKey::Social, &raw).unwrap();
    assert!(payload.as_social().unwrap().rows.is_empty());
    assert!(!payload.is_empty());
}

#[test]
fn trends_payload_rejects_non_array_section() {
    let raw = json!({ "signal_sources": "TikTok", "trend_keywords": [] });
    assert!(parse_payload(SourceKey::Trends, &raw).is_err());
}

#[test]
fn trends_payload_reads_both_sections() {
    let raw = json!({
        "signal_sources": [{ "name": "TikTok", "mentions": 45 }],
        "trend_keywords": [{ "keyword": "kettle", "mentions": 10, "change24": 5, "change7": 20 }]
    });
    let payload = parse_payload(SourceKey::Trends, &raw).unwrap();
    let trends = payload.as_trends().unwrap();
    assert_eq!(trends.signal_sources.len(), 1);
    assert_eq!(trends.trend_keywords.len(), 1);
}

// ---------------------------------------------------------------------------
// parse_timestamp
// ---------------------------------------------------------------------------

#[test]
fn timestamp_accepts_offset_and_naive_forms() {
    let expected = Utc.with_ymd_and_hms(2026, 1, 8, 12, 0, 0).unwrap();
    assert_eq!(parse_timestamp("2026-01-08T14:00:00+02:00"), Some(expected));
    assert_eq!(parse_timestamp("2026-01-08T12:00:00"), Some(expected));
    assert_eq!(parse_timestamp("2026-01-08 12:00:00.000"), Some(expected));
}

#[test]
fn timestamp_rejects_garbage() {
    assert_eq!(parse_timestamp(""), None);
    assert_eq!(parse_timestamp("yesterday"), None);
}
