//! The `date` part: loader only.
//!
//! Dates are display-ready once normalized, and handlers for them are
//! theme territory, so the type is loadable but not handleable.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};
use trellis_plugin::{LoadContext, PartError, PartLoader};

const PART_TYPE: &str = "date";

/// Normalizes stored dates into a canonical UTC record.
///
/// Accepted stored forms:
///
/// - an RFC 3339 timestamp, any offset
/// - a bare `YYYY-MM-DD` date (midnight UTC)
/// - an already-normalized `{iso}` record (idempotent)
///
/// Canonical form: `{"iso": "<RFC 3339, UTC>"}`.
pub struct DatePartLoader;

impl DatePartLoader {
    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

#[async_trait]
impl PartLoader for DatePartLoader {
    fn part_type(&self) -> &str {
        PART_TYPE
    }

    async fn load(&self, cx: LoadContext<'_>) -> Result<(), PartError> {
        let raw = match &cx.part.payload {
            Value::String(s) => s.clone(),
            Value::Object(record) => match record.get("iso").and_then(Value::as_str) {
                Some(iso) => iso.to_string(),
                None => {
                    return Err(PartError::invalid(cx.part_name, "missing 'iso' field"));
                }
            },
            _ => {
                return Err(PartError::invalid(
                    cx.part_name,
                    "expected a date string or an {iso} record",
                ));
            }
        };

        let parsed = Self::parse(&raw).ok_or_else(|| {
            PartError::invalid(cx.part_name, format!("unparseable date '{raw}'"))
        })?;
        cx.part.payload = json!({ "iso": parsed.to_rfc3339() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_types::{ItemId, Part};

    async fn load(payload: serde_json::Value) -> Result<Part, PartError> {
        let id = ItemId::new("/x");
        let mut part = Part::new(PART_TYPE, payload);
        DatePartLoader
            .load(LoadContext {
                item_id: &id,
                content_type: "page",
                part_name: "published",
                part_type: PART_TYPE,
                flavor: None,
                part: &mut part,
            })
            .await?;
        Ok(part)
    }

    #[tokio::test]
    async fn rfc3339_normalizes_to_utc() {
        let part = load(json!("2024-03-01T12:00:00+02:00"))
            .await
            .expect("RFC 3339 dates should load");
        assert_eq!(part.field("iso"), Some(&json!("2024-03-01T10:00:00+00:00")));
    }

    #[tokio::test]
    async fn bare_date_becomes_midnight_utc() {
        let part = load(json!("2024-03-01"))
            .await
            .expect("bare dates should load");
        assert_eq!(part.field("iso"), Some(&json!("2024-03-01T00:00:00+00:00")));
    }

    #[tokio::test]
    async fn normalization_is_idempotent() {
        let once = load(json!("2024-03-01")).await.expect("first load");
        let twice = load(once.payload.clone()).await.expect("second load");
        assert_eq!(once.payload, twice.payload);
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        let err = load(json!("not a date"))
            .await
            .expect_err("garbage should not load");

        use trellis_types::ErrorCode;
        assert_eq!(err.code(), "PART_INVALID_PAYLOAD");
        assert!(!err.is_recoverable());
    }
}
