//! The uniform success and error JSON wrappers every route returns.

use serde::Serialize;

use crate::normalize::Record;

/// Success envelope: the normalized records plus their count, and optional
/// context fields. `count` always equals `data.len()`.
#[derive(Debug, Serialize)]
pub struct DataEnvelope {
    pub data: Vec<Record>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl DataEnvelope {
    pub fn new(data: Vec<Record>) -> Self {
        let count = data.len();
        DataEnvelope {
            data,
            count,
            msg: None,
            date: None,
            source: None,
        }
    }

    /// Echoes the effective trade date used for the query.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Names the fallback source that answered.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches an explanation when the upstream answered with no rows
    /// (e.g. a non-trading day). A no-op on non-empty data.
    pub fn or_msg(mut self, msg: &str) -> Self {
        if self.data.is_empty() {
            self.msg = Some(msg.to_string());
        }
        self
    }
}

/// Error envelope: a description and an optional diagnostic trace.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, value: i64) -> Record {
        let mut r = Record::new();
        r.insert(key.to_string(), serde_json::Value::from(value));
        r
    }

    #[test]
    fn count_tracks_data_length() {
        let env = DataEnvelope::new(vec![record("a", 1), record("a", 2)]);
        assert_eq!(env.count, 2);
        assert_eq!(env.data.len(), env.count);
    }

    #[test]
    fn msg_only_attaches_to_empty_data() {
        let env = DataEnvelope::new(Vec::new()).or_msg("无数据");
        assert_eq!(env.msg.as_deref(), Some("无数据"));

        let env = DataEnvelope::new(vec![record("a", 1)]).or_msg("无数据");
        assert!(env.msg.is_none());
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let env = DataEnvelope::new(Vec::new());
        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"{"data":[],"count":0}"#);
    }
}
