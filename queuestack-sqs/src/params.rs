//! Request parameter construction

use chrono::{DateTime, SecondsFormat, Utc};
use queuestack_core::ParameterMap;

/// Query protocol version sent with every request
pub const API_VERSION: &str = "2011-10-01";

/// Builds the parameter map for one action.
///
/// `Action`, `Version` and `Timestamp` are always present; operation fields
/// are layered on top.
#[derive(Debug, Clone)]
pub struct ParamsBuilder {
    params: ParameterMap,
}

impl ParamsBuilder {
    pub fn new(action: &str) -> Self {
        Self::at(action, Utc::now())
    }

    /// Seed the common parameters with an explicit timestamp
    pub fn at(action: &str, timestamp: DateTime<Utc>) -> Self {
        let mut params = ParameterMap::new();
        params.insert("Action".to_string(), action.to_string());
        params.insert("Version".to_string(), API_VERSION.to_string());
        params.insert(
            "Timestamp".to_string(),
            timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        Self { params }
    }

    pub fn set(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Set `key` only when `value` is present and non-empty
    pub fn set_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.set(key, v),
            _ => self,
        }
    }

    /// Expand batch entries into `<entry_kind>.<N>.<Field>` parameters.
    ///
    /// Entries are numbered from 1 and each gets the synthesized id `msg-<N>`.
    /// An empty batch adds nothing.
    pub fn batch<I, F>(mut self, entry_kind: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: IntoIterator<Item = (&'static str, String)>,
    {
        for (idx, fields) in entries.into_iter().enumerate() {
            let n = idx + 1;
            self.params
                .insert(format!("{}.{}.Id", entry_kind, n), entry_id(n));
            for (field, value) in fields {
                self.params
                    .insert(format!("{}.{}.{}", entry_kind, n, field), value);
            }
        }
        self
    }

    pub fn build(self) -> ParameterMap {
        self.params
    }
}

/// Synthesized id of the `n`th (1-based) batch entry
pub fn entry_id(n: usize) -> String {
    format!("msg-{}", n)
}

/// Zero-based input position of a synthesized batch entry id
pub fn entry_index(id: &str) -> Option<usize> {
    id.strip_prefix("msg-")?
        .parse::<usize>()
        .ok()?
        .checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(n: usize) -> Vec<Vec<(&'static str, String)>> {
        (1..=n)
            .map(|i| vec![("MessageBody", format!("body {}", i))])
            .collect()
    }

    #[test]
    fn test_common_parameters() {
        let before = Utc::now() - chrono::Duration::seconds(1);
        let params = ParamsBuilder::new("ListQueues").build();
        let after = Utc::now() + chrono::Duration::seconds(1);

        assert_eq!(params["Action"], "ListQueues");
        assert_eq!(params["Version"], API_VERSION);

        let timestamp = &params["Timestamp"];
        assert!(timestamp.ends_with('Z'));
        let parsed = DateTime::parse_from_rfc3339(timestamp)
            .unwrap()
            .with_timezone(&Utc);
        assert!(parsed >= before && parsed <= after);
    }

    #[test]
    fn test_timestamp_wire_format() {
        let at = DateTime::parse_from_rfc3339("2026-10-18T09:30:15.123Z")
            .unwrap()
            .with_timezone(&Utc);
        let params = ParamsBuilder::at("SendMessage", at).build();
        assert_eq!(params["Timestamp"], "2026-10-18T09:30:15Z");
    }

    #[test]
    fn test_set_opt_skips_empty() {
        let params = ParamsBuilder::new("ListQueues")
            .set_opt("QueueNamePrefix", None)
            .set_opt("Empty", Some(""))
            .build();
        assert!(!params.contains_key("QueueNamePrefix"));
        assert!(!params.contains_key("Empty"));

        let params = ParamsBuilder::new("ListQueues")
            .set_opt("QueueNamePrefix", Some("orders"))
            .build();
        assert_eq!(params["QueueNamePrefix"], "orders");
    }

    #[test]
    fn test_batch_indexing() {
        let params = ParamsBuilder::new("SendMessageBatch")
            .batch("SendMessageBatchRequestEntry", bodies(3))
            .build();

        for n in 1..=3 {
            assert_eq!(
                params[&format!("SendMessageBatchRequestEntry.{}.Id", n)],
                format!("msg-{}", n)
            );
            assert_eq!(
                params[&format!("SendMessageBatchRequestEntry.{}.MessageBody", n)],
                format!("body {}", n)
            );
        }
        assert!(!params.contains_key("SendMessageBatchRequestEntry.0.Id"));
        assert!(!params.contains_key("SendMessageBatchRequestEntry.4.Id"));

        let entries = params
            .keys()
            .filter(|k| k.starts_with("SendMessageBatchRequestEntry."))
            .count();
        assert_eq!(entries, 6);
    }

    #[test]
    fn test_empty_batch() {
        let params = ParamsBuilder::new("DeleteMessageBatch")
            .batch("DeleteMessageBatchRequestEntry", bodies(0))
            .build();

        assert!(!params.keys().any(|k| k.contains('.')));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_entry_index() {
        assert_eq!(entry_index("msg-1"), Some(0));
        assert_eq!(entry_index("msg-10"), Some(9));
        assert_eq!(entry_index("msg-0"), None);
        assert_eq!(entry_index("custom"), None);
        assert_eq!(entry_index("msg-x"), None);
    }
}
