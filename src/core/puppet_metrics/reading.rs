use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::client::{Fetch, MetricQuery};
use super::MetricSource;
use crate::error::Result;

/// Latest document returned for one [`MetricQuery`] together with the
/// server timestamps of the last two samples.
pub struct Reading {
    label: String,
    fetcher: Arc<dyn Fetch>,
    query: MetricQuery,
    document: Value,
    last_timestamp: Option<i64>,
    curr_timestamp: Option<i64>,
}

impl Reading {
    pub fn new(label: &str, fetcher: Arc<dyn Fetch>, query: MetricQuery) -> Self {
        Self {
            label: label.to_string(),
            fetcher,
            query,
            document: Value::Null,
            last_timestamp: None,
            curr_timestamp: None,
        }
    }

    pub fn query(&self) -> &MetricQuery {
        &self.query
    }

    /// Top-level keys below `value`, if a document has been loaded
    pub fn keys(&self) -> Option<Vec<String>> {
        self.document
            .get("value")
            .and_then(Value::as_object)
            .map(|value| value.keys().cloned().collect())
    }

    pub fn value_at(&self, path: &[&str]) -> Option<&Value> {
        path.iter()
            .try_fold(self.document.get("value")?, |node, key| node.get(*key))
    }

    /// Install a freshly fetched document. Only a non-empty document
    /// advances the sample timestamps.
    pub fn apply(&mut self, document: Value) {
        let non_empty = match &document {
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
            _ => true,
        };

        if non_empty {
            self.last_timestamp = self.curr_timestamp;
            self.curr_timestamp = document.get("timestamp").and_then(Value::as_i64);
        }
        self.document = document;
    }
}

impl MetricSource for Reading {
    fn name(&self) -> &str {
        &self.label
    }

    fn refresh(&mut self) -> Result<()> {
        let document = self.fetcher.fetch(&self.query)?;
        self.apply(document);
        Ok(())
    }

    fn get(&self, path: &[&str]) -> Option<f64> {
        self.value_at(path).and_then(Value::as_f64)
    }

    fn elapsed_since_last_sample(&self) -> Option<Duration> {
        let (last, curr) = (self.last_timestamp?, self.curr_timestamp?);
        u64::try_from(curr - last).ok().map(Duration::from_secs)
    }
}
