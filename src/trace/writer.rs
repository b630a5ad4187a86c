//! Chrome Trace Event JSON serialization.
//!
//! Output shape (loadable in `chrome://tracing` or <https://ui.perfetto.dev>):
//!
//! ```json
//! {
//!   "displayTimeUnit": "ns",
//!   "otherData": { "scope_profiler": "scope-profiler v0.1.0" },
//!   "traceEvents": [
//!     {},
//!     { "cat": "function", "dur": 12.5, "name": "load", "ph": "X", "pid": 0, "tid": 1, "ts": 3.25 }
//!   ]
//! }
//! ```
//!
//! The leading `{}` is a placeholder older readers of this format expect;
//! viewers ignore it. It can be switched off in [`TraceConfig`].

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::record::TraceRecord;
use crate::config::TraceConfig;
use crate::error::Result;

/// Every event is a "complete" event
const PHASE_COMPLETE: &str = "X";
const CATEGORY: &str = "function";
const PID: u32 = 0;

/// Top-level document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceDocument {
    pub display_time_unit: String,
    pub other_data: BTreeMap<String, String>,
    pub trace_events: Vec<TraceEvent>,
}

/// One entry of `traceEvents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraceEvent {
    Complete(CompleteEvent),
    /// The `{}` placeholder
    Empty(EmptyEvent),
}

/// Strict `{}`: an event object with any field in it is not a placeholder,
/// so a malformed complete event fails to parse instead of hiding here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyEvent {}

/// Field order matches the order trace files have always been written in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteEvent {
    pub cat: String,
    pub dur: f64,
    pub name: String,
    pub ph: String,
    pub pid: u32,
    pub tid: u64,
    pub ts: f64,
}

impl CompleteEvent {
    /// Event for `record`, timestamped relative to `origin`.
    pub fn from_record(record: TraceRecord, origin: Instant) -> Self {
        Self {
            cat: CATEGORY.into(),
            dur: record.duration_us,
            ts: record.ts_us(origin),
            name: record.name,
            ph: PHASE_COMPLETE.into(),
            pid: PID,
            tid: record.thread_id,
        }
    }
}

impl TraceDocument {
    /// Assemble the document for `records` (in the given order).
    pub fn build(config: &TraceConfig, records: Vec<TraceRecord>, origin: Instant) -> Self {
        let mut trace_events = Vec::with_capacity(records.len() + 1);
        if config.leading_empty_event {
            trace_events.push(TraceEvent::Empty(EmptyEvent {}));
        }
        trace_events.extend(
            records
                .into_iter()
                .map(|r| TraceEvent::Complete(CompleteEvent::from_record(r, origin))),
        );

        Self {
            display_time_unit: config.display_time_unit.clone(),
            other_data: BTreeMap::from([(config.tool_name.clone(), config.tool_info.clone())]),
            trace_events,
        }
    }

    /// The real events, skipping placeholders.
    pub fn complete_events(&self) -> impl Iterator<Item = &CompleteEvent> {
        self.trace_events.iter().filter_map(|e| match e {
            TraceEvent::Complete(c) => Some(c),
            TraceEvent::Empty(_) => None,
        })
    }
}

/// Serialize `records` into `w` as one pretty-printed JSON document.
pub fn write_trace<W: Write>(
    w: &mut W,
    config: &TraceConfig,
    records: Vec<TraceRecord>,
    origin: Instant,
) -> Result<()> {
    let doc = TraceDocument::build(config, records, origin);
    serde_json::to_writer_pretty(&mut *w, &doc)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Nanos;
    use std::time::Duration;

    fn sample_records(origin: Instant) -> Vec<TraceRecord> {
        vec![
            TraceRecord::new("alpha", Nanos(1_500), 1, origin + Duration::from_micros(10)),
            TraceRecord::new("beta \"quoted\"", Nanos(250), 2, origin + Duration::from_micros(20)),
        ]
    }

    #[test]
    fn envelope_and_fields() {
        let origin = Instant::now();
        let mut out = Vec::new();
        write_trace(&mut out, &TraceConfig::default(), sample_records(origin), origin).unwrap();

        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["displayTimeUnit"], "ns");
        assert!(v["otherData"]["scope_profiler"]
            .as_str()
            .unwrap()
            .starts_with("scope-profiler v"));

        let events = v["traceEvents"].as_array().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], serde_json::json!({}));
        assert_eq!(
            events[1],
            serde_json::json!({
                "cat": "function", "dur": 1.5, "name": "alpha",
                "ph": "X", "pid": 0, "tid": 1, "ts": 10.0
            })
        );
        assert_eq!(events[2]["name"], "beta \"quoted\"");
    }

    #[test]
    fn placeholder_can_be_disabled() {
        let origin = Instant::now();
        let cfg = TraceConfig {
            leading_empty_event: false,
            ..TraceConfig::default()
        };
        let doc = TraceDocument::build(&cfg, sample_records(origin), origin);
        assert_eq!(doc.trace_events.len(), 2);
        assert!(matches!(doc.trace_events[0], TraceEvent::Complete(_)));
    }

    #[test]
    fn parses_back_into_document() {
        let origin = Instant::now();
        let mut out = Vec::new();
        write_trace(&mut out, &TraceConfig::default(), sample_records(origin), origin).unwrap();

        let doc: TraceDocument = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc.trace_events[0], TraceEvent::Empty(EmptyEvent {}));
        let names: Vec<_> = doc.complete_events().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["alpha", "beta \"quoted\""]);
    }

    #[test]
    fn event_missing_ts_is_rejected() {
        let raw = r#"{
            "displayTimeUnit": "ns",
            "otherData": {},
            "traceEvents": [{}, {"cat":"function","dur":1.0,"name":"x","ph":"X","pid":0,"tid":1}]
        }"#;
        assert!(serde_json::from_str::<TraceDocument>(raw).is_err());
    }

    #[test]
    fn mistyped_field_is_rejected() {
        let raw = r#"{"cat":"function","dur":"slow","name":"x","ph":"X","pid":0,"tid":1,"ts":0.0}"#;
        assert!(serde_json::from_str::<TraceEvent>(raw).is_err());
        assert_eq!(
            serde_json::from_str::<TraceEvent>("{}").unwrap(),
            TraceEvent::Empty(EmptyEvent {})
        );
    }

    #[test]
    fn empty_queue_still_writes_valid_document() {
        let mut out = Vec::new();
        write_trace(&mut out, &TraceConfig::default(), Vec::new(), Instant::now()).unwrap();
        let doc: TraceDocument = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc.complete_events().count(), 0);
    }
}
