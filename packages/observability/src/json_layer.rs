//! JSONL layer: one flat object per event.
//!
//! Event fields sit next to the fixed keys, so a store line reads
//! `{"ts":…,"level":"DEBUG","collection":"profiles","count":2,…}` and can be
//! filtered with `jq 'select(.collection == "profiles")'`.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::io::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Keys owned by [`LogEntry`]; event fields with these names get a `field_` prefix.
const RESERVED: [&str; 6] = ["ts", "level", "service", "pid", "target", "message"];

/// A single log line.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// RFC 3339, millisecond precision, UTC
    pub ts: String,
    pub level: &'static str,
    pub service: String,
    /// Several CLI invocations append to the same file.
    pub pid: u32,
    pub target: String,
    pub message: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Default)]
struct EventFields {
    message: Option<String>,
    values: Map<String, Value>,
}

impl EventFields {
    fn put(&mut self, field: &Field, value: Value) {
        match field.name() {
            "message" => {
                self.message = Some(match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
            }
            name if RESERVED.contains(&name) => {
                self.values.insert(format!("field_{}", name), value);
            }
            name => {
                self.values.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, Value::String(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.put(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::String(value.to_string()));
    }
}

/// Layer writing [`LogEntry`] lines through a `MakeWriter`.
pub struct JsonLayer<W> {
    service: String,
    pid: u32,
    make_writer: W,
}

impl<W> JsonLayer<W> {
    pub fn new(service: String, make_writer: W) -> Self {
        Self {
            service,
            pid: std::process::id(),
            make_writer,
        }
    }

    fn entry(&self, event: &Event<'_>) -> LogEntry {
        let mut fields = EventFields::default();
        event.record(&mut fields);
        let metadata = event.metadata();
        LogEntry {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level: metadata.level().as_str(),
            service: self.service.clone(),
            pid: self.pid,
            target: metadata.target().to_string(),
            message: fields.message.unwrap_or_default(),
            fields: fields.values,
        }
    }
}

impl<S, W> Layer<S> for JsonLayer<W>
where
    S: Subscriber,
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let Ok(mut line) = serde_json::to_vec(&self.entry(event)) else {
            return;
        };
        line.push(b'\n');
        // Single write so the file sink flushes whole lines.
        let _ = self.make_writer.make_writer().write_all(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> Vec<Value> {
        let captured = Captured::default();
        let subscriber =
            tracing_subscriber::registry().with(JsonLayer::new("hrm".to_string(), captured.clone()));
        tracing::subscriber::with_default(subscriber, f);

        let text = String::from_utf8(captured.0.lock().clone()).unwrap();
        text.lines().map(|l| serde_json::from_str(l).unwrap()).collect()
    }

    #[test]
    fn store_fields_sit_at_top_level() {
        let lines = capture(|| {
            tracing::debug!(collection = "profiles", count = 3u64, "Inserted records");
        });

        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line["level"], "DEBUG");
        assert_eq!(line["service"], "hrm");
        assert_eq!(line["message"], "Inserted records");
        assert_eq!(line["collection"], "profiles");
        assert_eq!(line["count"], 3);
        assert!(line["ts"].as_str().unwrap().ends_with('Z'));
        assert!(line.get("fields").is_none());
    }

    #[test]
    fn reserved_field_names_are_prefixed() {
        let lines = capture(|| {
            tracing::warn!(level = "custom", discarded_len = 12u64, "Stored document is unreadable");
        });

        let line = &lines[0];
        assert_eq!(line["level"], "WARN");
        assert_eq!(line["field_level"], "custom");
        assert_eq!(line["discarded_len"], 12);
    }
}
