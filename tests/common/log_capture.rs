//! Thread-scoped tracing capture for asserting on emitted logs.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
pub struct CapturedLog {
    pub level: tracing::Level,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

/// Captures events on the current thread until dropped.
pub struct TestLogCapture {
    logs: Arc<Mutex<Vec<CapturedLog>>>,
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestLogCapture {
    pub fn start() -> Self {
        let logs = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(CaptureLayer {
            logs: Arc::clone(&logs),
        });
        let guard = tracing::subscriber::set_default(subscriber);
        Self {
            logs,
            _guard: guard,
        }
    }

    pub fn logs(&self) -> Vec<CapturedLog> {
        self.logs.lock().unwrap().clone()
    }

    pub fn assert_logged_at_level(&self, level: tracing::Level, needle: &str) {
        let logs = self.logs();
        assert!(
            logs.iter()
                .any(|l| l.level == level && l.message.contains(needle)),
            "Expected {level} log containing '{needle}'. Logged: {:#?}",
            logs.iter().map(|l| &l.message).collect::<Vec<_>>()
        );
    }

    pub fn assert_field_logged(&self, name: &str, value: &str) {
        let logs = self.logs();
        assert!(
            logs.iter()
                .any(|l| l.fields.iter().any(|(k, v)| k == name && v == value)),
            "Expected field {name}={value}. Logged fields: {:#?}",
            logs.iter().map(|l| &l.fields).collect::<Vec<_>>()
        );
    }

    pub fn count_at_level(&self, level: tracing::Level) -> usize {
        self.logs().iter().filter(|l| l.level == level).count()
    }
}

struct CaptureLayer {
    logs: Arc<Mutex<Vec<CapturedLog>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        if let Ok(mut logs) = self.logs.lock() {
            logs.push(CapturedLog {
                level: *event.metadata().level(),
                message: visitor.message,
                fields: visitor.fields,
            });
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn push(&mut self, name: &str, value: String) {
        if name == "message" {
            self.message = value;
        } else {
            self.fields.push((name.to_string(), value));
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push(field.name(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push(field.name(), value.to_string());
    }
}
