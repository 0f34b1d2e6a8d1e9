//! In-memory log capture for tests that assert a failure was logged
//! rather than returned (background refreshes, best-effort logout).

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// One recorded event.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    /// Level the event was emitted at.
    pub level: Level,
    /// The `message` field.
    pub message: String,
    /// Remaining structured fields, in emission order.
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    /// Value of a structured field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Events recorded while the guard from [`capture_logs`] is alive.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedLogs {
    /// Snapshot of every event so far.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    /// Whether an event at `level` has a message containing `needle`.
    pub fn has_event(&self, level: Level, needle: &str) -> bool {
        self.find(level, needle).is_some()
    }

    /// First event at `level` whose message contains `needle`.
    pub fn find(&self, level: Level, needle: &str) -> Option<CapturedEvent> {
        self.events
            .lock()
            .iter()
            .find(|e| e.level == level && e.message.contains(needle))
            .cloned()
    }
}

#[derive(Default)]
struct Recorder {
    message: String,
    fields: Vec<(String, String)>,
}

impl Recorder {
    fn record(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_owned(), value));
        }
    }
}

impl Visit for Recorder {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_owned());
    }
}

struct CaptureLayer(CapturedLogs);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = Recorder::default();
        event.record(&mut recorder);
        self.0.events.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            message: recorder.message,
            fields: recorder.fields,
        });
    }
}

/// Capture every event on the current thread until the guard drops.
///
/// Plain `#[tokio::test]` runs on a current-thread runtime, so events from
/// spawned tasks are captured too.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let guard = tracing_subscriber::registry()
        .with(CaptureLayer(logs.clone()))
        .with(LevelFilter::TRACE)
        .set_default();
    (logs, guard)
}
