//! Tracing setup and send-cycle span helpers.

use std::collections::HashMap;
use std::time::Instant;

/// Installs a fmt subscriber honoring `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Structured attributes describing one send cycle.
#[derive(Debug, Clone, Default)]
pub struct SendSpanAttributes {
    /// The endpoint the payload went to.
    pub endpoint: String,
    /// The user identifier on the payload.
    pub user_id: Option<String>,
    /// The trace identifier on the payload.
    pub trace_id: Option<String>,
    /// HTTP status, when the endpoint answered.
    pub status: Option<u16>,
    /// Wall-clock duration of the cycle in milliseconds.
    pub duration_ms: Option<f64>,
    /// Error display, when the cycle failed.
    pub error: Option<String>,
}

impl SendSpanAttributes {
    /// Creates attributes for an endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Sets the user identifier.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Sets the HTTP status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Sets the error.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Converts to flat log fields.
    #[must_use]
    pub fn to_fields(&self) -> HashMap<String, String> {
        let mut fields = HashMap::new();

        fields.insert("relay.endpoint".to_string(), self.endpoint.clone());

        if let Some(ref v) = self.user_id {
            fields.insert("relay.user_id".to_string(), v.clone());
        }
        if let Some(ref v) = self.trace_id {
            fields.insert("relay.trace_id".to_string(), v.clone());
        }
        if let Some(v) = self.status {
            fields.insert("relay.status".to_string(), v.to_string());
        }
        if let Some(v) = self.duration_ms {
            fields.insert("relay.duration_ms".to_string(), v.to_string());
        }
        if let Some(ref v) = self.error {
            fields.insert("relay.error".to_string(), v.clone());
        }

        fields
    }
}

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the span and returns the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}
