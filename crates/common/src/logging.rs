use std::env;

use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use tracing::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

pub const OTLP_URL_ENVVAR: &str = "TRAVERSE_OTLP_URL";
pub const SVC_LABEL_ENVVAR: &str = "TRAVERSE_SVC_LABEL";

pub struct LoggerConfig {
    whoami: String,
    otel_url: Option<String>,
}

impl LoggerConfig {
    /// Creates a new empty instance with whoami set.
    pub fn new(whoami: String) -> Self {
        Self {
            whoami,
            otel_url: None,
        }
    }

    pub fn with_base_name(s: &str) -> Self {
        Self::new(get_whoami_string(s))
    }

    pub fn set_otlp_url(&mut self, url: String) {
        self.otel_url = Some(url);
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::with_base_name("(traverse-service)")
    }
}

/// Initializes the logging subsystem with the provided config.
pub fn init(config: LoggerConfig) {
    let filt = tracing_subscriber::EnvFilter::from_default_env();

    // Stdout logging.
    let stdout_sub = tracing_subscriber::fmt::layer().compact().with_filter(filt);

    // OpenTelemetry output.
    if let Some(otel_url) = &config.otel_url {
        let exporter = opentelemetry_otlp::new_exporter()
            .tonic()
            .with_endpoint(otel_url);

        let tp = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(exporter)
            .install_batch(opentelemetry_sdk::runtime::TokioCurrentThread)
            .expect("init: opentelemetry");

        let tt = tp.tracer("traverse-log");

        let otel_sub = tracing_opentelemetry::layer().with_tracer(tt);

        tracing_subscriber::registry()
            .with(stdout_sub)
            .with(otel_sub)
            .init();
    } else {
        tracing_subscriber::registry().with(stdout_sub).init();
    }

    info!(whoami = %config.whoami, "logging started");
}

/// Shuts down the logging subsystem, flushing as needed.
pub fn finalize() {
    info!("shutting down logging");
}

/// Gets the OTLP URL from the standard envvar.
pub fn get_otlp_url_from_env() -> Option<String> {
    env::var(OTLP_URL_ENVVAR).ok()
}

/// Gets the service label from the standard envvar, which should be included
/// in the whoami string.
pub fn get_service_label_from_env() -> Option<String> {
    env::var(SVC_LABEL_ENVVAR).ok()
}

/// Computes a standard whoami string.
pub fn get_whoami_string(base: &str) -> String {
    match get_service_label_from_env() {
        Some(label) => format!("{base}%{label}"),
        None => base.to_owned(),
    }
}
