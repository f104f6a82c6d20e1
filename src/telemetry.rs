use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{trace as sdktrace, Resource};
use opentelemetry_semantic_conventions::resource;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_DIRECTIVES: &str = "info,health_declaration_server=info,sqlx=warn,sea_orm=warn";

type OtelLayer = tracing_opentelemetry::OpenTelemetryLayer<Registry, sdktrace::Tracer>;

/// Installs the global subscriber.
///
/// `RUST_LOG_FORMAT=json` switches to flattened JSON lines; spans are exported
/// over OTLP only when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
pub fn init_telemetry(service_name: &str) {
    let json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|format| format == "json");
    let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .ok()
        .and_then(|endpoint| otlp_layer(service_name, endpoint));

    let filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let registry = tracing_subscriber::registry().with(otel_layer).with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn otlp_layer(service_name: &str, endpoint: String) -> Option<OtelLayer> {
    let trace_config = sdktrace::config()
        .with_resource(Resource::new([KeyValue::new(
            resource::SERVICE_NAME,
            service_name.to_string(),
        )]))
        .with_sampler(sdktrace::Sampler::AlwaysOn);

    let installed = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(trace_config)
        .install_batch(opentelemetry_sdk::runtime::Tokio);

    match installed {
        Ok(tracer) => Some(tracing_opentelemetry::layer().with_tracer(tracer)),
        Err(e) => {
            // The subscriber is not installed yet.
            eprintln!("OpenTelemetry exporter disabled for {service_name}: {e}");
            None
        }
    }
}
