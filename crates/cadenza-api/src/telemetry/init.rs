use anyhow::Context;
use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "cadenza=debug,tower_http=debug";

/// Install the global subscriber. `log_format = Some("json")` switches the
/// console output to one JSON object per event.
pub fn init_telemetry(log_format: Option<&str>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json = log_format.is_some_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
            .context("Failed to install tracing subscriber")?;
    } else {
        let console_fmt = tracing_subscriber::fmt::layer()
            .event_format(Format::default().compact().with_target(false));
        tracing_subscriber::registry()
            .with(filter)
            .with(console_fmt)
            .try_init()
            .context("Failed to install tracing subscriber")?;
    }

    tracing::info!(json, "Tracing initialized");
    Ok(())
}
