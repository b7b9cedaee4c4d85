/// Tracing subscriber setup
///
/// `RUST_LOG` controls the filter; without it the server logs its own crates
/// at debug and tower-http request spans.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "tasklist_web=debug,tasklist_shared=info,tower_http=debug";

/// Installs the global subscriber
///
/// `json` switches the output to one JSON object per line.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let (plain, json) = if json {
        (None, Some(fmt::layer().json().with_current_span(false)))
    } else {
        (Some(fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}
