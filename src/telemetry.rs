use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing according to `RUST_LOG` and `LOG_FORMAT`.
/// - Defaults to `info` (plus request traces) if `RUST_LOG` is unset
/// - `LOG_FORMAT=json` switches to JSON lines
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let fmt_layer = fmt::layer().with_target(false);
    let builder = tracing_subscriber::registry().with(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            let _ = builder.with(fmt_layer.json().flatten_event(true)).try_init();
        }
        _ => {
            let _ = builder.with(fmt_layer.compact()).try_init();
        }
    }
}
