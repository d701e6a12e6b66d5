use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

const LOG_ENV: &str = "SERIALPACK_LOG";

/// Print tracing events to stderr, filtered by the `SERIALPACK_LOG` env var
/// (e.g. `SERIALPACK_LOG=serialpack=debug`). Does nothing when the variable is unset.
///
/// Libraries embedding serialpack usually install their own subscriber instead.
pub fn enable_tracing_by_env() {
  INIT.call_once(|| {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
      return;
    };
    // Another subscriber may already be installed by the host.
    let _ = tracing_subscriber::registry()
      .with(filter)
      .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
      .try_init();
  });
}
