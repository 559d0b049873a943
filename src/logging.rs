//! Tracing subscriber setup.
//!
//! `RUST_LOG` overrides the defaults below.  Without it, development
//! logs engine internals (computed totals, setup services with no
//! hours formula) at debug, while staging and production keep the
//! engine at info and everything else at warn.  Production writes JSON
//! lines for log shipping.

use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(env: Environment) -> &'static str {
    match env {
        Environment::Dev => "quote_engine=debug,info",
        Environment::Staging => "quote_engine=info,warn",
        Environment::Prod => "quote_engine=info,warn",
    }
}

pub fn init_logging(env: Environment) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(env)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    if matches!(env, Environment::Prod) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .init();
    }

    tracing::info!("Logging initialized for {:?} environment", env);
}
