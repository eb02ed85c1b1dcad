use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Used when RUST_LOG is unset. sqlx logs every statement at info, which
/// drowns the request logs, so it is held at warn everywhere.
fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "agrom_backend=debug,tower_http=debug,sqlx=warn,info",
        Environment::Staging => "agrom_backend=debug,tower_http=info,sqlx=warn,info",
        Environment::Prod => "agrom_backend=info,tower_http=info,sqlx=warn,warn",
    }
}

pub fn init_logging(env: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    let registry = tracing_subscriber::registry().with(filter);
    match env {
        Environment::Prod => registry.with(fmt_layer.json().flatten_event(true)).init(),
        Environment::Dev | Environment::Staging => registry.with(fmt_layer.pretty()).init(),
    }

    tracing::info!(?env, "Logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for env in [Environment::Dev, Environment::Staging, Environment::Prod] {
            let directives = default_directives(&env);
            assert!(directives.contains("sqlx=warn"));
            assert!(EnvFilter::try_new(directives).is_ok());
        }
    }
}
