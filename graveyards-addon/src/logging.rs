//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use graveyards_core::config::GeneralConfig;

/// Filter directive for `log_level`, scoped to the graveyards crates.
fn directive(log_level: &str) -> String {
    format!("graveyards_core={log_level},graveyards_addon={log_level},graveyards={log_level}")
}

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` overrides `general.log_level` when set. Returns `false` if a
/// global subscriber was already installed (e.g. by the host), in which case
/// the addon logs through that one.
pub fn init(general: &GeneralConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(&general.log_level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if general.json_logs {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    if installed {
        tracing::debug!(level = %general.log_level, json = general.json_logs, "Logging initialised");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_covers_every_crate() {
        let d = directive("debug");
        assert!(d.contains("graveyards_core=debug"));
        assert!(d.contains("graveyards_addon=debug"));
    }

    #[test]
    fn second_init_is_refused() {
        let general = GeneralConfig::default();
        let _ = init(&general);
        assert!(!init(&general));
    }
}
