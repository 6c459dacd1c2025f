use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{level},hpreview_core={level},hpreview_cli={level}")
}

/// Installs the global subscriber. `RUST_LOG` overrides the defaults.
pub fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);
    registry().with(env_filter).with(stderr_layer).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_lowers_the_level() {
        assert!(default_directives(true).starts_with("debug"));
        assert!(default_directives(false).starts_with("info"));
    }
}
