use std::io::IsTerminal;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

const LOG_ENV_VAR: &str = "JPAMB_LOG";

/// Initializes logging, gated on the `JPAMB_LOG` environment variable: a
/// quiet run stays completely silent on stderr.
pub(crate) fn initialize() {
    if std::env::var_os(LOG_ENV_VAR).is_none() {
        return;
    }

    let enable_ansi = std::io::stderr().is_terminal();
    let format = fmt::format()
        .with_ansi(enable_ansi)
        .with_level(true)
        .with_target(false)
        .with_thread_ids(false)
        .with_timer(fmt::time::uptime())
        .compact();

    let filter = EnvFilter::from_env(LOG_ENV_VAR);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .event_format(format)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_is_a_silent_no_op_without_the_env_var() {
        std::env::remove_var(LOG_ENV_VAR);
        initialize();
    }
}
