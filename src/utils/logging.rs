use env_logger::{Builder, Env};

/// Filter used when `RUST_LOG` is unset, by `-v` count
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the env_logger backend; `RUST_LOG` takes precedence over `-v`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let env = Env::default().default_filter_or(default_filter(verbosity));
    let _ = Builder::from_env(env).format_timestamp(None).format_target(false).try_init();
}
