use std::env;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

fn default_filter(module: &str, log_level: &str) {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", format!("{module}={log_level}"));
    }
}

/// Installs the global fmt subscriber on stdout. `RUST_LOG` wins when set,
/// otherwise `module=log_level` is used.
pub fn setup(module: &str, log_level: &str) {
    default_filter(module, log_level);
    get_subscriber().init();
}

/// Like [`setup`], for binaries whose stdout is their output.
pub fn setup_stderr(module: &str, log_level: &str) {
    default_filter(module, log_level);
    get_subscriber().with_writer(std::io::stderr).init();
}

pub fn get_subscriber() -> SubscriberBuilder<DefaultFields, Format, EnvFilter> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
}
