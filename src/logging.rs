// Copyright (C) 2020-2026 Andy Kurnia.

use tracing_subscriber::EnvFilter;

// RUST_LOG if set, else info. Logs go to stderr, results stay on stdout.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
