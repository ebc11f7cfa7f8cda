//! `tracing-subscriber` wiring for the compiler binary/host: an
//! `EnvFilter`-driven `fmt` subscriber, defaulting to `info` and
//! overridable via `ECMAIR_LOG`. A Chrome-DevTools JSON event tracer for a
//! `--generateTrace`-style flag is a CLI-layer concern outside this crate;
//! this only wires structured logging.

use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber reading filter directives from
/// `ECMAIR_LOG`, falling back to `info` for every target. Idempotent: a
/// second call returns `Ok(())` rather than erroring, since embedding
/// hosts (e.g. a language-server process) may call it more than once.
pub fn init_tracing() -> anyhow::Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }
    let filter = EnvFilter::try_from_env("ECMAIR_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init()?;
    Ok(())
}
