// Tracing setup for the SaveStorageSettings mod

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Crate-level directive added on top of `RUST_LOG`
const CRATE_DIRECTIVE: &str = "save_storage_settings=debug";

// Dropping a guard stops its writer thread, so they live until the game exits
static LOG_GUARD: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

/// Background writer appending to `path`; `None` if the path has no file name
fn file_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    let dir = path.parent()?;
    let name = path.file_name()?.to_str()?;
    Some(tracing_appender::non_blocking(
        tracing_appender::rolling::never(dir, name),
    ))
}

/// Install the mod's subscriber.
///
/// Records go to `log_file_path` when set and to stdout when `enable_console`
/// is on. The first call wins. If the process already has a global
/// subscriber, ours is not installed and the writers are simply idle.
pub fn init_logging(enable_console: bool, log_file_path: Option<PathBuf>) {
    if LOG_GUARD.get().is_some() {
        return;
    }

    let mut filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();
    if let Ok(directive) = CRATE_DIRECTIVE.parse() {
        filter = filter.add_directive(directive);
    }

    let mut guards = Vec::new();

    let file_layer = log_file_path
        .as_deref()
        .and_then(file_writer)
        .map(|(writer, guard)| {
            guards.push(guard);
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
        });

    let console_layer = enable_console.then(|| {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    let _ = LOG_GUARD.set(guards);
}
