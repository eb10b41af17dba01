//! Shared state for one CLI invocation.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use unifile_core::{
    backend::options::{OUTPUT_DIR, QUALITY},
    BackendRegistry, Config, ConversionOptions, ProbeCache, ProcessRunner, Quality, Router,
};

/// Registry, probe cache, and runner built once from configuration.
pub struct App {
    pub config: Config,
    pub registry: BackendRegistry,
    pub probes: ProbeCache,
    pub runner: ProcessRunner,
    interrupts: Interrupts,
}

impl App {
    pub fn new(config: Config) -> Self {
        let registry = BackendRegistry::builtin(&config.tools);
        let probes = ProbeCache::from_config(&config.probe);
        let runner = ProcessRunner::from_config(&config.conversion);
        Self {
            config,
            registry,
            probes,
            runner,
            interrupts: Interrupts::default(),
        }
    }

    /// Token for the next conversion, cancelled on Ctrl-C.
    pub fn cancel_token(&self) -> CancellationToken {
        self.interrupts.token()
    }

    pub fn router(&self) -> Router<'_> {
        Router::new(&self.registry, &self.probes)
    }

    /// Merges flags over configured defaults into one option map.
    ///
    /// Explicit `--option` pairs win over the dedicated flags.
    pub fn options(
        &self,
        quality: Option<Quality>,
        output_dir: Option<PathBuf>,
        extra: &[(String, String)],
    ) -> ConversionOptions {
        let quality = quality.unwrap_or(self.config.conversion.default_quality);
        let mut options = ConversionOptions::new().with(QUALITY, quality.as_str());

        if let Some(dir) = output_dir.or_else(|| self.config.conversion.output_dir.clone()) {
            options.set(OUTPUT_DIR, dir.to_string_lossy());
        }
        for (key, value) in extra {
            options.set(key.clone(), value.clone());
        }
        options
    }
}

/// Ctrl-C handling shared by every conversion in one session.
///
/// One listener task cancels whichever token is current. A cancelled token
/// is replaced on the next request, so an interrupt stops only the run it
/// landed in.
#[derive(Debug, Default)]
struct Interrupts {
    current: Arc<Mutex<CancellationToken>>,
    listening: OnceLock<()>,
}

impl Interrupts {
    fn token(&self) -> CancellationToken {
        self.listening.get_or_init(|| self.listen());
        let mut current = lock(&self.current);
        if current.is_cancelled() {
            *current = CancellationToken::new();
        }
        current.clone()
    }

    fn listen(&self) {
        let current = Arc::clone(&self.current);
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                    return;
                }
                info!("Interrupted, cancelling conversion");
                lock(&current).cancel();
            }
        });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
