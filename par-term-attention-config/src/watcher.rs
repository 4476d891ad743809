//! Attention config file watcher for automatic reload.
//!
//! Watches `attention.yaml` and yields reload events. Editors often save in
//! several steps (truncate, write, rename), so events are debounced.

use crate::config::AttentionConfig;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

/// Poll interval used when the native backend is unavailable.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Event indicating the attention config file has changed.
#[derive(Debug, Clone)]
pub struct ConfigReloadEvent {
    /// Path to the config file that changed.
    pub path: PathBuf,
}

impl ConfigReloadEvent {
    /// Re-read the changed file.
    pub fn load(&self) -> Result<AttentionConfig, ConfigError> {
        AttentionConfig::load_from(&self.path)
    }
}

/// Debounce gate shared by the watcher callback.
#[derive(Debug, Clone)]
struct Debounce {
    delay: Duration,
    last_sent: Arc<Mutex<Option<Instant>>>,
}

impl Debounce {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_sent: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns true (and records `now`) when an event may pass.
    fn admit(&self, now: Instant) -> bool {
        let mut last = self.last_sent.lock();
        match *last {
            Some(prev) if now.duration_since(prev) < self.delay => {
                log::trace!("Debouncing attention config reload event");
                false
            }
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

/// Watches the attention config file and queues reload events.
pub struct ConfigWatcher {
    /// The file system watcher (kept alive to maintain watching).
    _watcher: Box<dyn Watcher + Send>,
    /// Receiver for config change events.
    event_receiver: Receiver<ConfigReloadEvent>,
    /// Canonical path of the watched file.
    path: PathBuf,
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Build the event-handler closure used by both watcher backends.
fn make_event_handler(
    filename: OsString,
    canonical_path: PathBuf,
    debounce: Debounce,
    tx: Sender<ConfigReloadEvent>,
) -> impl Fn(std::result::Result<Event, notify::Error>) + Send + 'static {
    move |result: std::result::Result<Event, notify::Error>| {
        let Ok(event) = result else {
            return;
        };

        // Create covers editors that save atomically via rename.
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }

        let touches_config = event
            .paths
            .iter()
            .any(|p| p.file_name().is_some_and(|f| f == filename));
        if !touches_config || !debounce.admit(Instant::now()) {
            return;
        }

        let reload_event = ConfigReloadEvent {
            path: canonical_path.clone(),
        };
        log::info!("Attention config changed: {}", reload_event.path.display());
        if let Err(e) = tx.send(reload_event) {
            log::error!("Failed to send attention config reload event: {}", e);
        }
    }
}

impl ConfigWatcher {
    /// Create a new watcher for `config_path`.
    ///
    /// Uses the platform's native backend and falls back to a `PollWatcher`
    /// (500 ms) if the native backend cannot be initialised, e.g. inside a
    /// container or on a network filesystem.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or watching fails on both
    /// backends.
    pub fn new(config_path: &Path, debounce_delay_ms: u64) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!("Attention config not found: {}", config_path.display());
        }

        let canonical = config_path
            .canonicalize()
            .unwrap_or_else(|_| config_path.to_path_buf());
        let filename = canonical
            .file_name()
            .context("Config path has no filename")?
            .to_os_string();
        let parent_dir = canonical
            .parent()
            .context("Config path has no parent directory")?
            .to_path_buf();

        let (tx, rx) = channel::<ConfigReloadEvent>();
        let debounce = Debounce::new(Duration::from_millis(debounce_delay_ms));

        let mut watcher = Self::create_watcher(filename, canonical.clone(), debounce, tx)?;
        watcher
            .watch(&parent_dir, RecursiveMode::NonRecursive)
            .with_context(|| {
                format!("Failed to watch config directory: {}", parent_dir.display())
            })?;

        log::info!("Attention config hot reload: watching {}", canonical.display());

        Ok(Self {
            _watcher: watcher,
            event_receiver: rx,
            path: canonical,
        })
    }

    /// Watch the file `config` would be loaded from, using its reload delay.
    pub fn for_default_path(config: &AttentionConfig) -> Result<Self> {
        Self::new(&AttentionConfig::config_path(), config.config_reload_delay_ms)
    }

    fn create_watcher(
        filename: OsString,
        canonical_path: PathBuf,
        debounce: Debounce,
        tx: Sender<ConfigReloadEvent>,
    ) -> Result<Box<dyn Watcher + Send>> {
        let handler = make_event_handler(
            filename.clone(),
            canonical_path.clone(),
            debounce.clone(),
            tx.clone(),
        );

        match notify::recommended_watcher(handler) {
            Ok(w) => {
                log::debug!("Attention config watcher: using native backend");
                Ok(Box::new(w))
            }
            Err(e) => {
                log::warn!(
                    "Attention config watcher: native backend unavailable ({}); falling back to PollWatcher",
                    e
                );
                let fallback = make_event_handler(filename, canonical_path, debounce, tx);
                let poll_watcher = PollWatcher::new(
                    fallback,
                    NotifyConfig::default().with_poll_interval(POLL_INTERVAL),
                )
                .context("Failed to create fallback PollWatcher")?;
                Ok(Box::new(poll_watcher))
            }
        }
    }

    /// Path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check for pending reload events (non-blocking).
    pub fn try_recv(&self) -> Option<ConfigReloadEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Drain all pending events and return the last one, if any.
    ///
    /// Several queued events for the same file collapse into one reload.
    pub fn latest(&self) -> Option<ConfigReloadEvent> {
        let mut latest = None;
        while let Some(event) = self.try_recv() {
            latest = Some(event);
        }
        latest
    }
}
