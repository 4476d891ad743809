//! Async driver for [`AttentionEngine`].
//!
//! The engine runs on a single tokio task, which is the one decision thread:
//! host events arrive over an unbounded channel and are handled strictly in
//! order. `ArmTimer` commands become detached `tokio::time::sleep` tasks that
//! post the ticket back into the same channel. Those tasks are never
//! aborted; a superseded ticket simply fails the generation check when it
//! comes back. Focus commands leave through a second channel as
//! [`FocusRequest`]s for the UI thread to apply.

use crate::debug::{ATTN, TIMER};
use crate::engine::{AttentionEngine, AttentionEvent, ConfigHandle};
use crate::host::{HostCommand, HostFocusQuery};
use crate::surface::{ContainerId, SurfaceId};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[cfg(feature = "watcher")]
use anyhow::Context;
#[cfg(feature = "watcher")]
use par_term_attention_config::ConfigWatcher;
#[cfg(feature = "watcher")]
use std::time::Duration;

/// Request for the UI to focus a surface and activate its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRequest {
    pub surface: SurfaceId,
    pub container: ContainerId,
}

/// Errors from the runtime driver.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The decision task is gone; no more events can be delivered.
    #[error("attention runtime is not running")]
    Closed,

    /// The decision task panicked or was cancelled.
    #[error("attention runtime task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

enum Message {
    Event(AttentionEvent),
    Shutdown,
}

/// Cloneable sender for host events.
#[derive(Debug, Clone)]
pub struct AttentionHandle {
    tx: mpsc::UnboundedSender<Message>,
}

impl AttentionHandle {
    /// Queue `event` for the decision task.
    pub fn send(&self, event: AttentionEvent) -> Result<(), RuntimeError> {
        self.tx
            .send(Message::Event(event))
            .map_err(|_| RuntimeError::Closed)
    }

    /// Returns `true` once the decision task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Event(event) => write!(f, "Event({:?})", event),
            Message::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// Running engine plus its helper tasks.
pub struct AttentionRuntime {
    handle: AttentionHandle,
    config: ConfigHandle,
    task: JoinHandle<AttentionEngine>,
    reload_task: Option<JoinHandle<()>>,
}

impl AttentionRuntime {
    /// Start the decision task. Must be called inside a tokio runtime.
    pub fn spawn<H>(
        engine: AttentionEngine,
        host: Arc<H>,
        focus_tx: mpsc::UnboundedSender<FocusRequest>,
    ) -> Self
    where
        H: HostFocusQuery + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = AttentionHandle { tx: tx.clone() };
        let config = engine.config_handle();
        let task = tokio::spawn(run_loop(engine, host, rx, tx, focus_tx));
        log::debug!("Attention runtime started");

        Self {
            handle,
            config,
            task,
            reload_task: None,
        }
    }

    pub fn handle(&self) -> AttentionHandle {
        self.handle.clone()
    }

    pub fn send(&self, event: AttentionEvent) -> Result<(), RuntimeError> {
        self.handle.send(event)
    }

    /// Shared config the engine reads on every decision.
    pub fn config_handle(&self) -> ConfigHandle {
        Arc::clone(&self.config)
    }

    /// Hot-reload `~/.config/par-term/attention.yaml`.
    #[cfg(feature = "watcher")]
    pub fn watch_default_config(&mut self, interval: Duration) -> anyhow::Result<()> {
        let watcher = ConfigWatcher::for_default_path(&self.config.load())
            .context("Failed to start attention config watcher")?;
        self.watch_config(watcher, interval);
        Ok(())
    }

    /// Hot-reload the config file watched by `watcher`.
    ///
    /// Polls the watcher every `interval`; on a change the file is
    /// re-read, swapped into the shared config and announced as
    /// [`AttentionEvent::ConfigChanged`]. A file that fails to parse is
    /// logged and the previous config stays in effect.
    #[cfg(feature = "watcher")]
    pub fn watch_config(&mut self, watcher: ConfigWatcher, interval: Duration) {
        let handle = self.handle.clone();
        let config = Arc::clone(&self.config);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if handle.is_closed() {
                    break;
                }
                let Some(event) = watcher.latest() else {
                    continue;
                };
                match event.load() {
                    Ok(new_config) => {
                        config.store(Arc::new(new_config));
                        log::info!("Reloaded attention config from {}", event.path.display());
                        if handle.send(AttentionEvent::ConfigChanged).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        log::error!(
                            "Failed to reload attention config from {}: {}",
                            event.path.display(),
                            e
                        );
                    }
                }
            }
        });
        if let Some(previous) = self.reload_task.replace(task) {
            previous.abort();
        }
    }

    /// Stop the decision task and hand the engine back.
    pub async fn shutdown(self) -> Result<AttentionEngine, RuntimeError> {
        if let Some(reload) = self.reload_task {
            reload.abort();
        }
        // A closed channel means the task already ended; join reports why.
        let _ = self.handle.tx.send(Message::Shutdown);
        let engine = self.task.await?;
        log::debug!("Attention runtime stopped");
        Ok(engine)
    }
}

async fn run_loop<H>(
    mut engine: AttentionEngine,
    host: Arc<H>,
    mut rx: mpsc::UnboundedReceiver<Message>,
    tx: mpsc::UnboundedSender<Message>,
    focus_tx: mpsc::UnboundedSender<FocusRequest>,
) -> AttentionEngine
where
    H: HostFocusQuery + Send + Sync + 'static,
{
    while let Some(message) = rx.recv().await {
        let event = match message {
            Message::Event(event) => event,
            Message::Shutdown => break,
        };

        let now = tokio::time::Instant::now().into_std();
        for command in engine.handle(event, now, host.as_ref()) {
            match command {
                HostCommand::ArmTimer { after, ticket } => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        if tx
                            .send(Message::Event(AttentionEvent::TimerFired(ticket)))
                            .is_err()
                        {
                            crate::debug_trace!(TIMER, "runtime gone, dropping {}", ticket.kind);
                        }
                    });
                }
                HostCommand::FocusSurface { surface, container } => {
                    if focus_tx.send(FocusRequest { surface, container }).is_err() {
                        crate::debug_error!(
                            ATTN,
                            "focus receiver dropped, cannot focus surface {}",
                            surface
                        );
                    }
                }
            }
        }
    }
    engine
}
