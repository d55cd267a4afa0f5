//! GPIO key driver with a background event loop.
//!
//! A [`Key`] owns one input-event device node and, once started, exactly
//! one background task. The task reads raw records from the node,
//! classifies them into press/release/long-press events and delivers them
//! to the single registered callback.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──init()──► ready ──start()──► running ──stop()──► ready
//!                     ▲                                      │
//!                     └────────────── start() again ─────────┘
//! ```
//!
//! `init()` opens the node (idempotent), `start()` spawns the task,
//! `stop()` signals it and joins. After `stop()` the device stays
//! initialized, so `start()` can run again without a fresh `init()`.
//! Dropping a running `Key` aborts the task.
//!
//! # Callback ownership
//!
//! The callback slot is owned exclusively by the loop task. Before
//! `start()`, [`Key::set_callback`] stages the callback; while running it
//! sends the replacement over a command channel that the loop drains at
//! the top of each iteration. The caller's thread never touches the slot
//! the loop reads, so replacement is race-free by construction.
//!
//! # Examples
//!
//! ```no_run
//! use devboard_drivers::key::Key;
//!
//! #[tokio::main]
//! async fn main() -> devboard_core::Result<()> {
//!     let mut key = Key::new("input/event2");
//!     key.init()?;
//!     key.set_callback(Box::new(|code, event| {
//!         println!("key {code}: {event}");
//!     }))
//!     .await?;
//!     key.start()?;
//!
//!     tokio::signal::ctrl_c().await.ok();
//!     key.stop().await?;
//!     Ok(())
//! }
//! ```

mod classifier;
mod evdev;
mod mock;
mod source;

pub use classifier::{KeyClassifier, KeyConfig};
pub use evdev::EvdevSource;
pub use mock::{MockKeyHandle, MockKeySource};
pub use source::{AnyKeySource, KeyEventSource};

use devboard_core::{Error, KeyEvent, Result};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Handler invoked by the event loop for each classified key event.
///
/// Runs on the background task, never on the caller's thread.
pub type KeyCallback = Box<dyn FnMut(u16, KeyEvent) + Send + 'static>;

/// Commands consumed by the event loop at the top of each iteration.
enum KeyCommand {
    /// Replace the callback slot.
    SetCallback(KeyCallback),
}

/// Running-state plumbing, present only between `start()` and `stop()`.
struct Worker {
    commands: mpsc::Sender<KeyCommand>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,

    /// Hands the source and the loop outcome back when the loop exits.
    /// A oneshot rather than the join value so a finished worker can be
    /// reaped without awaiting the task.
    done: oneshot::Receiver<(AnyKeySource, Result<()>)>,
}

/// Driver for a GPIO key exposed as an input-event device node.
pub struct Key {
    /// Logical device name.
    name: String,

    /// Classification tunables, fixed at construction.
    config: KeyConfig,

    /// The event source. `None` before `init()` and while the loop task
    /// owns it; handed back when the task exits.
    source: Option<AnyKeySource>,

    /// Callback staged before `start()` hands it to the loop.
    staged_callback: Option<KeyCallback>,

    /// Background task state while running.
    worker: Option<Worker>,
}

impl Key {
    /// Create an uninitialized driver for `/dev/<name>` with default
    /// classification settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, KeyConfig::default())
    }

    /// Create an uninitialized driver with explicit classification settings.
    pub fn with_config(name: impl Into<String>, config: KeyConfig) -> Self {
        Self {
            name: name.into(),
            config,
            source: None,
            staged_callback: None,
            worker: None,
        }
    }

    /// Create an already-initialized driver around an existing source.
    ///
    /// Used with [`MockKeySource`] in tests and bench rigs; `init()` on
    /// the returned driver is the usual no-op.
    pub fn with_source(name: impl Into<String>, config: KeyConfig, source: AnyKeySource) -> Self {
        Self {
            name: name.into(),
            config,
            source: Some(source),
            staged_callback: None,
            worker: None,
        }
    }

    /// Open the input-event device node read-only. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `DevOpen` if the node cannot be opened; `is_ready()`
    /// remains false in that case.
    pub fn init(&mut self) -> Result<()> {
        if self.source.is_some() || self.worker.is_some() {
            warn!(device = %self.name, "device already initialized");
            return Ok(());
        }

        let source = EvdevSource::open(self.name.clone())?;
        self.source = Some(AnyKeySource::Evdev(source));
        info!(device = %self.name, "init success");
        Ok(())
    }

    /// Spawn the background event loop.
    ///
    /// A second call while the loop is actually running warns and succeeds
    /// without spawning another task. A worker whose loop has already
    /// exited (source read failure) is reaped first, so `start()` after a
    /// failed loop spawns a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `DevNotReady` before a successful `init()`.
    pub fn start(&mut self) -> Result<()> {
        match &self.worker {
            Some(worker) if !worker.task.is_finished() => {
                warn!(device = %self.name, "device already running");
                return Ok(());
            }
            _ => {}
        }
        if let Some(worker) = self.worker.take() {
            self.reap(worker);
        }

        let Some(source) = self.source.take() else {
            error!(device = %self.name, "not ready (not initialized)");
            return Err(Error::not_ready(self.name.clone()));
        };

        let (commands, cmd_rx) = mpsc::channel(8);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let (done_tx, done) = oneshot::channel();
        let classifier = KeyClassifier::new(self.config.clone());
        let callback = self.staged_callback.take();

        let task = tokio::spawn(event_loop(
            self.name.clone(),
            source,
            classifier,
            callback,
            cmd_rx,
            shutdown_rx,
            done_tx,
        ));

        self.worker = Some(Worker {
            commands,
            shutdown,
            task,
            done,
        });
        info!(device = %self.name, "start success");
        Ok(())
    }

    /// Take the source and the loop outcome back from an exited worker.
    ///
    /// Callers must ensure the task has finished (or been awaited); only
    /// then is the oneshot guaranteed to hold the loop's parting message.
    fn reap(&mut self, mut worker: Worker) {
        match worker.done.try_recv() {
            Ok((source, result)) => {
                self.source = Some(source);
                if let Err(e) = result {
                    warn!(device = %self.name, error = %e, "event loop had terminated with error");
                }
            }
            Err(_) => {
                // Task panicked before handing the source back; the device
                // needs a fresh init().
                error!(device = %self.name, "event loop exited without returning the source");
            }
        }
    }

    /// Stop the background event loop and join it.
    ///
    /// A no-op returning `Ok` when not running. Otherwise signals the
    /// loop and blocks (asynchronously) until it has exited; the loop
    /// observes the signal even while waiting for a device event, so this
    /// returns promptly on an idle device. A blocking read already issued
    /// against the real node finishes in the background on the next
    /// device event.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(mut worker) = self.worker.take() else {
            return Ok(());
        };

        let _ = worker.shutdown.send(true);

        if let Err(e) = (&mut worker.task).await {
            error!(device = %self.name, error = %e, "event loop task failed to join");
        }
        self.reap(worker);

        info!(device = %self.name, "stop success");
        Ok(())
    }

    /// Register or replace the event callback.
    ///
    /// Before `start()` the callback is staged and handed to the loop on
    /// start. While running it is delivered over the command channel and
    /// swapped in at the top of the next loop iteration.
    ///
    /// # Errors
    ///
    /// Returns `DevIo` if the running loop can no longer accept commands.
    pub async fn set_callback(&mut self, callback: KeyCallback) -> Result<()> {
        if let Some(worker) = &self.worker {
            worker
                .commands
                .send(KeyCommand::SetCallback(callback))
                .await
                .map_err(|_| Error::dev_io(self.name.clone(), "command channel closed"))?;
        } else {
            self.staged_callback = Some(callback);
        }
        Ok(())
    }

    /// Whether `init()` has succeeded.
    pub fn is_ready(&self) -> bool {
        self.source.is_some() || self.worker.is_some()
    }

    /// Whether the background loop is active.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.task.is_finished())
    }

    /// Logical device name.
    pub fn device_name(&self) -> &str {
        &self.name
    }

    /// Classification settings.
    pub fn config(&self) -> &KeyConfig {
        &self.config
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        if let Some(worker) = &self.worker {
            worker.task.abort();
        }
    }
}

/// The background polling loop.
///
/// On exit the source and the loop outcome go back over `done`: `Ok` for
/// cooperative shutdown, the read error otherwise.
async fn event_loop(
    name: String,
    mut source: AnyKeySource,
    mut classifier: KeyClassifier,
    mut callback: Option<KeyCallback>,
    mut commands: mpsc::Receiver<KeyCommand>,
    mut shutdown: watch::Receiver<bool>,
    done: oneshot::Sender<(AnyKeySource, Result<()>)>,
) {
    debug!(device = %name, "event loop started");

    let result = loop {
        // The callback slot belongs to this task; replacements arrive as
        // commands and are applied here, before the next read.
        while let Ok(command) = commands.try_recv() {
            match command {
                KeyCommand::SetCallback(cb) => callback = Some(cb),
            }
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break Ok(());
                }
            }
            event = source.read_event() => {
                match event {
                    Ok(event) => {
                        if !event.is_key_event() {
                            continue;
                        }
                        debug!(device = %name, code = event.code, value = event.value, "key record");

                        if let Some(out) = classifier.classify(event.code, event.value, Instant::now())
                            && let Some(cb) = callback.as_mut()
                        {
                            cb(event.code, out);
                        }
                    }
                    Err(e) => {
                        if *shutdown.borrow() {
                            // Expected unblocking path during stop()
                            break Ok(());
                        }
                        error!(device = %name, error = %e, "read from device failed");
                        break Err(e);
                    }
                }
            }
        }
    };

    debug!(device = %name, "event loop ended");
    let _ = done.send((source, result));
}
