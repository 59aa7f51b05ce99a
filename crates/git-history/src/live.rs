//! Background-refreshed history index.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

use crate::root::RepoRoot;
use crate::snapshot::HistorySnapshot;
use crate::HistoryError;

/// Source of full history snapshots for a repository.
pub trait HistoryLoader: Send + Sync + 'static {
    fn load(&self, root: &RepoRoot) -> Result<HistorySnapshot, HistoryError>;
}

/// Notification broadcast when a refresh finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshEvent {
    /// A complete snapshot for `root` is now available.
    FullDataPack { root: RepoRoot, commits: usize },
    /// Loading `root` failed; the previous snapshot (if any) is kept.
    Failed { root: RepoRoot, message: String },
}

impl RefreshEvent {
    pub fn root(&self) -> &RepoRoot {
        match self {
            Self::FullDataPack { root, .. } | Self::Failed { root, .. } => root,
        }
    }
}

/// How long callers wait for a refresh to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
    pub timeout: Duration,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}

/// A snapshot tagged with the refresh that produced it.
type Stored = (u64, Arc<HistorySnapshot>);

struct Inner {
    loader: Box<dyn HistoryLoader>,
    snapshots: RwLock<HashMap<RepoRoot, Stored>>,
    subscribers: Mutex<Vec<Sender<RefreshEvent>>>,
    /// Refreshes are numbered when started; a later start always wins.
    next_generation: AtomicU64,
}

impl Inner {
    fn publish(&self, event: RefreshEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn run_refresh(&self, root: RepoRoot, generation: u64) {
        tracing::debug!(root = %root, generation, "history refresh started");
        let started = Instant::now();
        match self.loader.load(&root) {
            Ok(snapshot) => {
                let commits = {
                    let mut snapshots = self
                        .snapshots
                        .write()
                        .unwrap_or_else(PoisonError::into_inner);
                    let newer = snapshots
                        .get(&root)
                        .filter(|(current, _)| *current > generation)
                        .map(|(current, kept)| (*current, kept.len()));
                    match newer {
                        Some((current, kept)) => {
                            tracing::debug!(
                                root = %root,
                                generation,
                                current,
                                "dropping stale history refresh"
                            );
                            kept
                        }
                        None => {
                            let commits = snapshot.len();
                            snapshots.insert(root.clone(), (generation, Arc::new(snapshot)));
                            commits
                        }
                    }
                };
                tracing::debug!(
                    root = %root,
                    commits,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "history refresh finished"
                );
                self.publish(RefreshEvent::FullDataPack { root, commits });
            }
            Err(error) => {
                tracing::warn!(root = %root, error = %error, "history refresh failed");
                self.publish(RefreshEvent::Failed {
                    root,
                    message: error.to_string(),
                });
            }
        }
    }
}

/// A history index that reloads repositories in the background.
///
/// Readers always see a complete snapshot: a refresh builds the new snapshot
/// off to the side and swaps it in whole. Cloning the index is cheap and
/// every clone shares the same snapshots and subscribers.
#[derive(Clone)]
pub struct LiveHistoryIndex {
    inner: Arc<Inner>,
}

impl LiveHistoryIndex {
    pub fn new(loader: impl HistoryLoader) -> Self {
        Self {
            inner: Arc::new(Inner {
                loader: Box::new(loader),
                snapshots: RwLock::new(HashMap::new()),
                subscribers: Mutex::new(Vec::new()),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    /// The latest complete snapshot for `root`, if one has been loaded.
    pub fn snapshot(&self, root: &RepoRoot) -> Option<Arc<HistorySnapshot>> {
        self.inner
            .snapshots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(root)
            .map(|(_, snapshot)| Arc::clone(snapshot))
    }

    /// Receive every `RefreshEvent` published from now on.
    pub fn subscribe(&self) -> Receiver<RefreshEvent> {
        let (tx, rx) = channel::unbounded();
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Start reloading `root` on a background thread.
    ///
    /// Completion is announced through `subscribe`; the returned handle is
    /// only needed by callers that want to join the worker. When refreshes
    /// of the same root overlap, the one started last is kept even if an
    /// earlier one finishes after it.
    pub fn refresh(&self, root: RepoRoot) -> Result<JoinHandle<()>, HistoryError> {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        let handle = std::thread::Builder::new()
            .name("history-refresh".into())
            .spawn(move || inner.run_refresh(root, generation))?;
        Ok(handle)
    }

    /// Block until a full data pack for `root` arrives on `events`.
    ///
    /// Events for other roots are skipped. Running out of time is an error,
    /// never an empty result.
    pub fn wait_for_full_pack(
        &self,
        events: &Receiver<RefreshEvent>,
        root: &RepoRoot,
        timeout: Duration,
    ) -> Result<Arc<HistorySnapshot>, HistoryError> {
        let deadline = Instant::now() + timeout;
        loop {
            match events.recv_deadline(deadline) {
                Ok(event) if event.root() != root => continue,
                Ok(RefreshEvent::FullDataPack { .. }) => {
                    return self
                        .snapshot(root)
                        .ok_or_else(|| HistoryError::UnknownRoot(root.clone()));
                }
                Ok(RefreshEvent::Failed { root, message }) => {
                    return Err(HistoryError::RefreshFailed { root, message });
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(HistoryError::RefreshTimeout {
                        root: root.clone(),
                        timeout,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(HistoryError::RefreshFailed {
                        root: root.clone(),
                        message: "history index was dropped".into(),
                    });
                }
            }
        }
    }

    /// Refresh `root` and wait for the result.
    pub fn refresh_and_wait(
        &self,
        root: &RepoRoot,
        options: &RefreshOptions,
    ) -> Result<Arc<HistorySnapshot>, HistoryError> {
        let events = self.subscribe();
        self.refresh(root.clone())?;
        self.wait_for_full_pack(&events, root, options.timeout)
    }
}
