//! Include file access
//!
//! The resolution stages never touch the filesystem themselves. Include targets are
//! fetched through a [`FileResolver`]; the crate ships two:
//!
//! - [`FsResolver`] reads files relative to the including document, optionally giving up
//!   on a file after a timeout so one slow mount can't stall the whole document. A read
//!   that times out keeps its thread until the read returns; the number of such threads
//!   is capped, after which further includes fail straight away.
//! - [`MemoryResolver`] serves content from a map, for tests and embedded use.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("file not found: {path}")]
    NotFound { path: String },
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("timed out after {timeout:?} reading {path}")]
    TimedOut { path: String, timeout: Duration },
    #[error("not reading {path}: {limit} earlier reads are still stalled")]
    Stalled { path: String, limit: usize },
}

pub trait FileResolver: Send + Sync {
    /// Content of `path`, resolved against `base` (the directory of the including file)
    /// unless absolute.
    fn resolve(&self, path: &str, base: &Path) -> Result<Vec<u8>, ResolveError>;
}

/// Join `path` onto `base` and drop `.`/`..` components lexically.
pub fn resolve_path(path: &str, base: &Path) -> PathBuf {
    let joined = if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        base.join(path)
    };
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Default cap on reader threads left behind by timed-out reads.
pub const DEFAULT_MAX_STALLED_READS: usize = 8;

/// Reads include targets from disk.
///
/// Without a timeout files are read on the calling thread. With one, each read runs on
/// its own thread. A thread whose read outlives the timeout cannot be cancelled and stays
/// blocked until the read returns. Once `max_stalled` reader threads are outstanding,
/// reads fail with [`ResolveError::Stalled`] instead of spawning more. Clones share the
/// count.
#[derive(Debug, Clone)]
pub struct FsResolver {
    timeout: Option<Duration>,
    max_stalled: usize,
    in_flight: Arc<AtomicUsize>,
}

impl Default for FsResolver {
    fn default() -> Self {
        Self {
            timeout: None,
            max_stalled: DEFAULT_MAX_STALLED_READS,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }
}

/// Releases one reader slot when the reader thread ends, however it ends.
struct ReaderSlot(Arc<AtomicUsize>);

impl Drop for ReaderSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_stalled(mut self, max_stalled: usize) -> Self {
        self.max_stalled = max_stalled;
        self
    }

    /// Reader threads still running, stalled ones included.
    pub fn reads_in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn read(path: &Path) -> Result<Vec<u8>, ResolveError> {
        std::fs::read(path).map_err(|err| {
            let path = path.display().to_string();
            match err.kind() {
                std::io::ErrorKind::NotFound => ResolveError::NotFound { path },
                _ => ResolveError::Io {
                    path,
                    message: err.to_string(),
                },
            }
        })
    }

    fn acquire_slot(&self, path: &Path) -> Result<ReaderSlot, ResolveError> {
        let limit = self.max_stalled;
        self.in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                (count < limit).then_some(count + 1)
            })
            .map(|_| ReaderSlot(self.in_flight.clone()))
            .map_err(|_| ResolveError::Stalled {
                path: path.display().to_string(),
                limit,
            })
    }
}

impl FileResolver for FsResolver {
    fn resolve(&self, path: &str, base: &Path) -> Result<Vec<u8>, ResolveError> {
        let full = resolve_path(path, base);
        let Some(timeout) = self.timeout else {
            return Self::read(&full);
        };

        let slot = self.acquire_slot(&full)?;
        let (tx, rx) = mpsc::channel();
        let target = full.clone();
        thread::spawn(move || {
            let _slot = slot;
            let _ = tx.send(Self::read(&target));
        });
        rx.recv_timeout(timeout).unwrap_or_else(|_| {
            tracing::warn!(path = %full.display(), ?timeout, "include read timed out");
            Err(ResolveError::TimedOut {
                path: full.display().to_string(),
                timeout,
            })
        })
    }
}

/// Serves include targets from memory. Keys are normalized paths, so
/// `"./chapters/../intro.adoc"` and `"intro.adoc"` name the same entry.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: &str, content: impl Into<Vec<u8>>) -> &mut Self {
        self.files
            .insert(resolve_path(path, Path::new("")), content.into());
        self
    }

    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.add(path, content);
        self
    }

    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: Into<Vec<u8>>,
    {
        let mut resolver = Self::new();
        for (path, content) in files {
            resolver.add(path.as_ref(), content);
        }
        resolver
    }
}

impl FileResolver for MemoryResolver {
    fn resolve(&self, path: &str, base: &Path) -> Result<Vec<u8>, ResolveError> {
        let full = resolve_path(path, base);
        self.files
            .get(&full)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                path: full.display().to_string(),
            })
    }
}
