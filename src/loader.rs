//! Dataset Loader Module
//! Fetch, decode, parse, assign: one CSV resource into a typed Dataset.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::data::{parse_csv, Dataset, ParseError};
use crate::fetch::{FetchError, HttpFetcher};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Network failure: {0}")]
    Network(#[source] FetchError),
    #[error("Decode failure: {0}")]
    Decode(#[source] FetchError),
    #[error("Parse failure: {0}")]
    Parse(#[from] ParseError),
    #[error("Load was cancelled")]
    Cancelled,
    #[error("Load timed out")]
    TimedOut,
}

impl From<FetchError> for LoaderError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Decode { .. } => LoaderError::Decode(e),
            _ => LoaderError::Network(e),
        }
    }
}

/// Event from a background load task.
#[derive(Debug)]
pub enum LoadEvent {
    Progress(String),
    Complete(Dataset),
    Failed(LoaderError),
}

/// Loads CSV resources into an in-memory typed dataset.
///
/// Owns the dataset state the original code kept in a module-scoped
/// variable: empty at creation, replaced wholesale on each successful
/// load, cleared on teardown. One loader per view; loaders share nothing.
#[derive(Debug)]
pub struct DatasetLoader {
    fetcher: HttpFetcher,
    dataset: Option<Dataset>,
    source: Option<String>,
}

impl DatasetLoader {
    pub fn new() -> Result<Self, LoaderError> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }

    pub fn with_fetcher(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            dataset: None,
            source: None,
        }
    }

    /// Load a CSV resource: fetch, decode, parse, assign.
    ///
    /// Blocks until the resource is retrieved. Any previously held dataset
    /// is replaced in full; on failure the previous dataset is kept and the
    /// error is returned to the caller, never swallowed.
    pub fn load(&mut self, path: &str) -> Result<&Dataset, LoaderError> {
        let text = self.fetcher.fetch_text(path)?;
        let dataset = parse_csv(&text)?;

        debug!(
            path = %path,
            rows = dataset.len(),
            columns = dataset.columns().len(),
            "dataset loaded"
        );

        self.source = Some(path.to_string());
        Ok(self.dataset.insert(dataset))
    }

    /// Start a background load of `path` (non-blocking).
    ///
    /// The worker reports over a channel; apply a completed dataset with
    /// [`DatasetLoader::set_dataset`]. Dropping the returned task detaches
    /// the worker: its remaining sends go nowhere and nothing is assigned.
    pub fn spawn(&self, path: &str) -> LoadTask {
        let (tx, rx) = channel();
        let cancelled = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&cancelled);
        let fetcher = self.fetcher.clone();
        let path = path.to_string();

        thread::spawn(move || {
            let _ = tx.send(LoadEvent::Progress(format!("Fetching {path}...")));
            if flag.load(Ordering::SeqCst) {
                let _ = tx.send(LoadEvent::Failed(LoaderError::Cancelled));
                return;
            }

            let text = match fetcher.fetch_text(&path) {
                Ok(text) => text,
                Err(e) => {
                    let _ = tx.send(LoadEvent::Failed(e.into()));
                    return;
                }
            };

            if flag.load(Ordering::SeqCst) {
                let _ = tx.send(LoadEvent::Failed(LoaderError::Cancelled));
                return;
            }
            let _ = tx.send(LoadEvent::Progress("Parsing CSV...".to_string()));

            match parse_csv(&text) {
                Ok(dataset) => {
                    debug!(
                        path = %path,
                        rows = dataset.len(),
                        columns = dataset.columns().len(),
                        "dataset loaded in background"
                    );
                    let _ = tx.send(LoadEvent::Complete(dataset));
                }
                Err(e) => {
                    let _ = tx.send(LoadEvent::Failed(e.into()));
                }
            }
        });

        LoadTask { rx, cancelled }
    }

    /// Assign a dataset directly (used for background loading).
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(dataset);
    }

    pub fn get_dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Get list of column names from the loaded dataset.
    pub fn get_columns(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(|ds| ds.columns().to_vec())
            .unwrap_or_default()
    }

    /// Get the number of records in the loaded dataset.
    pub fn get_row_count(&self) -> usize {
        self.dataset.as_ref().map(Dataset::len).unwrap_or(0)
    }

    /// Get the path of the last successful load.
    pub fn get_source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Drop the held dataset (view teardown).
    pub fn clear(&mut self) {
        self.dataset = None;
        self.source = None;
    }

    /// Take ownership of the held dataset, leaving the loader empty.
    pub fn take_dataset(&mut self) -> Option<Dataset> {
        self.source = None;
        self.dataset.take()
    }
}

/// Handle to a background load.
///
/// Poll it per frame, block on it, bound it with a timeout, or cancel it.
/// Cancellation is checked at the worker's suspension points; a cancelled
/// task never yields a dataset.
#[derive(Debug)]
pub struct LoadTask {
    rx: Receiver<LoadEvent>,
    cancelled: Arc<AtomicBool>,
}

impl LoadTask {
    /// Request cancellation. The in-flight request itself is not aborted;
    /// its result is discarded at the next checkpoint.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Next pending event, if any (non-blocking).
    pub fn poll(&self) -> Option<LoadEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the load finishes.
    pub fn wait(self) -> Result<Dataset, LoaderError> {
        loop {
            match self.rx.recv() {
                Ok(LoadEvent::Progress(_)) => continue,
                Ok(LoadEvent::Complete(dataset)) => {
                    if self.is_cancelled() {
                        return Err(LoaderError::Cancelled);
                    }
                    return Ok(dataset);
                }
                Ok(LoadEvent::Failed(e)) => return Err(e),
                Err(_) => return Err(LoaderError::Cancelled),
            }
        }
    }

    /// Block until the load finishes or the timeout elapses.
    ///
    /// On timeout the task is cancelled and `TimedOut` is returned.
    pub fn wait_timeout(self, timeout: Duration) -> Result<Dataset, LoaderError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(LoadEvent::Progress(_)) => continue,
                Ok(LoadEvent::Complete(dataset)) => {
                    if self.is_cancelled() {
                        return Err(LoaderError::Cancelled);
                    }
                    return Ok(dataset);
                }
                Ok(LoadEvent::Failed(e)) => return Err(e),
                Err(RecvTimeoutError::Timeout) => {
                    self.cancel();
                    return Err(LoaderError::TimedOut);
                }
                Err(RecvTimeoutError::Disconnected) => return Err(LoaderError::Cancelled),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;
    use std::collections::HashMap;

    fn dataset_of(rows: &[f64]) -> Dataset {
        let records = rows
            .iter()
            .map(|v| {
                let mut fields = HashMap::new();
                fields.insert("a".to_string(), Value::Number(*v));
                crate::data::Record::new(fields)
            })
            .collect();
        Dataset::new(vec!["a".to_string()], records)
    }

    #[test]
    fn loader_starts_empty() {
        let loader = DatasetLoader::with_fetcher(
            HttpFetcher::new()
                .ok()
                .unwrap_or_else(|| panic!("Should create fetcher")),
        );
        assert!(loader.get_dataset().is_none());
        assert_eq!(loader.get_row_count(), 0);
        assert!(loader.get_columns().is_empty());
        assert!(loader.get_source().is_none());
    }

    #[test]
    fn set_dataset_replaces_wholesale() {
        let mut loader = DatasetLoader::with_fetcher(
            HttpFetcher::new()
                .ok()
                .unwrap_or_else(|| panic!("Should create fetcher")),
        );
        loader.set_dataset(dataset_of(&[1.0, 2.0, 3.0]));
        assert_eq!(loader.get_row_count(), 3);

        loader.set_dataset(dataset_of(&[9.0]));
        assert_eq!(loader.get_row_count(), 1);
        assert_eq!(
            loader.get_dataset().and_then(|ds| ds.get(0, "a")),
            Some(&Value::Number(9.0))
        );
    }

    #[test]
    fn clear_drops_dataset_and_source() {
        let mut loader = DatasetLoader::with_fetcher(
            HttpFetcher::new()
                .ok()
                .unwrap_or_else(|| panic!("Should create fetcher")),
        );
        loader.set_dataset(dataset_of(&[1.0]));
        loader.clear();
        assert!(loader.get_dataset().is_none());
        assert!(loader.get_source().is_none());
    }

    #[test]
    fn take_dataset_leaves_loader_empty() {
        let mut loader = DatasetLoader::with_fetcher(
            HttpFetcher::new()
                .ok()
                .unwrap_or_else(|| panic!("Should create fetcher")),
        );
        loader.set_dataset(dataset_of(&[1.0, 2.0]));
        let taken = loader.take_dataset();
        assert_eq!(taken.map(|ds| ds.len()), Some(2));
        assert!(loader.get_dataset().is_none());
    }

    #[test]
    fn fetch_error_classification() {
        let network: LoaderError = FetchError::Status {
            url: "http://x/energy.csv".into(),
            status: 404,
        }
        .into();
        assert!(matches!(network, LoaderError::Network(_)));

        let decode: LoaderError = FetchError::Decode {
            url: "http://x/energy.csv".into(),
            source: String::from_utf8(vec![0xff]).unwrap_err(),
        }
        .into();
        assert!(matches!(decode, LoaderError::Decode(_)));
    }
}
