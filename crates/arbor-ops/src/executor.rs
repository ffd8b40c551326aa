//! Background execution of file operations.
//!
//! Every operation runs on tokio's blocking pool behind a semaphore sized by
//! `max_concurrent_ops`, and resolves to the same result the synchronous
//! function would return. Start and finish events are broadcast so that a
//! presentation layer can follow progress without awaiting the futures.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Semaphore, broadcast};
use tracing::debug;

use arbor_core::{
    Clipboard, ClipboardEntry, EntryInfo, EntrySummary, ExplorerConfig, ExplorerTree, OpsError,
    OpsResult,
};

use crate::OPERATION_CHANNEL_SIZE;
use crate::operation::FileOperation;
use crate::paste::PasteOutcome;
use crate::progress::{OperationComplete, OperationProgress};

/// Lifecycle notification for one operation.
#[derive(Debug, Clone)]
pub enum OperationEvent {
    /// The operation obtained a worker and is about to run.
    Started(FileOperation),
    /// The operation returned.
    Finished {
        operation: FileOperation,
        complete: OperationComplete,
    },
}

/// Bounded pool running file operations off the caller's task.
#[derive(Debug, Clone)]
pub struct OperationExecutor {
    config: Arc<ExplorerConfig>,
    permits: Arc<Semaphore>,
    events: broadcast::Sender<OperationEvent>,
}

impl OperationExecutor {
    /// Create an executor for the given configuration.
    pub fn new(config: ExplorerConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_ops.max(1)));
        let (events, _) = broadcast::channel(OPERATION_CHANNEL_SIZE);
        Self {
            config: Arc::new(config),
            permits,
            events,
        }
    }

    /// The configuration operations run with.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Receive start and finish events for every operation from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<OperationEvent> {
        self.events.subscribe()
    }

    /// Create directory `name` inside `parent`.
    pub async fn create_directory(&self, parent: PathBuf, name: String) -> OpsResult<PathBuf> {
        let operation = FileOperation::create_directory(parent.clone(), name.clone());
        self.run(
            operation,
            move || crate::create_directory(&parent, &name),
            summarize_result,
        )
        .await?
    }

    /// Delete `path` and everything below it.
    ///
    /// Partial failures are reported in the returned [`OperationComplete`];
    /// the error case is reserved for a worker that never returned.
    pub async fn delete(&self, path: PathBuf) -> OpsResult<OperationComplete> {
        let operation = FileOperation::Delete { path: path.clone() };
        self.run(
            operation,
            move || crate::delete_recursive(&path),
            |_, complete| complete.clone(),
        )
        .await
    }

    /// Rename `source` within its directory.
    pub async fn rename(&self, source: PathBuf, new_name: String) -> OpsResult<PathBuf> {
        let operation = FileOperation::rename(source.clone(), new_name.clone());
        self.run(
            operation,
            move || crate::rename(&source, &new_name),
            summarize_result,
        )
        .await?
    }

    /// Paste `entry` into `target_dir`, returning what the clipboard should
    /// hold afterwards.
    pub async fn paste(&self, entry: Option<ClipboardEntry>, target_dir: PathBuf) -> PasteOutcome {
        let Some(entry) = entry else {
            return crate::paste(None, &target_dir, &self.config.copy_label);
        };

        let operation = FileOperation::Paste {
            source: entry.source.clone(),
            mode: entry.mode,
            target: target_dir.clone(),
        };
        let label = self.config.copy_label.clone();
        let kept = entry.clone();

        let outcome = self
            .run(
                operation,
                move || crate::paste(Some(entry), &target_dir, &label),
                |operation, outcome| summarize_result(operation, &outcome.result),
            )
            .await;

        outcome.unwrap_or_else(|e| PasteOutcome {
            remaining: Some(kept),
            result: Err(e),
        })
    }

    /// Paste the clipboard's entry into `target_dir`, updating the clipboard in place.
    pub async fn paste_into(&self, clipboard: &mut Clipboard, target_dir: PathBuf) -> OpsResult<PathBuf> {
        let outcome = self.paste(clipboard.take(), target_dir).await;
        clipboard.restore(outcome.remaining);
        outcome.result
    }

    /// Recursive size of `path` in bytes.
    pub async fn compute_size(&self, path: PathBuf) -> OpsResult<u64> {
        let operation = FileOperation::ComputeSize { path: path.clone() };
        self.run(
            operation,
            move || crate::compute_size(&path),
            |operation, bytes| {
                let mut complete = summarize_result(operation, &Ok::<_, OpsError>(()));
                complete.bytes_processed = *bytes;
                complete
            },
        )
        .await
    }

    /// Metadata record of `path`.
    pub async fn describe(&self, path: PathBuf) -> OpsResult<EntryInfo> {
        let operation = FileOperation::Describe { path: path.clone() };
        self.run(operation, move || crate::describe(&path), summarize_result)
            .await?
    }

    /// Immediate children of `dir` in display order.
    pub async fn list_children(&self, dir: PathBuf) -> OpsResult<Vec<EntrySummary>> {
        let operation = FileOperation::List { dir: dir.clone() };
        let config = Arc::clone(&self.config);
        self.run(
            operation,
            move || crate::list_children(&dir, &config),
            summarize_result,
        )
        .await?
    }

    /// Load the children of `dir` into `tree` if it has not been expanded yet.
    ///
    /// Returns the number of children now attached to `dir`.
    pub async fn expand(&self, tree: &mut ExplorerTree, dir: &Path) -> OpsResult<usize> {
        if tree.needs_load(dir) {
            let children = self.list_children(dir.to_path_buf()).await?;
            tree.set_children(dir, children);
        }
        Ok(tree.find(dir).map_or(0, |node| node.children().len()))
    }

    async fn run<T, F, S>(&self, operation: FileOperation, job: F, summarize: S) -> OpsResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
        S: FnOnce(&FileOperation, &T) -> OperationComplete,
    {
        let _permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| OpsError::TaskFailed {
                message: e.to_string(),
            })?;

        debug!(operation = %operation.operation_type(), path = %operation.path().display(), "starting");
        // Nobody listening is fine.
        let _ = self.events.send(OperationEvent::Started(operation.clone()));

        let output = tokio::task::spawn_blocking(job)
            .await
            .map_err(|e| OpsError::TaskFailed {
                message: e.to_string(),
            });

        let complete = match &output {
            Ok(value) => summarize(&operation, value),
            Err(e) => {
                let mut progress = OperationProgress::new(operation.operation_type());
                progress.add_error(operation.path(), e.to_string());
                progress.finish()
            }
        };
        debug!(operation = %operation.operation_type(), "{}", complete.summary());
        let _ = self.events.send(OperationEvent::Finished {
            operation,
            complete,
        });

        output
    }
}

fn summarize_result<T>(operation: &FileOperation, result: &OpsResult<T>) -> OperationComplete {
    OperationComplete::from_result(operation.operation_type(), operation.path(), result)
}
