use std::path::{Path, PathBuf};

use crate::progress::CancelToken;

/// Lifecycle of one export task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportStatus {
    Pending,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl ExportStatus {
    /// Terminal tasks leave the queue's live view.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExportStatus::Completed | ExportStatus::Cancelled | ExportStatus::Failed
        )
    }
}

/// One queued preview→PNG export.
#[derive(Clone, Debug)]
pub struct ExportTask {
    pub id: u64,
    pub source: PathBuf,
    /// Derived from `source` by extension substitution.
    pub output: PathBuf,
    pub progress: u8,
    pub status: ExportStatus,
    /// Shared with the runner; cancelling a pending task removes it before
    /// any engine call, cancelling a running one takes effect at the next
    /// safe point.
    pub cancel: CancelToken,
}

/// Output path for a source file: same location, `.png` extension.
pub fn output_path_for(source: &Path) -> PathBuf {
    source.with_extension("png")
}

/// Progress feed from the queue runner back to the owning view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportQueueEvent {
    Started { id: u64 },
    Progress { id: u64, percent: u8 },
    Finished { id: u64, status: ExportStatus },
}

/// FIFO queue of export tasks; at most one task runs at a time.
///
/// Each export re-establishes the engine's shared current-image state (open,
/// then export), the same state the preview and pixel probe read, so
/// overlapping tasks would corrupt the open document.
#[derive(Debug, Default)]
pub struct ExportQueue {
    next_id: u64,
    tasks: Vec<ExportTask>,
}

impl ExportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a source file.
    pub fn enqueue(&mut self, source: PathBuf) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.tasks.push(ExportTask {
            id,
            output: output_path_for(&source),
            source,
            progress: 0,
            status: ExportStatus::Pending,
            cancel: CancelToken::new(),
        });
        id
    }

    /// Request cancellation of a task. Returns its status at request time so
    /// the caller can decide whether a backend abort is also needed.
    pub fn request_cancel(&mut self, id: u64) -> Option<ExportStatus> {
        self.tasks.iter().find(|task| task.id == id).map(|task| {
            task.cancel.cancel();
            task.status
        })
    }

    /// Pending tasks in FIFO order, for dispatch to the runner. Cancel
    /// tokens are shared, so a later cancel request still reaches the batch.
    pub fn pending_batch(&self) -> Vec<ExportTask> {
        self.tasks
            .iter()
            .filter(|task| task.status == ExportStatus::Pending)
            .cloned()
            .collect()
    }

    /// Fold a runner event into the visible queue; terminal tasks are
    /// removed from the live view.
    pub fn apply(&mut self, event: ExportQueueEvent) {
        match event {
            ExportQueueEvent::Started { id } => {
                if let Some(task) = self.task_mut(id) {
                    task.status = ExportStatus::Running;
                    task.progress = 0;
                }
            }
            ExportQueueEvent::Progress { id, percent } => {
                if let Some(task) = self.task_mut(id) {
                    task.progress = percent.min(100);
                }
            }
            ExportQueueEvent::Finished { id, status } => {
                if let Some(task) = self.task_mut(id) {
                    task.status = status;
                }
                self.tasks.retain(|task| !task.status.is_terminal());
            }
        }
    }

    pub fn tasks(&self) -> &[ExportTask] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn task_mut(&mut self, id: u64) -> Option<&mut ExportTask> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }
}
