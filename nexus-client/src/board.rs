/// Kanban board state for one project
///
/// Mirrors the project's tasks locally and groups them into the three
/// board columns. Column moves are optimistic: the status flips locally
/// first so the card renders in its new column immediately, and the
/// server round-trip settles afterwards. A failed round-trip rolls the
/// card back to its previous column instead of leaving local state
/// silently diverged from the server.
///
/// # Example
///
/// ```
/// use nexus_client::board::BoardState;
/// use nexus_shared::models::task::TaskStatus;
/// use uuid::Uuid;
///
/// let mut board = BoardState::new(Uuid::new_v4());
/// board.resolve(vec![]);
/// assert!(board.column(TaskStatus::ToDo).is_empty());
/// ```

use crate::{
    api::{ClientResult, NexusClient},
    store::{RemoteCollection, RemoteState},
};
use nexus_shared::models::task::{TaskStatus, TaskView, UpdateTask};
use uuid::Uuid;

/// Receipt for an optimistic move
///
/// Returned by [`BoardState::begin_move`]; carries what is needed to
/// restore the previous state if the server rejects the move. Settling a
/// move consumes the token, so a move cannot be both committed and rolled
/// back.
#[derive(Debug)]
#[must_use = "an unsettled move leaves local state unconfirmed; commit or roll back"]
pub struct MoveToken {
    task_id: Uuid,
    previous: TaskStatus,
}

impl MoveToken {
    /// Task the move applies to
    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    /// Status the task had before the move
    pub fn previous(&self) -> TaskStatus {
        self.previous
    }
}

/// Local mirror of one project's board
#[derive(Debug)]
pub struct BoardState {
    project_id: Uuid,
    tasks: RemoteCollection<TaskView>,
}

impl BoardState {
    /// Creates an empty board for a project, in the loading state
    pub fn new(project_id: Uuid) -> Self {
        Self {
            project_id,
            tasks: RemoteCollection::new(),
        }
    }

    /// Project this board mirrors
    pub fn project_id(&self) -> Uuid {
        self.project_id
    }

    /// Whether the initial fetch is still in flight
    pub fn is_loading(&self) -> bool {
        self.tasks.is_loading()
    }

    /// Current collection lifecycle state
    pub fn state(&self) -> &RemoteState {
        self.tasks.state()
    }

    /// Resolves the initial fetch (or a refetch) with server tasks
    pub fn resolve(&mut self, tasks: Vec<TaskView>) {
        self.tasks.resolve(tasks);
    }

    /// Marks the fetch as failed
    pub fn fail(&mut self, message: impl Into<String>) {
        self.tasks.fail(message);
    }

    /// All tasks in storage order
    pub fn tasks(&self) -> &[TaskView] {
        self.tasks.items().unwrap_or(&[])
    }

    /// Tasks in one column, in storage order
    pub fn column(&self, status: TaskStatus) -> Vec<&TaskView> {
        self.tasks().iter().filter(|t| t.status == status).collect()
    }

    /// All three columns in board order
    pub fn columns(&self) -> [(TaskStatus, Vec<&TaskView>); 3] {
        TaskStatus::ALL.map(|status| (status, self.column(status)))
    }

    /// Looks up a task by ID
    pub fn task(&self, task_id: Uuid) -> Option<&TaskView> {
        self.tasks().iter().find(|t| t.id == task_id)
    }

    /// Inserts a freshly created task
    pub fn insert(&mut self, task: TaskView) {
        self.tasks.insert(task);
    }

    /// Replaces a task with the server's updated view
    pub fn patch(&mut self, task: TaskView) -> bool {
        let task_id = task.id;
        self.tasks.patch(|t| t.id == task_id, task)
    }

    /// Removes a deleted task
    pub fn remove(&mut self, task_id: Uuid) -> bool {
        self.tasks.remove(|t| t.id == task_id) > 0
    }

    /// Starts an optimistic column move
    ///
    /// Flips the task's status locally and returns a token recording the
    /// previous status. Returns `None` when the task is unknown or already
    /// in the target column; nothing changes in that case.
    pub fn begin_move(&mut self, task_id: Uuid, to: TaskStatus) -> Option<MoveToken> {
        let task = self.tasks.items()?.iter().find(|t| t.id == task_id)?;
        let previous = task.status;
        if previous == to {
            return None;
        }

        let mut moved = task.clone();
        moved.status = to;
        self.tasks.patch(|t| t.id == task_id, moved);

        Some(MoveToken { task_id, previous })
    }

    /// Finalizes a move the server accepted
    ///
    /// When the server returned its updated view, pass it along so any
    /// server-side changes (timestamps, concurrent edits) land too.
    pub fn commit(&mut self, token: MoveToken, server_view: Option<TaskView>) {
        if let Some(view) = server_view {
            self.patch(view);
        }
        let _ = token;
    }

    /// Undoes a move the server rejected
    ///
    /// Restores the status recorded in the token. A task deleted in the
    /// meantime is left alone.
    pub fn rollback(&mut self, token: MoveToken) {
        if let Some(task) = self.task(token.task_id) {
            let mut restored = task.clone();
            restored.status = token.previous;
            self.tasks.patch(|t| t.id == token.task_id, restored);
        }
    }

    /// Drives a full optimistic move against the server
    ///
    /// Applies the move locally, issues a single-field status patch, and
    /// settles: commit with the server view on success, rollback on any
    /// failure. Returns the server's view on success.
    pub async fn move_task(
        &mut self,
        client: &NexusClient,
        task_id: Uuid,
        to: TaskStatus,
    ) -> ClientResult<Option<TaskView>> {
        let Some(token) = self.begin_move(task_id, to) else {
            return Ok(None);
        };

        let patch = UpdateTask {
            status: Some(to),
            ..Default::default()
        };

        match client.update_task(task_id, &patch).await {
            Ok(view) => {
                let result = view.clone();
                self.commit(token, Some(view));
                Ok(Some(result))
            }
            Err(e) => {
                tracing::warn!(task_id = %task_id, error = %e, "status move rejected, rolling back");
                self.rollback(token);
                Err(e)
            }
        }
    }
}
