use taskdeck_core::{Task, TaskFilter, TaskSort, visible_tasks};

/// In-memory task list behind the dashboard.
///
/// Mutations are confirmed-write: the list changes only when the backend has
/// acknowledged the operation and handed back the row, so the screen never
/// shows a task state the server does not hold.
#[derive(Debug, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    pub loading: bool,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replace the whole list from a fetch.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.loading = false;
    }

    /// Indices of tasks visible under the current filter, in sort order.
    pub fn visible(&self, filter: TaskFilter, sort: TaskSort) -> Vec<usize> {
        visible_tasks(&self.tasks, filter, sort)
    }

    /// A confirmed create: the server-returned row joins the front of the
    /// list, matching fetch order (newest first).
    pub fn apply_created(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// A confirmed update: the returned row replaces the one with the same
    /// id. Unknown ids are ignored (the task may have been deleted meanwhile).
    pub fn apply_updated(&mut self, task: Task) {
        if let Some(existing) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
        }
    }

    /// A delete outcome. Only a confirmed delete removes the row; `false`
    /// leaves the list untouched.
    pub fn apply_deleted(&mut self, id: &str, deleted: bool) {
        if deleted {
            self.tasks.retain(|t| t.id != id);
        }
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskdeck_core::Priority;

    fn task(id: &str, title: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            due_date: Utc::now(),
            priority: Priority::Medium,
            completed,
            user_id: "u-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn confirmed_create_joins_the_front() {
        let mut board = TaskBoard::new();
        board.set_tasks(vec![task("t-1", "older", false)]);
        board.apply_created(task("t-2", "newer", false));
        assert_eq!(board.tasks()[0].id, "t-2");
        assert_eq!(board.tasks().len(), 2);
    }

    #[test]
    fn confirmed_update_replaces_by_id() {
        let mut board = TaskBoard::new();
        board.set_tasks(vec![task("t-1", "before", false)]);
        board.apply_updated(task("t-1", "after", true));
        assert_eq!(board.tasks()[0].title, "after");
        assert!(board.tasks()[0].completed);
    }

    #[test]
    fn update_for_a_vanished_task_is_ignored() {
        let mut board = TaskBoard::new();
        board.set_tasks(vec![task("t-1", "kept", false)]);
        board.apply_updated(task("t-9", "ghost", true));
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.tasks()[0].id, "t-1");
    }

    #[test]
    fn unconfirmed_delete_leaves_the_list_unchanged() {
        let mut board = TaskBoard::new();
        board.set_tasks(vec![task("t-1", "a", false), task("t-2", "b", false)]);
        board.apply_deleted("t-1", false);
        assert_eq!(board.tasks().len(), 2);
        board.apply_deleted("t-1", true);
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.tasks()[0].id, "t-2");
    }

    #[test]
    fn visible_respects_filter_and_sort() {
        let mut board = TaskBoard::new();
        let mut high = task("t-1", "urgent", false);
        high.priority = Priority::High;
        let done = task("t-2", "done", true);
        board.set_tasks(vec![done, high]);

        let active = board.visible(TaskFilter::Active, TaskSort::Priority);
        assert_eq!(active, vec![1]);
        let all = board.visible(TaskFilter::All, TaskSort::Priority);
        assert_eq!(all, vec![1, 0]);
    }
}
