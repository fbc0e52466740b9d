use crate::task::{Priority, Task};

/// Task grid filter. Exactly one filter is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Completed,
    Active,
    High,
    Medium,
    Low,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 6] = [
        Self::All,
        Self::Active,
        Self::Completed,
        Self::High,
        Self::Medium,
        Self::Low,
    ];

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Active => !task.completed,
            Self::High => task.priority == Priority::High,
            Self::Medium => task.priority == Priority::Medium,
            Self::Low => task.priority == Priority::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Active => "active",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Next filter in toggle order.
    pub fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Task grid sort key. Exactly one sort is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSort {
    #[default]
    Priority,
    DueDate,
    Title,
}

impl TaskSort {
    pub fn label(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::DueDate => "due date",
            Self::Title => "title",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::Priority => Self::DueDate,
            Self::DueDate => Self::Title,
            Self::Title => Self::Priority,
        }
    }
}

/// Presentation-layer view over the in-memory task list: the indices of the
/// tasks that pass `filter`, ordered by `sort`. The authoritative list is
/// never mutated; ties keep their relative order (stable sort).
pub fn visible_tasks(tasks: &[Task], filter: TaskFilter, sort: TaskSort) -> Vec<usize> {
    let mut indices: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| filter.matches(task))
        .map(|(idx, _)| idx)
        .collect();

    match sort {
        TaskSort::Priority => {
            indices.sort_by_key(|&idx| tasks[idx].priority.rank());
        }
        TaskSort::DueDate => {
            indices.sort_by_key(|&idx| tasks[idx].due_date);
        }
        TaskSort::Title => {
            indices.sort_by(|&a, &b| tasks[a].title.cmp(&tasks[b].title));
        }
    }

    indices
}
