//! Authoritative in-memory entity store.
//!
//! # Responsibility
//! - Own the ordered task/category/priority collections.
//! - Allocate ids and keep reverse reference indexes current.
//!
//! # Invariants
//! - Ids are allocated per collection, strictly increasing, never reused.
//! - Collections keep insertion order; replacement keeps position.
//! - `tasks_by_category` / `tasks_by_priority` mirror the task references
//!   exactly after every mutation.
//! - Mutation is crate-private; callers go through repositories.

use crate::model::category::{Category, CategoryId};
use crate::model::priority::{Priority, PriorityId};
use crate::model::task::{Task, TaskId};
use crate::model::EntityId;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Next ids to allocate for each collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdCounters {
    pub task: TaskId,
    pub category: CategoryId,
    pub priority: PriorityId,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            task: 1,
            category: 1,
            priority: 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    priorities: Vec<Priority>,
    next_ids: IdCounters,
    tasks_by_category: BTreeMap<CategoryId, BTreeSet<TaskId>>,
    tasks_by_priority: BTreeMap<PriorityId, BTreeSet<TaskId>>,
}

impl EntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the demo data set used by the CLI.
    pub fn with_demo_data() -> Self {
        let mut store = Self::new();
        seed_demo_data(&mut store);
        store
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn priorities(&self) -> &[Priority] {
        &self.priorities
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn priority(&self, id: PriorityId) -> Option<&Priority> {
        self.priorities.iter().find(|priority| priority.id == id)
    }

    /// Ids of tasks currently referencing `category_id`, ascending.
    pub fn task_ids_in_category(&self, category_id: CategoryId) -> Vec<TaskId> {
        self.tasks_by_category
            .get(&category_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Ids of tasks currently referencing `priority_id`, ascending.
    pub fn task_ids_with_priority(&self, priority_id: PriorityId) -> Vec<TaskId> {
        self.tasks_by_priority
            .get(&priority_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn next_ids(&self) -> IdCounters {
        self.next_ids
    }

    /// Rebuilds a store from previously exported parts.
    ///
    /// Counters are raised above every present id so reloading never
    /// reissues an id. Reference validity is the caller's concern.
    pub(crate) fn from_parts(
        tasks: Vec<Task>,
        categories: Vec<Category>,
        priorities: Vec<Priority>,
        next_ids: IdCounters,
    ) -> Self {
        let next_ids = IdCounters {
            task: next_ids.task.max(id_after(tasks.iter().map(|t| t.id))),
            category: next_ids
                .category
                .max(id_after(categories.iter().map(|c| c.id))),
            priority: next_ids
                .priority
                .max(id_after(priorities.iter().map(|p| p.id))),
        };

        let mut store = Self {
            tasks: Vec::with_capacity(tasks.len()),
            categories,
            priorities,
            next_ids,
            tasks_by_category: BTreeMap::new(),
            tasks_by_priority: BTreeMap::new(),
        };
        for task in tasks {
            store.insert_task(task);
        }
        store
    }

    pub(crate) fn allocate_task_id(&mut self) -> TaskId {
        allocate(&mut self.next_ids.task)
    }

    pub(crate) fn allocate_category_id(&mut self) -> CategoryId {
        allocate(&mut self.next_ids.category)
    }

    pub(crate) fn allocate_priority_id(&mut self) -> PriorityId {
        allocate(&mut self.next_ids.priority)
    }

    pub(crate) fn insert_task(&mut self, task: Task) {
        self.index_task(&task);
        self.tasks.push(task);
    }

    /// Replaces the task with the same id in place. Returns the old record.
    pub(crate) fn replace_task(&mut self, task: Task) -> Option<Task> {
        let position = self.tasks.iter().position(|item| item.id == task.id)?;
        let old = std::mem::replace(&mut self.tasks[position], task);
        self.unindex_task(&old);
        let current = self.tasks[position].clone();
        self.index_task(&current);
        Some(old)
    }

    pub(crate) fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let position = self.tasks.iter().position(|task| task.id == id)?;
        let removed = self.tasks.remove(position);
        self.unindex_task(&removed);
        Some(removed)
    }

    pub(crate) fn insert_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub(crate) fn replace_category(&mut self, category: Category) -> Option<Category> {
        let slot = self
            .categories
            .iter_mut()
            .find(|item| item.id == category.id)?;
        Some(std::mem::replace(slot, category))
    }

    pub(crate) fn remove_category(&mut self, id: CategoryId) -> Option<Category> {
        let position = self.categories.iter().position(|item| item.id == id)?;
        Some(self.categories.remove(position))
    }

    pub(crate) fn insert_priority(&mut self, priority: Priority) {
        self.priorities.push(priority);
    }

    pub(crate) fn replace_priority(&mut self, priority: Priority) -> Option<Priority> {
        let slot = self
            .priorities
            .iter_mut()
            .find(|item| item.id == priority.id)?;
        Some(std::mem::replace(slot, priority))
    }

    pub(crate) fn remove_priority(&mut self, id: PriorityId) -> Option<Priority> {
        let position = self.priorities.iter().position(|item| item.id == id)?;
        Some(self.priorities.remove(position))
    }

    /// Sets `category_id = None` on every task referencing `category_id`.
    ///
    /// Returns the detached task ids, ascending.
    pub(crate) fn detach_category(&mut self, category_id: CategoryId) -> Vec<TaskId> {
        let detached = self
            .tasks_by_category
            .remove(&category_id)
            .unwrap_or_default();
        for task in self
            .tasks
            .iter_mut()
            .filter(|task| detached.contains(&task.id))
        {
            task.category_id = None;
        }
        detached.into_iter().collect()
    }

    /// Sets `priority_id = None` on every task referencing `priority_id`.
    pub(crate) fn detach_priority(&mut self, priority_id: PriorityId) -> Vec<TaskId> {
        let detached = self
            .tasks_by_priority
            .remove(&priority_id)
            .unwrap_or_default();
        for task in self
            .tasks
            .iter_mut()
            .filter(|task| detached.contains(&task.id))
        {
            task.priority_id = None;
        }
        detached.into_iter().collect()
    }

    fn index_task(&mut self, task: &Task) {
        if let Some(category_id) = task.category_id {
            self.tasks_by_category
                .entry(category_id)
                .or_default()
                .insert(task.id);
        }
        if let Some(priority_id) = task.priority_id {
            self.tasks_by_priority
                .entry(priority_id)
                .or_default()
                .insert(task.id);
        }
    }

    fn unindex_task(&mut self, task: &Task) {
        if let Some(category_id) = task.category_id {
            remove_from_index(&mut self.tasks_by_category, category_id, task.id);
        }
        if let Some(priority_id) = task.priority_id {
            remove_from_index(&mut self.tasks_by_priority, priority_id, task.id);
        }
    }
}

fn allocate(counter: &mut EntityId) -> EntityId {
    let id = *counter;
    *counter += 1;
    id
}

/// Smallest id above every id in `ids`, pinned at `EntityId::MAX`.
fn id_after(ids: impl Iterator<Item = EntityId>) -> EntityId {
    ids.max().unwrap_or(0).saturating_add(1)
}

fn remove_from_index(
    index: &mut BTreeMap<EntityId, BTreeSet<TaskId>>,
    key: EntityId,
    task_id: TaskId,
) {
    if let Some(ids) = index.get_mut(&key) {
        ids.remove(&task_id);
        if ids.is_empty() {
            index.remove(&key);
        }
    }
}

const DEMO_CATEGORIES: &[&str] = &[
    "Work", "Family", "Study", "Leisure", "Sport", "Food", "Finance", "Gadgets", "Health",
    "Car", "Home repair",
];

const DEMO_PRIORITIES: &[(&str, &str)] = &[
    ("Low", "#e5e5e5"),
    ("Medium", "#85D1B2"),
    ("High", "#F1828D"),
    ("Urgent", "#F1128D"),
];

// (title, priority index, completed, category index, date)
type DemoTask = (
    &'static str,
    Option<usize>,
    bool,
    Option<usize>,
    Option<(i32, u32, u32)>,
);

const DEMO_TASKS: &[DemoTask] = &[
    ("Fill up the car", Some(2), false, Some(9), Some((2024, 4, 10))),
    ("Hand the report to the manager", Some(0), false, Some(0), Some((2024, 4, 11))),
    ("Clean up my room, water the plants", Some(2), true, Some(1), Some((2024, 2, 11))),
    ("Go to the park with the family", Some(1), false, Some(1), Some((2024, 8, 17))),
    ("Find and study a course on Java", Some(2), true, Some(2), None),
    ("Watch the lectures on Angular", Some(1), false, Some(2), Some((2024, 6, 11))),
    ("Take the exam on Spring", Some(2), true, Some(2), None),
    ("Book a holiday by the sea", Some(0), false, Some(3), None),
    ("Buy milk and bread", None, false, Some(5), None),
    ("Pay the utility bills", Some(1), false, Some(6), Some((2024, 5, 12))),
    ("Choose a new phone", Some(3), false, Some(7), Some((2024, 3, 12))),
    ("Go for a run in the evening", None, false, None, None),
];

fn seed_demo_data(store: &mut EntityStore) {
    let category_ids: Vec<CategoryId> = DEMO_CATEGORIES
        .iter()
        .map(|title| {
            let id = store.allocate_category_id();
            store.insert_category(Category::new(id, *title));
            id
        })
        .collect();

    let priority_ids: Vec<PriorityId> = DEMO_PRIORITIES
        .iter()
        .map(|(title, color)| {
            let id = store.allocate_priority_id();
            store.insert_priority(Priority {
                id,
                title: (*title).to_string(),
                color: (*color).to_string(),
            });
            id
        })
        .collect();

    for (title, priority, completed, category, date) in DEMO_TASKS {
        let id = store.allocate_task_id();
        store.insert_task(Task {
            id,
            title: (*title).to_string(),
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            completed: *completed,
            priority_id: priority.and_then(|index| priority_ids.get(index).copied()),
            category_id: category.and_then(|index| category_ids.get(index).copied()),
        });
    }
}
