//! Snapshot export/import between `EntityStore` and SQLite tables.
//!
//! # Responsibility
//! - Persist ids, order, dates and null references exactly.
//! - Rebuild a store from rows, rejecting records that break invariants.
//!
//! # Invariants
//! - Export replaces all snapshot rows in one transaction.
//! - Import validates titles and references; dangling task references fail
//!   with `RepoError::Referential` instead of being silently dropped.
//! - Id counters survive a round trip, so reloaded stores never reissue ids.

use crate::model::category::Category;
use crate::model::priority::Priority;
use crate::model::task::Task;
use crate::model::EntityId;
use crate::repo::task_repo::check_task_references;
use crate::repo::{RepoError, RepoResult};
use crate::store::{EntityStore, IdCounters};
use chrono::NaiveDate;
use log::{error, info};
use rusqlite::{params, Connection, Row};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Writes the whole store into the snapshot tables.
pub(crate) fn write_store(conn: &mut Connection, store: &EntityStore) -> RepoResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "DELETE FROM tasks;
         DELETE FROM categories;
         DELETE FROM priorities;
         DELETE FROM id_counters;",
    )?;

    for (position, category) in store.categories().iter().enumerate() {
        tx.execute(
            "INSERT INTO categories (id, title, position) VALUES (?1, ?2, ?3);",
            params![to_db_id(category.id)?, category.title, to_db_position(position)?],
        )?;
    }

    for (position, priority) in store.priorities().iter().enumerate() {
        tx.execute(
            "INSERT INTO priorities (id, title, color, position) VALUES (?1, ?2, ?3, ?4);",
            params![
                to_db_id(priority.id)?,
                priority.title,
                priority.color,
                to_db_position(position)?
            ],
        )?;
    }

    for (position, task) in store.tasks().iter().enumerate() {
        tx.execute(
            "INSERT INTO tasks (
                id,
                title,
                due_date,
                completed,
                priority_id,
                category_id,
                position
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                to_db_id(task.id)?,
                task.title,
                task.date.map(|date| date.format(DATE_FORMAT).to_string()),
                task.completed,
                task.priority_id.map(to_db_id).transpose()?,
                task.category_id.map(to_db_id).transpose()?,
                to_db_position(position)?
            ],
        )?;
    }

    let counters = store.next_ids();
    for (collection, next_id) in [
        ("task", counters.task),
        ("category", counters.category),
        ("priority", counters.priority),
    ] {
        tx.execute(
            "INSERT INTO id_counters (collection, next_id) VALUES (?1, ?2);",
            params![collection, to_db_id(next_id)?],
        )?;
    }

    tx.commit()?;
    info!(
        "event=snapshot_save module=db status=ok tasks={} categories={} priorities={}",
        store.tasks().len(),
        store.categories().len(),
        store.priorities().len()
    );
    Ok(())
}

/// Rebuilds a store from the snapshot tables.
pub(crate) fn read_store(conn: &Connection) -> RepoResult<EntityStore> {
    let categories = query_rows(
        conn,
        "SELECT id, title FROM categories ORDER BY position ASC, id ASC;",
        parse_category_row,
    )?;
    let priorities = query_rows(
        conn,
        "SELECT id, title, color FROM priorities ORDER BY position ASC, id ASC;",
        parse_priority_row,
    )?;
    let tasks = query_rows(
        conn,
        "SELECT id, title, due_date, completed, priority_id, category_id
         FROM tasks
         ORDER BY position ASC, id ASC;",
        parse_task_row,
    )?;
    let counters = load_counters(conn)?;

    let store = EntityStore::from_parts(tasks, categories, priorities, counters);
    for task in store.tasks() {
        if let Err(err) = check_task_references(&store, task) {
            error!(
                "event=snapshot_load module=db status=error task_id={} error_code={}",
                task.id,
                err.code()
            );
            return Err(err);
        }
    }

    info!(
        "event=snapshot_load module=db status=ok tasks={} categories={} priorities={}",
        store.tasks().len(),
        store.categories().len(),
        store.priorities().len()
    );
    Ok(store)
}

fn query_rows<T>(
    conn: &Connection,
    sql: &str,
    parse: impl Fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let category = Category::new(from_db_id(row.get("id")?)?, row.get::<_, String>("title")?);
    Ok(category.validated()?)
}

fn parse_priority_row(row: &Row<'_>) -> RepoResult<Priority> {
    let priority = Priority {
        id: from_db_id(row.get("id")?)?,
        title: row.get("title")?,
        color: row.get("color")?,
    };
    Ok(priority.validated()?)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let date = match row.get::<_, Option<String>>("due_date")? {
        Some(value) => Some(NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!("invalid date `{value}` in tasks.due_date"))
        })?),
        None => None,
    };

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    let task = Task {
        id: from_db_id(row.get("id")?)?,
        title: row.get("title")?,
        date,
        completed,
        priority_id: row
            .get::<_, Option<i64>>("priority_id")?
            .map(from_db_id)
            .transpose()?,
        category_id: row
            .get::<_, Option<i64>>("category_id")?
            .map(from_db_id)
            .transpose()?,
    };
    Ok(task.validated()?)
}

fn load_counters(conn: &Connection) -> RepoResult<IdCounters> {
    let mut counters = IdCounters::default();
    let mut stmt = conn.prepare("SELECT collection, next_id FROM id_counters;")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let collection: String = row.get("collection")?;
        let next_id = from_db_id(row.get("next_id")?)?;
        match collection.as_str() {
            "task" => counters.task = next_id,
            "category" => counters.category = next_id,
            "priority" => counters.priority = next_id,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "unknown collection `{other}` in id_counters"
                )));
            }
        }
    }
    Ok(counters)
}

fn to_db_id(id: EntityId) -> RepoResult<i64> {
    i64::try_from(id).map_err(|_| RepoError::InvalidData(format!("id {id} exceeds storage range")))
}

fn from_db_id(value: i64) -> RepoResult<EntityId> {
    EntityId::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative id `{value}` in snapshot")))
}

fn to_db_position(position: usize) -> RepoResult<i64> {
    i64::try_from(position)
        .map_err(|_| RepoError::InvalidData(format!("position {position} exceeds storage range")))
}
