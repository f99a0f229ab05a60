use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{TodoError, TodoResult};
use crate::models::Todo;

/// Repository trait for Todo persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a todo without an id (assigning one) or replace a stored todo.
    ///
    /// Replacing a todo that is no longer stored fails with `NotFound`.
    async fn save(&self, todo: Todo) -> TodoResult<Todo>;

    /// Get a todo by ID
    async fn find_by_id(&self, id: i64) -> TodoResult<Option<Todo>>;

    /// List all todos, ordered by ID
    async fn find_all(&self) -> TodoResult<Vec<Todo>>;

    /// Delete a todo by ID, returning the removed row
    async fn delete(&self, id: i64) -> TodoResult<Option<Todo>>;
}

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    todos: BTreeMap<i64, Todo>,
}

/// In-memory implementation of TodoRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryTodoRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn save(&self, mut todo: Todo) -> TodoResult<Todo> {
        let mut store = self.store.write().await;

        let id = match todo.id {
            Some(id) if !store.todos.contains_key(&id) => return Err(TodoError::NotFound(id)),
            Some(id) => id,
            None => {
                store.last_id += 1;
                store.last_id
            }
        };
        todo.id = Some(id);
        store.todos.insert(id, todo.clone());

        tracing::debug!(todo_id = id, "Saved todo");
        Ok(todo)
    }

    async fn find_by_id(&self, id: i64) -> TodoResult<Option<Todo>> {
        let store = self.store.read().await;
        Ok(store.todos.get(&id).cloned())
    }

    async fn find_all(&self) -> TodoResult<Vec<Todo>> {
        let store = self.store.read().await;
        Ok(store.todos.values().cloned().collect())
    }

    async fn delete(&self, id: i64) -> TodoResult<Option<Todo>> {
        let mut store = self.store.write().await;
        Ok(store.todos.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let repo = InMemoryTodoRepository::new();

        let first = repo.save(Todo::new("first".to_string(), None)).await.unwrap();
        let second = repo
            .save(Todo::new("second".to_string(), Some("desc".to_string())))
            .await
            .unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(second.description.as_deref(), Some("desc"));
    }

    #[tokio::test]
    async fn test_save_with_id_replaces_existing() {
        let repo = InMemoryTodoRepository::new();
        let mut todo = repo.save(Todo::new("draft".to_string(), None)).await.unwrap();

        todo.title = "final".to_string();
        repo.save(todo.clone()).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "final");
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_by_id() {
        let repo = InMemoryTodoRepository::new();
        for title in ["a", "b", "c"] {
            repo.save(Todo::new(title.to_string(), None)).await.unwrap();
        }

        let ids: Vec<Option<i64>> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.id)
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let repo = InMemoryTodoRepository::new();
        let todo = repo.save(Todo::new("gone".to_string(), None)).await.unwrap();
        let id = todo.id.unwrap();

        assert_eq!(repo.delete(id).await.unwrap(), Some(todo));
        assert_eq!(repo.delete(id).await.unwrap(), None);
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_does_not_resurrect_deleted_row() {
        let repo = InMemoryTodoRepository::new();
        let mut todo = repo.save(Todo::new("gone".to_string(), None)).await.unwrap();
        let id = todo.id.unwrap();
        repo.delete(id).await.unwrap();

        todo.title = "back again".to_string();
        let result = repo.save(todo).await;

        assert!(matches!(result, Err(TodoError::NotFound(found)) if found == id));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_is_not_found() {
        let repo = InMemoryTodoRepository::new();
        let mut todo = Todo::new("ghost".to_string(), None);
        todo.id = Some(42);

        assert!(matches!(repo.save(todo).await, Err(TodoError::NotFound(42))));

        // The unknown id does not advance the id sequence
        let created = repo.save(Todo::new("real".to_string(), None)).await.unwrap();
        assert_eq!(created.id, Some(1));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryTodoRepository::new();
        let first = repo.save(Todo::new("one".to_string(), None)).await.unwrap();
        repo.delete(first.id.unwrap()).await.unwrap();

        let second = repo.save(Todo::new("two".to_string(), None)).await.unwrap();
        assert_eq!(second.id, Some(2));
    }
}
