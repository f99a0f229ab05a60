use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{TodoError, TodoResult};
use crate::models::{PageRequest, Todo, TodoDocument, TodoDto};
use crate::repository::TodoRepository;
use crate::search::TodoIndex;

/// Persistence operations the controller delegates to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoService: Send + Sync {
    async fn add(&self, input: TodoDto) -> TodoResult<Todo>;

    async fn update(&self, input: TodoDto) -> TodoResult<Todo>;

    /// Delete a todo, returning the deleted entry
    async fn delete_by_id(&self, id: i64) -> TodoResult<Todo>;

    async fn find_by_id(&self, id: i64) -> TodoResult<Todo>;

    async fn find_all(&self) -> TodoResult<Vec<Todo>>;
}

/// Search operations the controller delegates to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoSearchService: Send + Sync {
    async fn count_search_results(&self, search_term: &str) -> TodoResult<u64>;

    async fn search(&self, search_term: &str, page: PageRequest) -> TodoResult<Vec<TodoDocument>>;
}

/// Service layer that persists todos and keeps the search index in sync.
///
/// Mutations are serialized so a store write and its index write are never
/// interleaved with another mutation.
#[derive(Clone)]
pub struct RepositoryTodoService<R: TodoRepository, I: TodoIndex> {
    repository: Arc<R>,
    index: Arc<I>,
    mutations: Arc<Mutex<()>>,
}

impl<R: TodoRepository, I: TodoIndex> RepositoryTodoService<R, I> {
    pub fn new(repository: R, index: I) -> Self {
        Self {
            repository: Arc::new(repository),
            index: Arc::new(index),
            mutations: Arc::new(Mutex::new(())),
        }
    }

    async fn find_existing(&self, id: i64) -> TodoResult<Todo> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(id))
    }
}

#[async_trait]
impl<R: TodoRepository, I: TodoIndex> TodoService for RepositoryTodoService<R, I> {
    async fn add(&self, input: TodoDto) -> TodoResult<Todo> {
        let _guard = self.mutations.lock().await;
        let persisted = self
            .repository
            .save(Todo::new(input.title, input.description))
            .await?;
        self.index.add_to_index(&persisted).await?;

        tracing::info!(todo_id = ?persisted.id, "Created todo");
        Ok(persisted)
    }

    async fn update(&self, input: TodoDto) -> TodoResult<Todo> {
        // An update without an id cannot refer to any stored todo
        let id = input.id.ok_or(TodoError::NotFound(0))?;
        let _guard = self.mutations.lock().await;
        let mut model = self.find_existing(id).await?;

        model.apply_update(input);
        let updated = self.repository.save(model).await?;
        self.index.update(&updated).await?;

        tracing::info!(todo_id = id, "Updated todo");
        Ok(updated)
    }

    async fn delete_by_id(&self, id: i64) -> TodoResult<Todo> {
        let _guard = self.mutations.lock().await;
        let deleted = self
            .repository
            .delete(id)
            .await?
            .ok_or(TodoError::NotFound(id))?;
        self.index.delete_from_index(id).await?;

        tracing::info!(todo_id = id, "Deleted todo");
        Ok(deleted)
    }

    async fn find_by_id(&self, id: i64) -> TodoResult<Todo> {
        self.find_existing(id).await
    }

    async fn find_all(&self) -> TodoResult<Vec<Todo>> {
        self.repository.find_all().await
    }
}

#[async_trait]
impl<R: TodoRepository, I: TodoIndex> TodoSearchService for RepositoryTodoService<R, I> {
    async fn count_search_results(&self, search_term: &str) -> TodoResult<u64> {
        self.index.count(search_term).await
    }

    async fn search(&self, search_term: &str, page: PageRequest) -> TodoResult<Vec<TodoDocument>> {
        self.index.search(search_term, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryTodoRepository, MockTodoRepository};
    use crate::search::{InMemoryTodoIndex, MockTodoIndex};
    use mockall::predicate::eq;
    use std::time::Duration;

    const ID: i64 = 1;

    fn model(title: &str) -> Todo {
        Todo {
            id: Some(ID),
            title: title.to_string(),
            description: Some("description".to_string()),
        }
    }

    fn dto(id: Option<i64>, title: &str) -> TodoDto {
        TodoDto {
            id,
            title: title.to_string(),
            description: Some("description".to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_saves_and_indexes_todo() {
        let mut mock_repo = MockTodoRepository::new();
        let mut mock_index = MockTodoIndex::new();

        mock_repo
            .expect_save()
            .withf(|todo| todo.id.is_none() && todo.title == "title")
            .times(1)
            .returning(|_| Ok(model("title")));
        mock_index
            .expect_add_to_index()
            .withf(|todo| todo.id == Some(ID))
            .times(1)
            .returning(|_| Ok(()));

        let service = RepositoryTodoService::new(mock_repo, mock_index);
        let added = service.add(dto(None, "title")).await.unwrap();

        assert_eq!(added, model("title"));
    }

    #[tokio::test]
    async fn test_update_overwrites_fields_and_reindexes() {
        let mut mock_repo = MockTodoRepository::new();
        let mut mock_index = MockTodoIndex::new();

        mock_repo
            .expect_find_by_id()
            .with(eq(ID))
            .returning(|_| Ok(Some(model("before"))));
        mock_repo
            .expect_save()
            .withf(|todo| todo.id == Some(ID) && todo.title == "after")
            .times(1)
            .returning(|todo| Ok(todo));
        mock_index
            .expect_update()
            .withf(|todo| todo.title == "after")
            .times(1)
            .returning(|_| Ok(()));

        let service = RepositoryTodoService::new(mock_repo, mock_index);
        let updated = service.update(dto(Some(ID), "after")).await.unwrap();

        assert_eq!(updated.title, "after");
    }

    #[tokio::test]
    async fn test_update_missing_todo_is_not_found() {
        let mut mock_repo = MockTodoRepository::new();
        let mut mock_index = MockTodoIndex::new();

        mock_repo
            .expect_find_by_id()
            .with(eq(ID))
            .returning(|_| Ok(None));
        mock_repo.expect_save().never();
        mock_index.expect_update().never();

        let service = RepositoryTodoService::new(mock_repo, mock_index);
        let result = service.update(dto(Some(ID), "after")).await;

        assert!(matches!(result, Err(TodoError::NotFound(ID))));
    }

    #[tokio::test]
    async fn test_delete_removes_from_store_and_index() {
        let mut mock_repo = MockTodoRepository::new();
        let mut mock_index = MockTodoIndex::new();

        mock_repo
            .expect_delete()
            .with(eq(ID))
            .times(1)
            .returning(|_| Ok(Some(model("title"))));
        mock_index
            .expect_delete_from_index()
            .with(eq(ID))
            .times(1)
            .returning(|_| Ok(()));

        let service = RepositoryTodoService::new(mock_repo, mock_index);
        let deleted = service.delete_by_id(ID).await.unwrap();

        assert_eq!(deleted, model("title"));
    }

    #[tokio::test]
    async fn test_delete_missing_todo_is_not_found() {
        let mut mock_repo = MockTodoRepository::new();
        let mut mock_index = MockTodoIndex::new();

        mock_repo
            .expect_delete()
            .with(eq(ID))
            .times(1)
            .returning(|_| Ok(None));
        mock_index.expect_delete_from_index().never();

        let service = RepositoryTodoService::new(mock_repo, mock_index);
        let result = service.delete_by_id(ID).await;

        assert!(matches!(result, Err(TodoError::NotFound(ID))));
    }

    #[tokio::test]
    async fn test_search_delegates_to_index() {
        let mock_repo = MockTodoRepository::new();
        let mut mock_index = MockTodoIndex::new();
        let page = PageRequest::new(1, 1);

        mock_index
            .expect_count()
            .with(eq("Foo"))
            .times(1)
            .returning(|_| Ok(2));
        mock_index
            .expect_search()
            .with(eq("Foo"), eq(page))
            .times(1)
            .returning(|_, _| {
                Ok(vec![TodoDocument {
                    id: ID,
                    title: "Foo".to_string(),
                }])
            });

        let service = RepositoryTodoService::new(mock_repo, mock_index);

        assert_eq!(service.count_search_results("Foo").await.unwrap(), 2);
        let documents = service.search("Foo", page).await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, ID);
    }

    /// Repository that pauses after each lookup so concurrent mutations can
    /// land between a read and the following write
    struct SlowLookupRepository {
        inner: InMemoryTodoRepository,
    }

    #[async_trait]
    impl TodoRepository for SlowLookupRepository {
        async fn save(&self, todo: Todo) -> TodoResult<Todo> {
            self.inner.save(todo).await
        }

        async fn find_by_id(&self, id: i64) -> TodoResult<Option<Todo>> {
            let found = self.inner.find_by_id(id).await;
            tokio::time::sleep(Duration::from_millis(50)).await;
            found
        }

        async fn find_all(&self) -> TodoResult<Vec<Todo>> {
            self.inner.find_all().await
        }

        async fn delete(&self, id: i64) -> TodoResult<Option<Todo>> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_update_and_delete_leave_todo_deleted() {
        let service = RepositoryTodoService::new(
            SlowLookupRepository {
                inner: InMemoryTodoRepository::new(),
            },
            InMemoryTodoIndex::new(),
        );
        let added = service.add(dto(None, "title")).await.unwrap();
        let id = added.id.unwrap();

        let (_, deleted) = tokio::join!(
            service.update(dto(Some(id), "renamed")),
            service.delete_by_id(id)
        );

        assert!(deleted.is_ok());
        assert!(matches!(
            service.find_by_id(id).await,
            Err(TodoError::NotFound(found)) if found == id
        ));
        assert_eq!(service.count_search_results("title renamed").await.unwrap(), 0);
    }
}
