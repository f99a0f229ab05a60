//! Full-text search index for todos.
//!
//! The index matches a search term against both title and description, but
//! only the id and title are returned in [`TodoDocument`]s.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{TodoError, TodoResult};
use crate::models::{PageRequest, Todo, TodoDocument};

/// Search index holding a document per persisted todo
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoIndex: Send + Sync {
    /// Add (or replace) the document of a persisted todo
    async fn add_to_index(&self, todo: &Todo) -> TodoResult<()>;

    /// Replace the indexed fields of a todo already in the index
    async fn update(&self, todo: &Todo) -> TodoResult<()>;

    /// Remove the document of a todo
    async fn delete_from_index(&self, id: i64) -> TodoResult<()>;

    /// Count documents matching the search term
    async fn count(&self, search_term: &str) -> TodoResult<u64>;

    /// Find one page of documents matching the search term, newest first
    async fn search(&self, search_term: &str, page: PageRequest) -> TodoResult<Vec<TodoDocument>>;
}

#[derive(Debug, Clone)]
struct IndexedTodo {
    title: String,
    title_lowercase: String,
    description_lowercase: String,
}

impl IndexedTodo {
    fn from_todo(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            title_lowercase: todo.title.to_lowercase(),
            description_lowercase: todo
                .description
                .as_deref()
                .unwrap_or_default()
                .to_lowercase(),
        }
    }

    fn matches(&self, words: &[String]) -> bool {
        words.iter().any(|word| {
            self.title_lowercase.contains(word.as_str())
                || self.description_lowercase.contains(word.as_str())
        })
    }
}

/// Split a search term into lowercase words
fn search_words(search_term: &str) -> Vec<String> {
    search_term
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

fn document_id(todo: &Todo) -> TodoResult<i64> {
    todo.id
        .ok_or_else(|| TodoError::Internal("cannot index a todo without an id".to_string()))
}

/// In-memory implementation of TodoIndex
#[derive(Debug, Default, Clone)]
pub struct InMemoryTodoIndex {
    documents: Arc<RwLock<BTreeMap<i64, IndexedTodo>>>,
}

impl InMemoryTodoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    async fn matching_ids(&self, search_term: &str) -> Vec<(i64, String)> {
        let words = search_words(search_term);
        if words.is_empty() {
            return Vec::new();
        }

        let documents = self.documents.read().await;
        documents
            .iter()
            .rev()
            .filter(|(_, document)| document.matches(&words))
            .map(|(id, document)| (*id, document.title.clone()))
            .collect()
    }
}

#[async_trait]
impl TodoIndex for InMemoryTodoIndex {
    async fn add_to_index(&self, todo: &Todo) -> TodoResult<()> {
        let id = document_id(todo)?;
        let mut documents = self.documents.write().await;
        documents.insert(id, IndexedTodo::from_todo(todo));

        tracing::debug!(todo_id = id, "Indexed todo");
        Ok(())
    }

    async fn update(&self, todo: &Todo) -> TodoResult<()> {
        let id = document_id(todo)?;
        let mut documents = self.documents.write().await;
        match documents.get_mut(&id) {
            Some(document) => {
                *document = IndexedTodo::from_todo(todo);
                tracing::debug!(todo_id = id, "Updated indexed todo");
            }
            None => tracing::warn!(todo_id = id, "Skipped update of a todo missing from the index"),
        }
        Ok(())
    }

    async fn delete_from_index(&self, id: i64) -> TodoResult<()> {
        let mut documents = self.documents.write().await;
        if documents.remove(&id).is_some() {
            tracing::debug!(todo_id = id, "Removed todo from index");
        }
        Ok(())
    }

    async fn count(&self, search_term: &str) -> TodoResult<u64> {
        Ok(self.matching_ids(search_term).await.len() as u64)
    }

    async fn search(&self, search_term: &str, page: PageRequest) -> TodoResult<Vec<TodoDocument>> {
        let documents = self
            .matching_ids(search_term)
            .await
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .map(|(id, title)| TodoDocument { id, title })
            .collect();

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, title: &str, description: Option<&str>) -> Todo {
        Todo {
            id: Some(id),
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }

    async fn seeded_index() -> InMemoryTodoIndex {
        let index = InMemoryTodoIndex::new();
        index.add_to_index(&todo(1, "Buy milk", None)).await.unwrap();
        index
            .add_to_index(&todo(2, "Walk the dog", Some("Take the FOO leash")))
            .await
            .unwrap();
        index.add_to_index(&todo(3, "Foo bar", None)).await.unwrap();
        index
    }

    #[tokio::test]
    async fn test_search_matches_title_or_description_case_insensitively() {
        let index = seeded_index().await;

        let ids: Vec<i64> = index
            .search("foo", PageRequest::default())
            .await
            .unwrap()
            .into_iter()
            .map(|document| document.id)
            .collect();

        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_search_matches_any_word() {
        let index = seeded_index().await;

        assert_eq!(index.count("milk dog").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_blank_term_matches_nothing() {
        let index = seeded_index().await;

        assert_eq!(index.count("   ").await.unwrap(), 0);
        assert!(index.search("", PageRequest::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_pages_newest_first() {
        let index = InMemoryTodoIndex::new();
        for id in 1..=5 {
            index
                .add_to_index(&todo(id, &format!("task {id}"), None))
                .await
                .unwrap();
        }

        let page: Vec<i64> = index
            .search("task", PageRequest::new(1, 2))
            .await
            .unwrap()
            .into_iter()
            .map(|document| document.id)
            .collect();

        assert_eq!(page, vec![3, 2]);
        assert_eq!(index.count("task").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_update_and_delete_change_results() {
        let index = seeded_index().await;

        index.update(&todo(1, "Buy foo", None)).await.unwrap();
        assert_eq!(index.count("foo").await.unwrap(), 3);

        index.delete_from_index(3).await.unwrap();
        let titles: Vec<String> = index
            .search("foo", PageRequest::default())
            .await
            .unwrap()
            .into_iter()
            .map(|document| document.title)
            .collect();
        assert_eq!(titles, vec!["Walk the dog", "Buy foo"]);
    }

    #[tokio::test]
    async fn test_update_does_not_restore_removed_document() {
        let index = seeded_index().await;
        index.delete_from_index(1).await.unwrap();

        index.update(&todo(1, "Buy milk again", None)).await.unwrap();

        assert_eq!(index.count("milk").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_indexing_without_id_is_rejected() {
        let index = InMemoryTodoIndex::new();
        let result = index.add_to_index(&Todo::new("unsaved".to_string(), None)).await;
        assert!(matches!(result, Err(TodoError::Internal(_))));
    }
}
