//! Catalog management service

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        pagination::{Page, PageRequest},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    per_page: i64,
}

impl CatalogService {
    pub fn new(repository: Repository, per_page: i64) -> Self {
        Self { repository, per_page }
    }

    /// Add a book to the catalog. Fails with `Duplicate` on an ISBN collision.
    pub async fn create_book(&self, book: &CreateBook) -> AppResult<Book> {
        let created = self.repository.books.create(book).await?;
        tracing::info!("Created book id={} isbn={}", created.id, created.isbn);
        Ok(created)
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// List one page of books, optionally filtered by title/author
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Page<Book>> {
        let request = PageRequest::parse(query.page.as_deref(), self.per_page);
        let (books, total) = self
            .repository
            .books
            .search(query.search_term(), request)
            .await?;
        Ok(Page::new(books, total, request))
    }

    /// Apply a partial update. ISBN uniqueness against other books is left to
    /// the store constraint.
    pub async fn update_book(&self, id: i64, changes: &UpdateBook) -> AppResult<Book> {
        self.repository.books.update(id, changes).await
    }

    /// Remove a book permanently
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }
}
