//! Books repository (the catalog store)

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, CreateBook, UpdateBook, DEFAULT_QUANTITY},
        pagination::PageRequest,
    },
};

const COLUMNS: &str = "id, title, author, isbn, quantity, created_at";

/// Escape `LIKE` wildcards so user input only ever matches literally
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {COLUMNS} FROM books WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Search books with pagination, ordered by id.
    ///
    /// `search` matches case-insensitively anywhere in the title or the author.
    /// Both sides are folded by SQLite's `LOWER`, so non-ASCII letters match
    /// only in their exact case.
    pub async fn search(&self, search: Option<&str>, page: PageRequest) -> AppResult<(Vec<Book>, i64)> {
        let pattern = search.map(like_pattern);
        let where_clause = if pattern.is_some() {
            r"WHERE LOWER(title) LIKE LOWER(?) ESCAPE '\' OR LOWER(author) LIKE LOWER(?) ESCAPE '\'"
        } else {
            ""
        };

        let count_query = format!("SELECT COUNT(*) FROM books {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref pattern) = pattern {
            count_builder = count_builder.bind(pattern).bind(pattern);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            "SELECT {COLUMNS} FROM books {} ORDER BY id LIMIT ? OFFSET ?",
            where_clause
        );
        let mut select_builder = sqlx::query_as::<_, Book>(&select_query);
        if let Some(ref pattern) = pattern {
            select_builder = select_builder.bind(pattern).bind(pattern);
        }
        let books = select_builder
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// Insert a new book. The `UNIQUE` constraint on `isbn` rejects duplicates.
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, isbn, quantity, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.quantity.unwrap_or(DEFAULT_QUANTITY))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, || {
                format!("A book with ISBN {} already exists", book.isbn)
            })
        })
    }

    /// Overwrite only the supplied fields.
    ///
    /// No duplicate check happens here: an ISBN collision surfaces as a raw
    /// store error.
    pub async fn update(&self, id: i64, book: &UpdateBook) -> AppResult<Book> {
        let mut sets: Vec<&str> = Vec::new();

        macro_rules! add_field {
            ($field:expr, $name:literal) => {
                if $field.is_some() {
                    sets.push(concat!($name, " = ?"));
                }
            };
        }

        add_field!(book.title, "title");
        add_field!(book.author, "author");
        add_field!(book.isbn, "isbn");
        add_field!(book.quantity, "quantity");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE books SET {} WHERE id = ? RETURNING {COLUMNS}",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, Book>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(book.title);
        bind_field!(book.author);
        bind_field!(book.isbn);
        bind_field!(book.quantity);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book permanently
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
