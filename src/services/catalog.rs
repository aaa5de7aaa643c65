//! Catalog service: books and copy availability

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, NewBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books_list().await
    }

    /// Books with copies_available > 0
    pub async fn list_available(&self) -> AppResult<Vec<Book>> {
        self.repository.books_list_available().await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books_get_by_id(id).await
    }

    /// Create a book; every copy starts on the shelf
    pub async fn create_book(&self, request: CreateBook) -> AppResult<Book> {
        let book = NewBook::new(request)?;

        if let Some(ref isbn) = book.isbn {
            if self.repository.books_isbn_exists(isbn, None).await? {
                return Err(AppError::Conflict(
                    "Book with this ISBN already exists".to_string(),
                ));
            }
        }

        let created = self.repository.books_create(&book).await?;
        tracing::info!(
            book_id = created.id,
            total_copies = created.total_copies,
            "Book created"
        );
        Ok(created)
    }

    pub async fn update_book(&self, id: i32, data: UpdateBook) -> AppResult<Book> {
        data.validate()?;

        if let Some(ref isbn) = data.isbn {
            if self.repository.books_isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Book with this ISBN already exists".to_string(),
                ));
            }
        }

        self.repository.books_update(id, &data).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books_delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }
}
