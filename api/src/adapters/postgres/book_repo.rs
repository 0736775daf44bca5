//! PostgreSQL adapter for BookRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::write_error;
use crate::domain::entities::{Book, BookId};
use crate::domain::ports::{page_offset, BookRepository};
use crate::entity::books;
use crate::error::DomainError;

/// PostgreSQL implementation of BookRepository
pub struct PostgresBookRepository {
    db: DatabaseConnection,
}

impl PostgresBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn active_model(book: &Book) -> books::ActiveModel {
    books::ActiveModel {
        id: Set(book.id.0),
        title: Set(book.title.clone()),
        author: Set(book.author.clone()),
        isbn: Set(book.isbn.clone()),
        // 0 means unknown
        published_year: Set((book.published_year != 0).then_some(book.published_year)),
        total_copies: Set(book.total_copies),
        available_copies: Set(book.available_copies),
        created_at: Set(book.created_at.fixed_offset()),
        updated_at: Set(book.updated_at.fixed_offset()),
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn create(&self, book: &Book) -> Result<(), DomainError> {
        active_model(book)
            .insert(&self.db)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        let result = books::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError> {
        let result = books::Entity::find()
            .filter(books::Column::Isbn.eq(isbn))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(
        &self,
        page: u64,
        limit: u64,
        available_only: bool,
    ) -> Result<(Vec<Book>, u64), DomainError> {
        let mut query = books::Entity::find();
        if available_only {
            query = query.filter(books::Column::AvailableCopies.gt(0));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let results = query
            .order_by_desc(books::Column::CreatedAt)
            .offset(page_offset(page, limit))
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok((results.into_iter().map(|m| m.into()).collect(), total))
    }

    async fn update(&self, book: &Book) -> Result<(), DomainError> {
        match active_model(book).update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::BookNotFound),
            Err(e) => Err(write_error(e)),
        }
    }

    async fn delete(&self, id: &BookId) -> Result<(), DomainError> {
        books::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

impl From<books::Model> for Book {
    fn from(model: books::Model) -> Self {
        Book {
            id: BookId(model.id),
            title: model.title,
            author: model.author,
            isbn: model.isbn,
            published_year: model.published_year.unwrap_or(0),
            total_copies: model.total_copies,
            available_copies: model.available_copies,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
