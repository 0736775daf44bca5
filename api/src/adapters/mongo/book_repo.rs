//! MongoDB adapter for BookRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
    Collection, Database,
};

use super::db_error;
use super::documents::{id_value, BookDocument};
use crate::domain::entities::{Book, BookId};
use crate::domain::ports::{page_offset, BookRepository};
use crate::error::DomainError;

/// MongoDB implementation of BookRepository
///
/// Copy counters are written whole with `replace_one`, so concurrent borrows
/// of the same book race exactly as they do in the service layer.
pub struct MongoBookRepository {
    books: Collection<BookDocument>,
}

impl MongoBookRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            books: db.collection::<BookDocument>("books"),
        }
    }

    fn build_filter(available_only: bool) -> Document {
        if available_only {
            doc! { "availablecopies": { "$gt": 0 } }
        } else {
            doc! {}
        }
    }
}

#[async_trait]
impl BookRepository for MongoBookRepository {
    async fn create(&self, book: &Book) -> Result<(), DomainError> {
        self.books
            .insert_one(BookDocument::from(book))
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, DomainError> {
        let result = self
            .books
            .find_one(doc! { "id": id_value(id.0) })
            .await
            .map_err(db_error)?;

        Ok(result.map(|d| d.into()))
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError> {
        let result = self
            .books
            .find_one(doc! { "isbn": isbn })
            .await
            .map_err(db_error)?;

        Ok(result.map(|d| d.into()))
    }

    async fn list(
        &self,
        page: u64,
        limit: u64,
        available_only: bool,
    ) -> Result<(Vec<Book>, u64), DomainError> {
        let filter = Self::build_filter(available_only);

        let options = FindOptions::builder()
            .limit(limit as i64)
            .skip(page_offset(page, limit))
            .sort(doc! { "createdat": -1 })
            .build();

        let cursor = self
            .books
            .find(filter.clone())
            .with_options(options)
            .await
            .map_err(db_error)?;
        let docs: Vec<BookDocument> = cursor.try_collect().await.map_err(db_error)?;

        let total = self
            .books
            .count_documents(filter)
            .await
            .map_err(db_error)?;

        Ok((docs.into_iter().map(|d| d.into()).collect(), total))
    }

    async fn update(&self, book: &Book) -> Result<(), DomainError> {
        let result = self
            .books
            .replace_one(doc! { "id": id_value(book.id.0) }, BookDocument::from(book))
            .await
            .map_err(db_error)?;

        if result.matched_count == 0 {
            return Err(DomainError::BookNotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &BookId) -> Result<(), DomainError> {
        self.books
            .delete_one(doc! { "id": id_value(id.0) })
            .await
            .map_err(db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_filter_all_books() {
        assert!(MongoBookRepository::build_filter(false).is_empty());
    }

    #[test]
    fn build_filter_available_only() {
        let filter = MongoBookRepository::build_filter(true);
        assert!(filter.contains_key("availablecopies"));
    }
}
