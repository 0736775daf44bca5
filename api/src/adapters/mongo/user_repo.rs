//! MongoDB adapter for UserRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, options::FindOptions, Collection, Database};

use super::db_error;
use super::documents::{id_value, UserDocument};
use crate::domain::entities::{User, UserId};
use crate::domain::ports::{page_offset, UserRepository};
use crate::error::DomainError;

/// MongoDB implementation of UserRepository
pub struct MongoUserRepository {
    users: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection::<UserDocument>("users"),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        self.users
            .insert_one(UserDocument::from(user))
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = self
            .users
            .find_one(doc! { "id": id_value(id.0) })
            .await
            .map_err(db_error)?;

        Ok(result.map(|d| d.into()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let result = self
            .users
            .find_one(doc! { "email": email })
            .await
            .map_err(db_error)?;

        Ok(result.map(|d| d.into()))
    }

    async fn list(&self, page: u64, limit: u64) -> Result<(Vec<User>, u64), DomainError> {
        let options = FindOptions::builder()
            .limit(limit as i64)
            .skip(page_offset(page, limit))
            .sort(doc! { "createdat": -1 })
            .build();

        let cursor = self
            .users
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(db_error)?;
        let docs: Vec<UserDocument> = cursor.try_collect().await.map_err(db_error)?;

        let total = self
            .users
            .count_documents(doc! {})
            .await
            .map_err(db_error)?;

        Ok((docs.into_iter().map(|d| d.into()).collect(), total))
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let result = self
            .users
            .replace_one(doc! { "id": id_value(user.id.0) }, UserDocument::from(user))
            .await
            .map_err(db_error)?;

        if result.matched_count == 0 {
            return Err(DomainError::UserNotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        self.users
            .delete_one(doc! { "id": id_value(id.0) })
            .await
            .map_err(db_error)?;

        Ok(())
    }
}
