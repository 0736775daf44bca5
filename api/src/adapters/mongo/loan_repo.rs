//! MongoDB adapter for LoanRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::FindOptions,
    Collection, Database,
};

use super::db_error;
use super::documents::{id_value, BookDocument, LoanDocument, UserDocument};
use crate::domain::entities::{BookId, Loan, LoanId, LoanStatus, UserId};
use crate::domain::ports::{page_offset, LoanFilter, LoanRepository, LoanWithDetails};
use crate::error::DomainError;

/// MongoDB implementation of LoanRepository
///
/// Details are filled in by follow-up lookups on the users and books
/// collections. A missing user or book leaves the name or title empty.
pub struct MongoLoanRepository {
    loans: Collection<LoanDocument>,
    users: Collection<UserDocument>,
    books: Collection<BookDocument>,
}

impl MongoLoanRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            loans: db.collection::<LoanDocument>("loans"),
            users: db.collection::<UserDocument>("users"),
            books: db.collection::<BookDocument>("books"),
        }
    }

    fn build_filter(filter: &LoanFilter) -> Document {
        let mut doc = doc! {};

        if let Some(user_id) = filter.user_id {
            doc.insert("userid", id_value(user_id.0));
        }

        if let Some(status) = filter.status {
            doc.insert("status", status.as_str());
        }

        doc
    }

    async fn user_name(&self, id: &UserId) -> Result<String, DomainError> {
        let user = self
            .users
            .find_one(doc! { "id": id_value(id.0) })
            .await
            .map_err(db_error)?;

        Ok(user.map(|u| u.name).unwrap_or_default())
    }

    async fn book_title(&self, id: &BookId) -> Result<String, DomainError> {
        let book = self
            .books
            .find_one(doc! { "id": id_value(id.0) })
            .await
            .map_err(db_error)?;

        Ok(book.map(|b| b.title).unwrap_or_default())
    }

    async fn with_details(&self, loan: Loan) -> Result<LoanWithDetails, DomainError> {
        let user_name = self.user_name(&loan.user_id).await?;
        let book_title = self.book_title(&loan.book_id).await?;

        Ok(LoanWithDetails {
            loan,
            user_name,
            book_title,
        })
    }
}

#[async_trait]
impl LoanRepository for MongoLoanRepository {
    async fn create(&self, loan: &Loan) -> Result<(), DomainError> {
        self.loans
            .insert_one(LoanDocument::from(loan))
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn get_by_id(&self, id: &LoanId) -> Result<Option<Loan>, DomainError> {
        let result = self
            .loans
            .find_one(doc! { "id": id_value(id.0) })
            .await
            .map_err(db_error)?;

        result.map(Loan::try_from).transpose()
    }

    async fn get_active_by_user_and_book(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<Option<Loan>, DomainError> {
        let filter = doc! {
            "userid": id_value(user_id.0),
            "bookid": id_value(book_id.0),
            "status": LoanStatus::Active.as_str(),
        };

        let result = self.loans.find_one(filter).await.map_err(db_error)?;

        result.map(Loan::try_from).transpose()
    }

    async fn list(
        &self,
        page: u64,
        limit: u64,
        filter: &LoanFilter,
    ) -> Result<(Vec<Loan>, u64), DomainError> {
        let filter = Self::build_filter(filter);

        let options = FindOptions::builder()
            .limit(limit as i64)
            .skip(page_offset(page, limit))
            .sort(doc! { "borrowedat": -1 })
            .build();

        let cursor = self
            .loans
            .find(filter.clone())
            .with_options(options)
            .await
            .map_err(db_error)?;
        let docs: Vec<LoanDocument> = cursor.try_collect().await.map_err(db_error)?;

        let total = self
            .loans
            .count_documents(filter)
            .await
            .map_err(db_error)?;

        let loans = docs
            .into_iter()
            .map(Loan::try_from)
            .collect::<Result<_, _>>()?;
        Ok((loans, total))
    }

    async fn update(&self, loan: &Loan) -> Result<(), DomainError> {
        let returned_at = LoanDocument::from(loan)
            .returnedat
            .map(Bson::DateTime)
            .unwrap_or(Bson::Null);

        let result = self
            .loans
            .update_one(
                doc! { "id": id_value(loan.id.0) },
                doc! { "$set": { "status": loan.status.as_str(), "returnedat": returned_at } },
            )
            .await
            .map_err(db_error)?;

        if result.matched_count == 0 {
            return Err(DomainError::LoanNotFound);
        }
        Ok(())
    }

    async fn get_by_id_with_details(
        &self,
        id: &LoanId,
    ) -> Result<Option<LoanWithDetails>, DomainError> {
        match self.get_by_id(id).await? {
            Some(loan) => Ok(Some(self.with_details(loan).await?)),
            None => Ok(None),
        }
    }

    async fn list_with_details(
        &self,
        page: u64,
        limit: u64,
        filter: &LoanFilter,
    ) -> Result<(Vec<LoanWithDetails>, u64), DomainError> {
        let (loans, total) = self.list(page, limit, filter).await?;

        let mut details = Vec::with_capacity(loans.len());
        for loan in loans {
            details.push(self.with_details(loan).await?);
        }

        Ok((details, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_filter_empty() {
        let doc = MongoLoanRepository::build_filter(&LoanFilter::default());
        assert!(doc.is_empty());
    }

    #[test]
    fn build_filter_with_user_and_status() {
        let filter = LoanFilter {
            user_id: Some(UserId::new()),
            status: Some(LoanStatus::Returned),
        };

        let doc = MongoLoanRepository::build_filter(&filter);

        assert!(doc.contains_key("userid"));
        assert_eq!(doc.get_str("status").unwrap(), "returned");
    }
}
