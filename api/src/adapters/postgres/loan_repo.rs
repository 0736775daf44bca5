//! PostgreSQL adapter for LoanRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    prelude::DateTimeWithTimeZone, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend,
    DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, Set, Statement, Value,
};
use uuid::Uuid;

use super::write_error;
use crate::domain::entities::{BookId, Loan, LoanId, LoanStatus, UserId};
use crate::domain::ports::{page_offset, LoanFilter, LoanRepository, LoanWithDetails};
use crate::entity::loans;
use crate::error::DomainError;

const DETAILS_SELECT: &str = r#"
    SELECT l.id, l.user_id, l.book_id, l.borrowed_at, l.due_date, l.returned_at, l.status,
           COALESCE(u.name, '') AS user_name,
           COALESCE(b.title, '') AS book_title
    FROM loans l
    LEFT JOIN users u ON u.id = l.user_id
    LEFT JOIN books b ON b.id = l.book_id
"#;

/// PostgreSQL implementation of LoanRepository
pub struct PostgresLoanRepository {
    db: DatabaseConnection,
}

impl PostgresLoanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn count(&self, filter: &LoanFilter) -> Result<u64, DomainError> {
        filtered(filter)
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

/// Loan joined with the borrower's name and the book's title
#[derive(Debug, FromQueryResult)]
struct LoanDetailsRow {
    id: Uuid,
    user_id: Uuid,
    book_id: Uuid,
    borrowed_at: DateTimeWithTimeZone,
    due_date: DateTimeWithTimeZone,
    returned_at: Option<DateTimeWithTimeZone>,
    status: String,
    user_name: String,
    book_title: String,
}

impl TryFrom<LoanDetailsRow> for LoanWithDetails {
    type Error = DomainError;

    fn try_from(row: LoanDetailsRow) -> Result<Self, Self::Error> {
        let loan = loans::Model {
            id: row.id,
            user_id: row.user_id,
            book_id: row.book_id,
            borrowed_at: row.borrowed_at,
            due_date: row.due_date,
            returned_at: row.returned_at,
            status: row.status,
        };

        Ok(LoanWithDetails {
            loan: loan.try_into()?,
            user_name: row.user_name,
            book_title: row.book_title,
        })
    }
}

fn filtered(filter: &LoanFilter) -> Select<loans::Entity> {
    let mut query = loans::Entity::find();
    if let Some(user_id) = filter.user_id {
        query = query.filter(loans::Column::UserId.eq(user_id.0));
    }
    if let Some(status) = filter.status {
        query = query.filter(loans::Column::Status.eq(status.as_str()));
    }
    query
}

/// WHERE clause and bind values for the joined query
fn where_clause(filter: &LoanFilter) -> (String, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(user_id) = filter.user_id {
        values.push(user_id.0.into());
        conditions.push(format!("l.user_id = ${}", values.len()));
    }
    if let Some(status) = filter.status {
        values.push(status.as_str().into());
        conditions.push(format!("l.status = ${}", values.len()));
    }

    if conditions.is_empty() {
        (String::new(), values)
    } else {
        (format!("WHERE {}", conditions.join(" AND ")), values)
    }
}

fn active_model(loan: &Loan) -> loans::ActiveModel {
    loans::ActiveModel {
        id: Set(loan.id.0),
        user_id: Set(loan.user_id.0),
        book_id: Set(loan.book_id.0),
        borrowed_at: Set(loan.borrowed_at.fixed_offset()),
        due_date: Set(loan.due_date.fixed_offset()),
        returned_at: Set(loan.returned_at.map(|dt| dt.fixed_offset())),
        status: Set(loan.status.to_string()),
    }
}

#[async_trait]
impl LoanRepository for PostgresLoanRepository {
    async fn create(&self, loan: &Loan) -> Result<(), DomainError> {
        active_model(loan)
            .insert(&self.db)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn get_by_id(&self, id: &LoanId) -> Result<Option<Loan>, DomainError> {
        let result = loans::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Loan::try_from).transpose()
    }

    async fn get_active_by_user_and_book(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<Option<Loan>, DomainError> {
        let result = loans::Entity::find()
            .filter(loans::Column::UserId.eq(user_id.0))
            .filter(loans::Column::BookId.eq(book_id.0))
            .filter(loans::Column::Status.eq(LoanStatus::Active.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Loan::try_from).transpose()
    }

    async fn list(
        &self,
        page: u64,
        limit: u64,
        filter: &LoanFilter,
    ) -> Result<(Vec<Loan>, u64), DomainError> {
        let total = self.count(filter).await?;

        let results = filtered(filter)
            .order_by_desc(loans::Column::BorrowedAt)
            .offset(page_offset(page, limit))
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let loans = results
            .into_iter()
            .map(Loan::try_from)
            .collect::<Result<_, _>>()?;
        Ok((loans, total))
    }

    async fn update(&self, loan: &Loan) -> Result<(), DomainError> {
        match active_model(loan).update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::LoanNotFound),
            Err(e) => Err(write_error(e)),
        }
    }

    async fn get_by_id_with_details(
        &self,
        id: &LoanId,
    ) -> Result<Option<LoanWithDetails>, DomainError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("{} WHERE l.id = $1", DETAILS_SELECT),
            [id.0.into()],
        );

        let row = LoanDetailsRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        row.map(LoanWithDetails::try_from).transpose()
    }

    async fn list_with_details(
        &self,
        page: u64,
        limit: u64,
        filter: &LoanFilter,
    ) -> Result<(Vec<LoanWithDetails>, u64), DomainError> {
        let total = self.count(filter).await?;

        let (conditions, mut values) = where_clause(filter);
        values.push(i64::try_from(limit).unwrap_or(i64::MAX).into());
        values.push(i64::try_from(page_offset(page, limit)).unwrap_or(i64::MAX).into());
        let sql = format!(
            "{} {} ORDER BY l.borrowed_at DESC LIMIT ${} OFFSET ${}",
            DETAILS_SELECT,
            conditions,
            values.len() - 1,
            values.len()
        );

        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, values);

        let rows = LoanDetailsRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let loans = rows
            .into_iter()
            .map(LoanWithDetails::try_from)
            .collect::<Result<_, _>>()?;
        Ok((loans, total))
    }
}

impl TryFrom<loans::Model> for Loan {
    type Error = DomainError;

    fn try_from(model: loans::Model) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse::<LoanStatus>()
            .map_err(|e| DomainError::Database(format!("loan {}: {}", model.id, e)))?;

        Ok(Loan {
            id: LoanId(model.id),
            user_id: UserId(model.user_id),
            book_id: BookId(model.book_id),
            borrowed_at: model.borrowed_at.with_timezone(&Utc),
            due_date: model.due_date.with_timezone(&Utc),
            returned_at: model.returned_at.map(|dt| dt.with_timezone(&Utc)),
            status,
        })
    }
}
