//! Loan domain entity
//!
//! One copy of one book lent to one user. State machine: `active` -> `returned`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::book::BookId;
use super::user::UserId;
use crate::error::DomainError;

/// Loan period applied when no due date is supplied
pub const DEFAULT_LOAN_DAYS: i64 = 14;

/// Unique identifier for a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoanId(pub Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for LoanId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LoanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(LoanStatus::Active),
            "returned" => Ok(LoanStatus::Returned),
            _ => Err(format!("Unknown loan status: {}", s)),
        }
    }
}

/// A book loan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    pub id: LoanId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

impl Loan {
    /// Open a new active loan.
    ///
    /// An explicit due date must lie strictly after now; otherwise the loan is
    /// due `DEFAULT_LOAN_DAYS` from now.
    pub fn new(
        user_id: UserId,
        book_id: BookId,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        let now = Utc::now();

        let due_date = match due_date {
            Some(due) if due <= now => return Err(DomainError::InvalidLoanDueDate),
            Some(due) => due,
            None => now + Duration::days(DEFAULT_LOAN_DAYS),
        };

        Ok(Self {
            id: LoanId::new(),
            user_id,
            book_id,
            borrowed_at: now,
            due_date,
            returned_at: None,
            status: LoanStatus::Active,
        })
    }

    /// Close the loan. Terminal; a second call fails.
    pub fn mark_returned(&mut self) -> Result<(), DomainError> {
        if self.status == LoanStatus::Returned {
            return Err(DomainError::LoanAlreadyReturned);
        }
        self.returned_at = Some(Utc::now());
        self.status = LoanStatus::Returned;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && now > self.due_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_loan() -> Loan {
        Loan::new(UserId::new(), BookId::new(), None).unwrap()
    }

    #[test]
    fn new_loan_defaults_to_fourteen_days() {
        let loan = new_loan();

        assert_eq!(loan.status, LoanStatus::Active);
        assert!(loan.returned_at.is_none());
        assert_eq!(loan.due_date - loan.borrowed_at, Duration::days(14));
    }

    #[test]
    fn new_loan_accepts_future_due_date() {
        let due = Utc::now() + Duration::days(7);
        let loan = Loan::new(UserId::new(), BookId::new(), Some(due)).unwrap();
        assert_eq!(loan.due_date, due);
    }

    #[test]
    fn new_loan_rejects_past_due_date() {
        let due = Utc::now() - Duration::hours(1);
        let result = Loan::new(UserId::new(), BookId::new(), Some(due));
        assert_eq!(result.unwrap_err(), DomainError::InvalidLoanDueDate);
    }

    #[test]
    fn return_is_terminal() {
        let mut loan = new_loan();

        loan.mark_returned().unwrap();
        assert_eq!(loan.status, LoanStatus::Returned);
        assert!(loan.returned_at.is_some());
        assert!(!loan.is_active());

        let returned_at = loan.returned_at;
        assert_eq!(
            loan.mark_returned().unwrap_err(),
            DomainError::LoanAlreadyReturned
        );
        assert_eq!(loan.returned_at, returned_at);
    }

    #[test]
    fn overdue_only_while_active() {
        let mut loan = new_loan();
        let after_due = loan.due_date + Duration::seconds(1);

        assert!(!loan.is_overdue());
        assert!(!loan.is_overdue_at(loan.due_date));
        assert!(loan.is_overdue_at(after_due));

        loan.mark_returned().unwrap();
        assert!(!loan.is_overdue_at(after_due));
    }

    #[test]
    fn status_from_str() {
        assert_eq!("active".parse::<LoanStatus>().unwrap(), LoanStatus::Active);
        assert_eq!(
            "RETURNED".parse::<LoanStatus>().unwrap(),
            LoanStatus::Returned
        );
        assert!("lost".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn status_display() {
        assert_eq!(LoanStatus::Active.to_string(), "active");
        assert_eq!(LoanStatus::Returned.to_string(), "returned");
    }
}
