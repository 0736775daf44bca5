//! Index bootstrap

use mongodb::{bson::doc, options::IndexOptions, Database, IndexModel};

use super::documents::{BookDocument, LoanDocument, UserDocument};

pub(crate) const USERS_EMAIL_INDEX: &str = "users_email_unique";
pub(crate) const BOOKS_ISBN_INDEX: &str = "books_isbn_unique";

fn index(keys: mongodb::bson::Document, name: &str, unique: bool) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .unique(unique)
                .name(name.to_string())
                .build(),
        )
        .build()
}

/// Create the unique and lookup indexes if they do not exist yet
pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    db.collection::<UserDocument>("users")
        .create_indexes(vec![
            index(doc! { "email": 1 }, USERS_EMAIL_INDEX, true),
            index(doc! { "id": 1 }, "users_id_unique", true),
            index(doc! { "createdat": -1 }, "users_createdat", false),
        ])
        .await?;

    db.collection::<BookDocument>("books")
        .create_indexes(vec![
            index(doc! { "isbn": 1 }, BOOKS_ISBN_INDEX, true),
            index(doc! { "id": 1 }, "books_id_unique", true),
            index(doc! { "availablecopies": 1 }, "books_availablecopies", false),
        ])
        .await?;

    db.collection::<LoanDocument>("loans")
        .create_indexes(vec![
            index(doc! { "id": 1 }, "loans_id_unique", true),
            index(doc! { "userid": 1, "bookid": 1, "status": 1 }, "loans_user_book_status", false),
            index(doc! { "borrowedat": -1 }, "loans_borrowedat", false),
        ])
        .await?;

    tracing::info!("MongoDB indexes ready");
    Ok(())
}
