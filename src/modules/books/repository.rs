//! Storage operations for books. One statement per call; no transactions.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use thiserror::Error;
use time::OffsetDateTime;

use super::entity::{self, Column, Entity as Books};
use super::models::CreateBook;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid book id '{0}'")]
    InvalidId(String),

    /// No readable row: never inserted, or soft deleted.
    #[error("book {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

/// Parse a path identifier into a primary key.
pub fn parse_id(raw: &str) -> Result<i64, StoreError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// Holds the process-wide connection and performs the book queries. Cloning
/// is cheap; clones share the same pool.
#[derive(Debug, Clone)]
pub struct Repository {
    db: DatabaseConnection,
}

impl Repository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn create(&self, book: CreateBook) -> Result<entity::Model, StoreError> {
        let now = OffsetDateTime::now_utc();
        let active = entity::ActiveModel {
            id: NotSet,
            author: Set(book.author),
            title: Set(book.title),
            publisher: Set(book.publisher),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        Ok(active.insert(&self.db).await?)
    }

    /// Mark the book deleted. Returns the number of rows that changed, which
    /// is 0 when the id does not exist or was already deleted.
    pub async fn soft_delete(&self, id: &str) -> Result<u64, StoreError> {
        let id = parse_id(id)?;
        let now = OffsetDateTime::now_utc();

        let result = Books::update_many()
            .col_expr(Column::DeletedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn find(&self, id: &str) -> Result<entity::Model, StoreError> {
        let id = parse_id(id)?;

        Books::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    /// Every book that has not been deleted, in insertion order.
    pub async fn list(&self) -> Result<Vec<entity::Model>, StoreError> {
        Ok(Books::find()
            .filter(Column::DeletedAt.is_null())
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Migrator;

    async fn repository() -> Repository {
        let db = bookshelf_db::connect_url("sqlite::memory:", 1).await.unwrap();
        bookshelf_db::migrate::<Migrator>(&db).await.unwrap();
        Repository::new(db)
    }

    fn new_book(title: &str) -> CreateBook {
        CreateBook {
            author: "Ursula K. Le Guin".to_string(),
            title: title.to_string(),
            publisher: "Ace".to_string(),
        }
    }

    #[test]
    fn parse_id_accepts_surrounding_whitespace() {
        assert_eq!(parse_id(" 42 ").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(StoreError::InvalidId(ref s)) if s == "abc"));
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let repo = repository().await;

        let first = repo.create(new_book("The Dispossessed")).await.unwrap();
        let second = repo.create(new_book("The Lathe of Heaven")).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.title, "The Dispossessed");
        assert!(first.deleted_at.is_none());
    }

    #[tokio::test]
    async fn soft_delete_hides_row_and_reports_affected_count() {
        let repo = repository().await;
        let book = repo.create(new_book("Lavinia")).await.unwrap();
        let id = book.id.to_string();

        assert_eq!(repo.soft_delete(&id).await.unwrap(), 1);
        assert_eq!(repo.soft_delete(&id).await.unwrap(), 0);

        assert!(matches!(
            repo.find(&id).await,
            Err(StoreError::NotFound(found)) if found == book.id
        ));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn soft_delete_keeps_the_row() {
        let repo = repository().await;
        let book = repo.create(new_book("Always Coming Home")).await.unwrap();
        repo.soft_delete(&book.id.to_string()).await.unwrap();

        let stored = Books::find_by_id(book.id)
            .one(repo.connection())
            .await
            .unwrap()
            .expect("row is still present");
        assert!(stored.deleted_at.is_some());
        assert_eq!(stored.title, "Always Coming Home");
    }

    #[tokio::test]
    async fn find_unknown_id_is_not_found() {
        let repo = repository().await;
        assert!(matches!(repo.find("999").await, Err(StoreError::NotFound(999))));
    }

    #[tokio::test]
    async fn list_returns_books_in_id_order() {
        let repo = repository().await;
        for title in ["A", "B", "C"] {
            repo.create(new_book(title)).await.unwrap();
        }

        let titles: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }
}
