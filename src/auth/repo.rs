use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Row in nutri_users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

impl User {
    /// Insert a new user, returning the generated id. Unique-constraint
    /// violations surface as `sqlx::Error::Database` for the handler to map.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        password_hash: &str,
    ) -> sqlx::Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO nutri_users (name, email, phone, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(row.0)
    }

    /// Match an identifier against either email or phone.
    pub async fn find_by_identifier(db: &PgPool, identifier: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, password_hash, created_at
            FROM nutri_users
            WHERE email = $1 OR phone = $1
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(db)
        .await
    }
}
