use sqlx::PgPool;

use crate::waitlist::dto::WaitlistRequest;

/// Insert one waitlist signup.
pub async fn add_entry(db: &PgPool, entry: &WaitlistRequest) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO waitlist_users (first_name, last_name, mobile, email, objectives)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&entry.first_name)
    .bind(&entry.last_name)
    .bind(&entry.mobile)
    .bind(&entry.email)
    .bind(&entry.objectives)
    .execute(db)
    .await?;
    Ok(())
}
