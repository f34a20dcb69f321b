use sqlx::SqliteConnection;

/// Returns the remote customer id linked to the user, if any.
pub(crate) async fn customer_id_for_user(
    user_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT customer_id FROM user_links WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(|(customer_id,)| customer_id))
}

pub(crate) async fn link_customer(
    user_id: &str,
    customer_id: &str,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO user_links (user_id, customer_id) VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET customer_id = excluded.customer_id, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(user_id)
    .bind(customer_id)
    .execute(conn)
    .await?;
    Ok(())
}
