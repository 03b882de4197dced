use chrono::Utc;

use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::ojous::{NewOjou, Ojou, UpdateOjouAssets},
};

/// Inserts a new ojou with no assets attached and returns the stored row.
pub async fn create_ojou(conn: &mut DbConn, new_ojou: NewOjou) -> Result<Ojou> {
    let ojou = sqlx::query_as::<_, Ojou>(
        r#"
        INSERT INTO ojous (name, description, quote, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, description, quote, image_filename, story_filename, created_at
        "#,
    )
    .bind(new_ojou.name)
    .bind(new_ojou.description)
    .bind(new_ojou.quote)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(ojou)
}

/// Gets a single ojou by ID. Expects the ojou to exist.
pub async fn get_ojou_by_id(conn: &mut DbConn, id: i64) -> Result<Ojou> {
    let ojou = sqlx::query_as::<_, Ojou>(
        r#"
        SELECT id, name, description, quote, image_filename, story_filename, created_at
        FROM ojous
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(ojou)
}

/// Gets a single ojou by ID. The ojou may not exist.
pub async fn get_ojou_by_id_optional(conn: &mut DbConn, id: i64) -> Result<Option<Ojou>> {
    let ojou = sqlx::query_as::<_, Ojou>(
        r#"
        SELECT id, name, description, quote, image_filename, story_filename, created_at
        FROM ojous
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(ojou)
}

/// Lists all ojous in insertion order.
pub async fn list_ojous(conn: &mut DbConn) -> Result<Vec<Ojou>> {
    let ojous = sqlx::query_as::<_, Ojou>(
        r#"
        SELECT id, name, description, quote, image_filename, story_filename, created_at
        FROM ojous
        ORDER BY id ASC
        "#,
    )
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(ojous)
}

/// Sets the provided asset keys, leaving the others as they are.
/// Returns the number of rows touched (0 when the id is unknown).
pub async fn update_ojou_assets(conn: &mut DbConn, id: i64, update: UpdateOjouAssets) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        UPDATE ojous
        SET image_filename = COALESCE(?, image_filename),
            story_filename = COALESCE(?, story_filename)
        WHERE id = ?
        "#,
    )
    .bind(update.image_filename)
    .bind(update.story_filename)
    .bind(id)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(rows_affected)
}
