use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::ojous::{NewOjou, Ojou, UpdateOjouAssets},
    queries::ojous,
    validation::validate_new_ojou,
};

/// Validates and inserts a new ojou. Nothing is written when validation fails.
///
/// A blank quote is stored as NULL.
pub async fn create_ojou(conn: &mut DbConn, mut new_ojou: NewOjou) -> Result<Ojou> {
    validate_new_ojou(&new_ojou)?;

    new_ojou.quote = new_ojou.quote.filter(|quote| !quote.trim().is_empty());

    let ojou = ojous::create_ojou(conn, new_ojou).await?;

    tracing::info!(
        operation = "create_ojou",
        ojou_id = ojou.id,
        name = %ojou.name,
        "Ojou created",
    );

    Ok(ojou)
}

/// Attaches uploaded asset keys to an existing ojou.
///
/// Only the keys present in `update` change. An empty update is a no-op
/// apart from the existence check.
pub async fn attach_assets(conn: &mut DbConn, id: i64, update: UpdateOjouAssets) -> Result<()> {
    if update.is_empty() {
        return get_ojou(conn, id).await.map(|_| ());
    }

    let rows_affected = ojous::update_ojou_assets(conn, id, update.clone()).await?;

    if rows_affected == 0 {
        return Err(Error::NotFound(format!("Ojou {} not found", id)));
    }

    tracing::info!(
        operation = "attach_assets",
        ojou_id = id,
        image_filename = ?update.image_filename,
        story_filename = ?update.story_filename,
        "Assets attached",
    );

    Ok(())
}

/// Gets an ojou by ID
pub async fn get_ojou(conn: &mut DbConn, id: i64) -> Result<Ojou> {
    ojous::get_ojou_by_id_optional(conn, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Ojou {} not found", id)))
}

/// Lists all ojous, oldest first
pub async fn list_ojous(conn: &mut DbConn) -> Result<Vec<Ojou>> {
    ojous::list_ojous(conn).await
}
