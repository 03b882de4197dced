//! Ojou gallery handlers
//!
//! Listing, the upload form with its multipart submission, and the detail
//! page with presigned asset links. Handlers stay thin: they read the
//! request, delegate to services, and render a template.

use axum::{
    extract::{Multipart, Path, Query, State, multipart::Field},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use futures::TryStreamExt;
use minijinja::context;

use super::{acquire_db_connection, log_handler_error};
use crate::{
    error::{Error, Result},
    models::ojous::{AssetKind, UpdateOjouAssets},
    models::requests::{ListQuery, OjouForm},
    services::ojous as ojou_services,
    services::storage::{ByteStream, asset_key},
    state::AppState,
};

// ============================================================================
// LIST
// ============================================================================

/// GET /
///
/// Lists every ojou, oldest first. `?created={id}` shows the upload notice.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    let mut conn = acquire_db_connection(&state, "list_ojous").await?;

    let ojous = ojou_services::list_ojous(&mut conn)
        .await
        .inspect_err(|e| log_handler_error("list_ojous", e))?;

    let html = state.templates.render(
        "index.html",
        context! { ojous => ojous, created => query.created },
    )?;

    Ok(Html(html))
}

// ============================================================================
// UPLOAD
// ============================================================================

/// GET /upload
pub async fn upload_form(State(state): State<AppState>) -> Result<Html<String>> {
    render_upload_form(&state, &OjouForm::default(), None).map(Html)
}

/// POST /upload
///
/// Accepts `name`, `description`, `quote` and optional `image_file` /
/// `pdf_file` parts. Text parts must come before file parts, which is the
/// order browsers send them in. A text part after a file part is rejected
/// with 400; the record and any files already stored are kept. The record is inserted when the first file
/// part arrives (or at the end when there is none), then each file is
/// streamed to object storage and its key attached once the upload
/// succeeds.
///
/// A rejected form is rendered back with status 400 and the values the
/// visitor typed. Success redirects to `/?created={id}`.
pub async fn upload_ojou(State(state): State<AppState>, multipart: Multipart) -> Response {
    let mut progress = UploadProgress::default();

    match create_from_multipart(&state, multipart, &mut progress).await {
        Ok(id) => Redirect::to(&format!("/?created={}", id)).into_response(),
        Err(Error::Validation(errors)) if progress.created.is_none() => {
            tracing::debug!(operation = "upload_ojou", field = %errors.field, "Upload form rejected");
            match render_upload_form(&state, &progress.form, Some(&errors.message)) {
                Ok(html) => (StatusCode::BAD_REQUEST, Html(html)).into_response(),
                Err(e) => {
                    log_handler_error("upload_ojou", &e);
                    e.into_response()
                }
            }
        }
        Err(e) => {
            log_handler_error("upload_ojou", &e);
            e.into_response()
        }
    }
}

#[derive(Debug, Default)]
struct UploadProgress {
    form: OjouForm,
    created: Option<i64>,
}

async fn create_from_multipart(
    state: &AppState,
    mut multipart: Multipart,
    progress: &mut UploadProgress,
) -> Result<i64> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        let Some(kind) = AssetKind::from_form_field(&name) else {
            if progress.created.is_some() && OjouForm::is_text_field(&name) {
                tracing::warn!(
                    operation = "upload_ojou",
                    ojou_id = ?progress.created,
                    field = %name,
                    "Text field sent after a file part",
                );
                return Err(Error::validation(&name, "Text fields must be sent before file uploads"));
            }
            let value = field.text().await.map_err(multipart_error)?;
            progress.form.set_field(&name, value);
            continue;
        };

        let id = match progress.created {
            Some(id) => id,
            None => {
                let id = insert_record(state, &progress.form).await?;
                progress.created = Some(id);
                id
            }
        };

        upload_asset(state, id, kind, field).await?;
    }

    match progress.created {
        Some(id) => Ok(id),
        None => {
            let id = insert_record(state, &progress.form).await?;
            progress.created = Some(id);
            Ok(id)
        }
    }
}

async fn insert_record(state: &AppState, form: &OjouForm) -> Result<i64> {
    let mut conn = acquire_db_connection(state, "upload_ojou").await?;
    let ojou = ojou_services::create_ojou(&mut conn, form.to_new_ojou()).await?;
    Ok(ojou.id)
}

/// Streams one file part to storage and records its key. Parts without a
/// file name are an empty file input and are skipped.
async fn upload_asset(state: &AppState, id: i64, kind: AssetKind, field: Field<'_>) -> Result<()> {
    let Some(filename) = field.file_name().filter(|f| !f.is_empty()).map(str::to_owned) else {
        return Ok(());
    };
    let content_type = field.content_type().map(str::to_owned);
    let key = asset_key(id, kind, &filename);

    tracing::info!(
        operation = "upload_asset",
        ojou_id = id,
        kind = %kind,
        key = %key,
        "Uploading asset",
    );

    let body: ByteStream<'_> = Box::pin(field.map_err(multipart_error));
    state
        .storage
        .put(&key, body, None, content_type.as_deref())
        .await?;

    let mut conn = acquire_db_connection(state, "upload_asset").await?;
    ojou_services::attach_assets(&mut conn, id, UpdateOjouAssets::for_kind(kind, key)).await
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> Error {
    Error::validation("upload", &e.body_text())
}

fn render_upload_form(state: &AppState, form: &OjouForm, error: Option<&str>) -> Result<String> {
    state
        .templates
        .render("upload.html", context! { form => form, error => error })
}

// ============================================================================
// DETAIL
// ============================================================================

/// GET /ojou/{id}
///
/// Shows one ojou with presigned links to her image and story. A key that
/// is recorded but missing from the bucket is a storage failure, not a 404.
pub async fn ojou_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>> {
    let mut conn = acquire_db_connection(&state, "ojou_detail").await?;

    let ojou = ojou_services::get_ojou(&mut conn, id)
        .await
        .inspect_err(|e| log_handler_error("ojou_detail", e))?;
    drop(conn);

    let image_url = presign(&state, ojou.image_filename.as_deref())
        .await
        .inspect_err(|e| log_handler_error("ojou_detail", e))?;
    let pdf_url = presign(&state, ojou.story_filename.as_deref())
        .await
        .inspect_err(|e| log_handler_error("ojou_detail", e))?;

    let html = state.templates.render(
        "detail.html",
        context! { ojou => ojou, image_url => image_url, pdf_url => pdf_url },
    )?;

    Ok(Html(html))
}

async fn presign(state: &AppState, key: Option<&str>) -> Result<Option<String>> {
    let Some(key) = key else {
        return Ok(None);
    };

    match state.storage.presign_get(key, state.config.storage.presign_ttl()).await {
        Ok(url) => Ok(Some(url)),
        Err(Error::NotFound(msg)) => Err(Error::Storage(msg)),
        Err(e) => Err(e),
    }
}
