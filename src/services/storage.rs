use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Builder as S3ConfigBuilder, Credentials, Region},
    error::DisplayErrorContext,
    presigning::PresigningConfig,
    primitives::ByteStream as S3ByteStream,
    types::{CompletedMultipartUpload, CompletedPart},
};
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use secrecy::ExposeSecret;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::models::ojous::AssetKind;

/// Upload body: chunks of bytes arriving in order, length not known up front.
pub type ByteStream<'a> = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send + 'a>>;

/// Multipart part size. Bodies that fit in one part go out as a single PUT.
pub const PART_SIZE: usize = 10 * 1024 * 1024;

/// Object key for an uploaded asset: `{ojou_id}_{kind}_{filename}`.
///
/// The id prefix makes keys unique per (ojou, kind) whatever the filename is.
pub fn asset_key(ojou_id: i64, kind: AssetKind, filename: &str) -> String {
    format!("{}_{}_{}", ojou_id, kind.as_str(), base_filename(filename))
}

/// Final path component of a client-supplied filename.
pub fn base_filename(filename: &str) -> &str {
    filename.rsplit(['/', '\\']).next().unwrap_or(filename)
}

/// Bucket-scoped object storage used for persona assets.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Creates the bucket when it does not exist yet. Safe to call repeatedly.
    async fn ensure_bucket(&self) -> Result<()>;

    /// Streams `body` to `key`. `size_hint` may be `None` when the length is unknown.
    async fn put(
        &self,
        key: &str,
        body: ByteStream<'_>,
        size_hint: Option<u64>,
        content_type: Option<&str>,
    ) -> Result<()>;

    /// Issues a time-limited GET URL. Fails with `NotFound` when the object is missing.
    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String>;
}

/// S3 API backed storage (AWS, MinIO and other compatible services)
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
}

impl S3ObjectStorage {
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.expose_secret().to_string(),
            None,
            None,
            "ojou-config",
        );

        let s3_config = S3ConfigBuilder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint_url())
            .credentials_provider(credentials)
            .force_path_style(config.force_path_style)
            .build();

        info!(
            endpoint = %config.endpoint_url(),
            bucket = %config.bucket,
            "S3 client initialized"
        );

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }

    async fn put_single(&self, key: &str, data: Bytes, content_type: Option<&str>) -> Result<()> {
        let size = data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(S3ByteStream::from(data))
            .send()
            .await
            .map_err(|e| storage_error("upload", key, e))?;

        info!(bucket = %self.bucket, key, size, "Object uploaded");
        Ok(())
    }

    async fn put_multipart(
        &self,
        key: &str,
        first_part: BytesMut,
        body: ByteStream<'_>,
        content_type: Option<&str>,
    ) -> Result<()> {
        let upload = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(|e| storage_error("start multipart upload", key, e))?;

        let upload_id = upload
            .upload_id()
            .ok_or_else(|| Error::Storage(format!("No upload id returned for {}", key)))?
            .to_string();

        let parts = match self.upload_parts(key, &upload_id, first_part, body).await {
            Ok(parts) => parts,
            Err(e) => {
                self.abort_multipart(key, &upload_id).await;
                return Err(e);
            }
        };
        let part_count = parts.len();

        let completed = self
            .client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(&upload_id)
            .multipart_upload(CompletedMultipartUpload::builder().set_parts(Some(parts)).build())
            .send()
            .await;

        if let Err(e) = completed {
            self.abort_multipart(key, &upload_id).await;
            return Err(storage_error("complete multipart upload", key, e));
        }

        info!(bucket = %self.bucket, key, parts = part_count, "Object uploaded in parts");
        Ok(())
    }

    async fn upload_parts(
        &self,
        key: &str,
        upload_id: &str,
        mut buffer: BytesMut,
        mut body: ByteStream<'_>,
    ) -> Result<Vec<CompletedPart>> {
        let mut parts = Vec::new();
        let mut part_number: i32 = 1;
        let mut exhausted = false;

        loop {
            let data = buffer.split().freeze();
            debug!(key, part_number, size = data.len(), "Uploading part");

            let output = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(S3ByteStream::from(data))
                .send()
                .await
                .map_err(|e| storage_error("upload part of", key, e))?;

            parts.push(
                CompletedPart::builder()
                    .set_e_tag(output.e_tag().map(str::to_string))
                    .part_number(part_number)
                    .build(),
            );
            part_number += 1;

            if exhausted {
                break;
            }
            exhausted = fill_part(&mut buffer, &mut body).await?;
            if buffer.is_empty() {
                break;
            }
        }

        Ok(parts)
    }

    async fn abort_multipart(&self, key: &str, upload_id: &str) {
        let aborted = self
            .client
            .abort_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await;

        if let Err(e) = aborted {
            warn!(key, upload_id, error = %DisplayErrorContext(&e), "Failed to abort multipart upload");
        }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn ensure_bucket(&self) -> Result<()> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                debug!(bucket = %self.bucket, "Bucket exists");
                return Ok(());
            }
            Err(e) => {
                let missing = e.as_service_error().is_some_and(|se| se.is_not_found());
                if !missing {
                    return Err(storage_error("check bucket", &self.bucket, e));
                }
            }
        }

        match self.client.create_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                info!(bucket = %self.bucket, "Bucket created");
                Ok(())
            }
            // Another instance created it between our HEAD and CREATE
            Err(e) if e.as_service_error().is_some_and(|se| se.is_bucket_already_owned_by_you()) => Ok(()),
            Err(e) => Err(storage_error("create bucket", &self.bucket, e)),
        }
    }

    async fn put(
        &self,
        key: &str,
        mut body: ByteStream<'_>,
        size_hint: Option<u64>,
        content_type: Option<&str>,
    ) -> Result<()> {
        debug!(bucket = %self.bucket, key, ?size_hint, "Starting upload");

        let mut buffer = BytesMut::new();
        if fill_part(&mut buffer, &mut body).await? {
            self.put_single(key, buffer.freeze(), content_type).await
        } else {
            self.put_multipart(key, buffer, body, content_type).await
        }
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String> {
        if let Err(e) = self.client.head_object().bucket(&self.bucket).key(key).send().await {
            if e.as_service_error().is_some_and(|se| se.is_not_found()) {
                return Err(Error::NotFound(format!("Object {} not found", key)));
            }
            return Err(storage_error("check object", key, e));
        }

        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| Error::Storage(format!("Invalid presign TTL {:?}: {}", ttl, e)))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| storage_error("presign", key, e))?;

        Ok(request.uri().to_string())
    }
}

/// Reads from `body` until `buffer` holds at least one part.
/// Returns `true` when the stream is exhausted.
async fn fill_part(buffer: &mut BytesMut, body: &mut ByteStream<'_>) -> Result<bool> {
    while buffer.len() < PART_SIZE {
        match body.next().await {
            Some(chunk) => buffer.extend_from_slice(&chunk?),
            None => return Ok(true),
        }
    }
    Ok(false)
}

fn storage_error<E>(action: &str, target: &str, err: E) -> Error
where
    E: std::error::Error + 'static,
{
    Error::Storage(format!("Failed to {} {}: {}", action, target, DisplayErrorContext(err)))
}
