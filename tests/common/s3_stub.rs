//! Minimal S3 endpoint served over HTTP for exercising `S3ObjectStorage`
//!
//! Understands the path-style requests the storage layer sends and records
//! each one as an `S3Call`. Objects and in-flight parts live in memory.

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use ojou::{config::StorageConfig, services::storage::S3ObjectStorage};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const UPLOAD_ID: &str = "stub-upload-1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum S3Call {
    HeadBucket,
    CreateBucket,
    PutObject { key: String, size: usize },
    CreateMultipartUpload { key: String },
    UploadPart { part_number: i32, size: usize },
    CompleteMultipartUpload { parts: Vec<i32> },
    AbortMultipartUpload,
    HeadObject { key: String },
    Other(String),
}

#[derive(Default)]
struct StubState {
    calls: Vec<S3Call>,
    bucket_exists: bool,
    /// HEAD on the bucket reports 404 even when it exists
    hide_bucket: bool,
    fail_part: Option<i32>,
    objects: HashMap<String, Vec<u8>>,
    parts: BTreeMap<i32, Bytes>,
}

type SharedState = Arc<Mutex<StubState>>;

pub struct S3Stub {
    pub endpoint: String,
    state: SharedState,
}

impl S3Stub {
    pub async fn start() -> Self {
        let state = SharedState::default();
        let app = Router::new()
            .fallback(handle)
            .layer(DefaultBodyLimit::disable())
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind S3 stub");
        let addr = listener.local_addr().expect("S3 stub has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("S3 stub stopped");
        });

        Self {
            endpoint: format!("http://{}", addr),
            state,
        }
    }

    /// Storage client pointed at this endpoint with the default bucket.
    pub fn storage(&self) -> S3ObjectStorage {
        S3ObjectStorage::new(&StorageConfig {
            endpoint: self.endpoint.clone(),
            ..StorageConfig::default()
        })
    }

    pub fn fail_part(&self, part_number: i32) {
        self.state.lock().unwrap().fail_part = Some(part_number);
    }

    /// Bucket exists but HEAD keeps answering 404, as when two instances race.
    pub fn hide_existing_bucket(&self) {
        let mut state = self.state.lock().unwrap();
        state.bucket_exists = true;
        state.hide_bucket = true;
    }

    pub fn insert_object(&self, key: &str, data: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(key.to_string(), data.to_vec());
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().objects.get(key).cloned()
    }

    pub fn calls(&self) -> Vec<S3Call> {
        self.state.lock().unwrap().calls.clone()
    }
}

async fn handle(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let path = uri.path().trim_start_matches('/');
    let key = path.split_once('/').map(|(_, key)| key).unwrap_or_default();
    let mut state = state.lock().unwrap();

    match (method.as_str(), key.is_empty()) {
        ("HEAD", true) => {
            state.calls.push(S3Call::HeadBucket);
            if state.bucket_exists && !state.hide_bucket {
                StatusCode::OK.into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }
        ("PUT", true) => {
            state.calls.push(S3Call::CreateBucket);
            if state.bucket_exists {
                return error_response(StatusCode::CONFLICT, "BucketAlreadyOwnedByYou");
            }
            state.bucket_exists = true;
            StatusCode::OK.into_response()
        }
        ("PUT", false) => match query.get("partNumber").and_then(|n| n.parse::<i32>().ok()) {
            Some(part_number) => {
                state.calls.push(S3Call::UploadPart {
                    part_number,
                    size: body.len(),
                });
                if state.fail_part == Some(part_number) {
                    return error_response(StatusCode::BAD_REQUEST, "InvalidArgument");
                }
                state.parts.insert(part_number, body);
                etag_response(part_number)
            }
            None => {
                state.calls.push(S3Call::PutObject {
                    key: key.to_string(),
                    size: body.len(),
                });
                state.objects.insert(key.to_string(), body.to_vec());
                etag_response(0)
            }
        },
        ("POST", false) if query.contains_key("uploads") => {
            state.calls.push(S3Call::CreateMultipartUpload {
                key: key.to_string(),
            });
            state.parts.clear();
            xml_response(format!(
                "<InitiateMultipartUploadResult><Bucket>ojousama-bucket</Bucket>\
                 <Key>{}</Key><UploadId>{}</UploadId></InitiateMultipartUploadResult>",
                key, UPLOAD_ID
            ))
        }
        ("POST", false) if query.contains_key("uploadId") => {
            let parts = completed_part_numbers(&String::from_utf8_lossy(&body));
            state.calls.push(S3Call::CompleteMultipartUpload {
                parts: parts.clone(),
            });
            let mut object = Vec::new();
            for part_number in &parts {
                if let Some(data) = state.parts.get(part_number) {
                    object.extend_from_slice(data);
                }
            }
            state.objects.insert(key.to_string(), object);
            xml_response(format!(
                "<CompleteMultipartUploadResult><Bucket>ojousama-bucket</Bucket>\
                 <Key>{}</Key><ETag>\"complete\"</ETag></CompleteMultipartUploadResult>",
                key
            ))
        }
        ("DELETE", false) if query.contains_key("uploadId") => {
            state.calls.push(S3Call::AbortMultipartUpload);
            state.parts.clear();
            StatusCode::NO_CONTENT.into_response()
        }
        ("HEAD", false) => {
            state.calls.push(S3Call::HeadObject {
                key: key.to_string(),
            });
            if state.objects.contains_key(key) {
                StatusCode::OK.into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }
        _ => {
            state.calls.push(S3Call::Other(format!("{} {}", method, uri)));
            error_response(StatusCode::BAD_REQUEST, "NotImplemented")
        }
    }
}

/// Part numbers listed in a CompleteMultipartUpload body, in order.
fn completed_part_numbers(body: &str) -> Vec<i32> {
    body.split("<PartNumber>")
        .skip(1)
        .filter_map(|rest| rest.split_once("</PartNumber>"))
        .filter_map(|(number, _)| number.trim().parse().ok())
        .collect()
}

fn etag_response(part_number: i32) -> Response {
    (
        StatusCode::OK,
        [(header::ETAG, format!("\"etag-{}\"", part_number))],
    )
        .into_response()
}

fn xml_response(body: String) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

fn error_response(status: StatusCode, code: &str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/xml")],
        format!("<Error><Code>{}</Code><Message>stubbed failure</Message></Error>", code),
    )
        .into_response()
}
