pub mod database;
pub mod s3_stub;
pub mod test_app;

pub use database::TestDb;
pub use fakes::{FakeCompleter, FakeStorage};
pub use helpers::{file_part, seed_ojou, text_form};
pub use s3_stub::{S3Call, S3Stub};
pub use test_app::{TestApp, TestAppOptions};
