pub mod chat;
pub mod ojous;
pub mod storage;
