//! Database access for the HTTP layer
//!
//! Repositories borrow a request's session rather than the pool, so every
//! statement of one request runs on the same connection.

pub mod notes;

pub use notes::NoteRepo;
