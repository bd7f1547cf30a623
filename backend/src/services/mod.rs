//! Service layer between the HTTP handlers and the repository.
//!
//! - `search`: MAXREC-aware query execution
//! - `votable`: VOTable rendering of results and errors
//! - `fake_data`: random ObsCore rows for development databases

pub mod fake_data;
pub mod search;
pub mod votable;

pub use fake_data::{generate_fake_record, generate_fake_records};
pub use search::{perform_sia_query, SearchResult};
pub use votable::{votable_error, write_votable, VOTABLE_MEDIA_TYPE};
