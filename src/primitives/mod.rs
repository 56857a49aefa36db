//! Operation groups of the unified API.
//!
//! Each group is reached through a public field of [`crate::MedTrack`]:
//!
//! 1. `db.catalog` - test definitions
//! 2. `db.results` - patient results
//! 3. `db.reports` - filtering and summary statistics

mod catalog;
mod reports;
mod results;

pub use catalog::Catalog;
pub use reports::Reports;
pub use results::Results;
