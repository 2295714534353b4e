//! Regnet Relationship Ingestor
//!
//! Writes normalized company-registry records into the relationship graph.
//!
//! # Overview
//!
//! A registry provider hands over one record per company: its name, its
//! registered seat, its executives and its shareholders. The ingestor derives
//! a stable id for every entity in the record, upserts the nodes and links
//! them to the company with `LOCATED_AT`, `MANAGED_BY` and `OWNED_BY` edges.
//! Because ids are content-addressed and upserts merge, ingesting the same
//! record twice creates no new rows.
//!
//! # Architecture
//!
//! ```text
//! Provider record → RelationshipIngestor → GraphStore
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use regnet_ingest::{CompanyRecord, IngestConfig, RelationshipIngestor};
//! use regnet_store::SqliteGraphStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteGraphStore::new(":memory:")?;
//! let ingestor = RelationshipIngestor::new(IngestConfig::default());
//!
//! let record = CompanyRecord {
//!     registry_id: "123".to_string(),
//!     country: "SK".to_string(),
//!     company_label: "Alfa s.r.o.".to_string(),
//!     executives: vec!["Ján Novák".to_string()],
//!     ..Default::default()
//! };
//!
//! let report = ingestor.ingest_company_relationships(&mut store, &record)?;
//! println!("Inserted: {} rows", report.total_inserted());
//! println!("Failures: {}", report.failures.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod ingestor;
mod types;

#[cfg(test)]
mod tests;

pub use config::IngestConfig;
pub use error::IngestError;
pub use ingestor::RelationshipIngestor;
pub use types::{
    Address, CompanyRecord, DebtRecord, HistoricalNameRecord, IngestFailure, IngestReport,
    PersonEntry,
};
