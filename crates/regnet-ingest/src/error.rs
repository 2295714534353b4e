//! Error types for the Relationship Ingestor

use thiserror::Error;

/// Errors that abort an ingestion call
///
/// Failures of individual person, owner, address or edge writes do not
/// surface here; they are collected in the returned report instead.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The company node, which anchors every edge of the record, could not be written
    #[error("Store error: {0}")]
    Store(String),

    /// The record lacks a field needed to derive the company id
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A debt or historical-name record refers to a company that was never ingested
    #[error("Unknown company: {0}")]
    UnknownCompany(String),
}
