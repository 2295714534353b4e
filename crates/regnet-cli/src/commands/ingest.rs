//! Ingest command implementation.

use crate::cli::{IngestArgs, RecordKind};
use crate::commands::read_input;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use regnet_ingest::{
    CompanyRecord, DebtRecord, HistoricalNameRecord, IngestReport, RelationshipIngestor,
};
use regnet_store::SqliteGraphStore;
use serde_json::Value;

/// Execute the ingest command.
pub fn execute_ingest(
    args: IngestArgs,
    store: &mut SqliteGraphStore,
    ingestor: &RelationshipIngestor,
    formatter: &Formatter,
) -> Result<IngestReport> {
    let raw = read_input(&args.file)?;
    let record = with_natural_key(serde_json::from_str(&raw)?, &args)?;

    let report = match args.kind {
        RecordKind::Company => {
            let record: CompanyRecord = serde_json::from_value(record)?;
            ingestor.ingest_company_relationships(store, &record)?
        }
        RecordKind::Debt => {
            let record: DebtRecord = serde_json::from_value(record)?;
            ingestor.ingest_debt(store, &record)?
        }
        RecordKind::HistoricalName => {
            let record: HistoricalNameRecord = serde_json::from_value(record)?;
            ingestor.ingest_historical_name(store, &record)?
        }
    };

    println!("{}", formatter.format_ingest_report(&report)?);
    Ok(report)
}

/// Overlay `--registry-id` / `--country` onto the record
fn with_natural_key(record: Value, args: &IngestArgs) -> Result<Value> {
    let Value::Object(mut map) = record else {
        return Err(CliError::InvalidInput(
            "Record must be a JSON object".to_string(),
        ));
    };

    if let Some(registry_id) = &args.registry_id {
        map.insert("registry_id".to_string(), Value::String(registry_id.clone()));
    }
    if let Some(country) = &args.country {
        map.insert("country".to_string(), Value::String(country.to_uppercase()));
    }

    Ok(Value::Object(map))
}
