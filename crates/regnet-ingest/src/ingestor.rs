//! Core Relationship Ingestor implementation

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::types::{
    CompanyRecord, DebtRecord, HistoricalNameRecord, IngestFailure, IngestReport, PersonEntry,
};
use regnet_domain::details::details_from;
use regnet_domain::identity::{
    address_id, classify_entity, company_id, debt_id, history_id, owner_id, person_id, EntityKind,
};
use regnet_domain::traits::{GraphStore, UpsertOutcome};
use regnet_domain::{EdgeType, EdgeUpsert, NodeType, NodeUpsert};
use serde_json::json;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// The Relationship Ingestor turns a normalized company record into graph rows
///
/// The ingestor holds no store of its own; every call borrows the store it
/// writes to, so the same ingestor can feed several databases.
#[derive(Debug, Clone, Default)]
pub struct RelationshipIngestor {
    config: IngestConfig,
}

impl RelationshipIngestor {
    /// Create a new ingestor
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Write a company, its seat, its executives and its shareholders
    ///
    /// Every node and edge is upserted on its own. A failed write is recorded
    /// in the report and the remaining writes go ahead; an edge whose endpoint
    /// could not be written is skipped. Only a failure to write the company
    /// node itself aborts the call.
    pub fn ingest_company_relationships<S>(
        &self,
        store: &mut S,
        record: &CompanyRecord,
    ) -> Result<IngestReport, IngestError>
    where
        S: GraphStore,
        S::Error: Display,
    {
        let registry_id = record.registry_id.trim();
        let country = record.country.trim();
        if registry_id.is_empty() {
            return Err(IngestError::InvalidRecord("registry_id is empty".to_string()));
        }
        if country.is_empty() {
            return Err(IngestError::InvalidRecord("country is empty".to_string()));
        }

        let source = self.source_of(record.source.as_deref());
        let company = company_id(country, registry_id);

        info!(
            "Ingesting company {} ({} executives, {} shareholders)",
            company,
            record.executive_people.len().max(record.executives.len()),
            record.shareholder_people.len().max(record.owners.len())
        );

        let mut batch = Batch::new(store, &company);

        // Company node anchors every edge below
        let company_label = if record.company_label.trim().is_empty() {
            company.clone()
        } else {
            self.config.clamp_label(record.company_label.trim())
        };
        batch.anchor(
            NodeUpsert::new(&company, company_label, NodeType::Company, country).with_details(
                details_from([
                    ("registry_id", Some(json!(registry_id))),
                    ("source", Some(json!(source))),
                ]),
            ),
        )?;

        // Registered seat
        if let Some(address) = &record.address {
            let label = address.label();
            if !label.is_empty() {
                let id = address_id(country, &label);
                let mut details = address.to_details();
                details.insert("source".to_string(), json!(source));

                let written = batch.node(
                    NodeUpsert::new(&id, self.config.clamp_label(&label), NodeType::Address, country)
                        .with_details(details),
                );
                batch.edge(
                    EdgeUpsert::new(&company, &id, EdgeType::LocatedAt)
                        .with_details(details_from([("source", Some(json!(source)))])),
                    written,
                );
            }
        }

        // Executives, structured entries preferred
        for person in people(&record.executive_people, &record.executives) {
            let name = person.name.trim();
            if name.is_empty() {
                continue;
            }

            let id = person_id(country, name, person.birth_date_or_empty());
            let written = batch.node(
                NodeUpsert::new(&id, self.config.clamp_label(name), NodeType::Person, country)
                    .with_details(details_from([
                        ("role", person.role.as_deref().map(|v| json!(v))),
                        ("since", person.since.as_deref().map(|v| json!(v))),
                        ("until", person.until.as_deref().map(|v| json!(v))),
                        ("birth_date", person.birth_date.as_deref().map(|v| json!(v))),
                        ("residence_address", person.residence_address.clone()),
                        ("source", Some(json!(source))),
                    ])),
            );
            batch.edge(
                EdgeUpsert::new(&company, &id, EdgeType::ManagedBy).with_details(details_from([
                    ("role", person.role.as_deref().map(|v| json!(v))),
                    ("source", Some(json!(source))),
                ])),
                written,
            );
        }

        // Shareholders, structured entries preferred
        for owner in people(&record.shareholder_people, &record.owners) {
            let name = owner.name.trim();
            if name.is_empty() {
                continue;
            }

            let (id, node_type) = match classify_entity(name) {
                EntityKind::LegalEntity => (owner_id(country, name), NodeType::CompanyRef),
                EntityKind::Person => (
                    person_id(country, name, owner.birth_date_or_empty()),
                    NodeType::Person,
                ),
            };
            let written = batch.node(
                NodeUpsert::new(&id, self.config.clamp_label(name), node_type, country)
                    .with_details(details_from([("source", Some(json!(source)))])),
            );
            batch.edge(
                EdgeUpsert::new(&company, &id, EdgeType::OwnedBy).with_details(details_from([
                    ("source", Some(json!(source))),
                    ("percentage", owner.percentage.map(|p| json!(p))),
                ])),
                written,
            );
        }

        let report = batch.finish();
        if report.is_complete() {
            info!(
                "Ingested {}: {} rows inserted, {} refreshed",
                report.company_id,
                report.total_inserted(),
                report.nodes_updated + report.edges_updated
            );
        } else {
            warn!(
                "Ingested {} with {} failed writes",
                report.company_id,
                report.failures.len()
            );
        }
        Ok(report)
    }

    /// Attach a debt to an already-ingested company
    pub fn ingest_debt<S>(&self, store: &mut S, record: &DebtRecord) -> Result<IngestReport, IngestError>
    where
        S: GraphStore,
        S::Error: Display,
    {
        let company = self.existing_company(store, &record.registry_id, &record.country)?;
        let country = record.country.trim();
        let source = self.source_of(record.source.as_deref());

        let id = debt_id(country, record.registry_id.trim());
        let label = format!("Debt: {} {}", record.total_debt, record.currency);

        let mut batch = Batch::new(store, &company);
        let written = batch.node(
            NodeUpsert::new(&id, self.config.clamp_label(&label), NodeType::Debt, country).with_details(
                details_from([
                    ("total_debt", Some(json!(record.total_debt))),
                    ("currency", Some(json!(record.currency))),
                    ("risk_score", record.risk_score.map(|s| json!(s))),
                    ("source", Some(json!(source))),
                ]),
            ),
        );
        batch.edge(
            EdgeUpsert::new(&company, &id, EdgeType::HasDebt)
                .with_details(details_from([("source", Some(json!(source)))])),
            written,
        );

        Ok(batch.finish())
    }

    /// Record a former name of an already-ingested company
    pub fn ingest_historical_name<S>(
        &self,
        store: &mut S,
        record: &HistoricalNameRecord,
    ) -> Result<IngestReport, IngestError>
    where
        S: GraphStore,
        S::Error: Display,
    {
        let name = record.name.trim();
        if name.is_empty() {
            return Err(IngestError::InvalidRecord("historical name is empty".to_string()));
        }

        let company = self.existing_company(store, &record.registry_id, &record.country)?;
        let country = record.country.trim();
        let source = self.source_of(record.source.as_deref());

        let id = history_id(country, record.registry_id.trim(), name);

        let mut batch = Batch::new(store, &company);
        let written = batch.node(
            NodeUpsert::new(&id, self.config.clamp_label(name), NodeType::Company, country)
                .with_details(details_from([
                    ("since", record.since.as_deref().map(|v| json!(v))),
                    ("until", record.until.as_deref().map(|v| json!(v))),
                    ("source", Some(json!(source))),
                ])),
        );
        batch.edge(
            EdgeUpsert::new(&company, &id, EdgeType::HistoricalName).with_details(details_from([
                ("since", record.since.as_deref().map(|v| json!(v))),
                ("until", record.until.as_deref().map(|v| json!(v))),
                ("source", Some(json!(source))),
            ])),
            written,
        );

        Ok(batch.finish())
    }

    fn source_of<'a>(&'a self, source: Option<&'a str>) -> &'a str {
        source
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.config.default_source)
    }

    fn existing_company<S>(&self, store: &S, registry_id: &str, country: &str) -> Result<String, IngestError>
    where
        S: GraphStore,
        S::Error: Display,
    {
        let registry_id = registry_id.trim();
        let country = country.trim();
        if registry_id.is_empty() || country.is_empty() {
            return Err(IngestError::InvalidRecord(
                "registry_id and country are required".to_string(),
            ));
        }

        let id = company_id(country, registry_id);
        match store.get_node(&id) {
            Ok(Some(_)) => Ok(id),
            Ok(None) => Err(IngestError::UnknownCompany(id)),
            Err(e) => Err(IngestError::Store(format!("{}: {}", id, e))),
        }
    }
}

/// Structured entries when any are given, otherwise bare names
fn people(structured: &[PersonEntry], names: &[String]) -> Vec<PersonEntry> {
    if structured.is_empty() {
        names.iter().map(PersonEntry::named).collect()
    } else {
        structured.to_vec()
    }
}

/// Upserts issued for one record, with their outcomes
struct Batch<'s, S> {
    store: &'s mut S,
    report: IngestReport,
}

impl<'s, S> Batch<'s, S>
where
    S: GraphStore,
    S::Error: Display,
{
    fn new(store: &'s mut S, company_id: &str) -> Self {
        Self {
            store,
            report: IngestReport::new(company_id),
        }
    }

    fn anchor(&mut self, node: NodeUpsert) -> Result<(), IngestError> {
        let id = node.id.clone();
        match self.store.upsert_node(node) {
            Ok(outcome) => {
                self.count_node(outcome);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to write company node {}: {}", id, e);
                Err(IngestError::Store(format!("{}: {}", id, e)))
            }
        }
    }

    fn node(&mut self, node: NodeUpsert) -> bool {
        let id = node.id.clone();
        match self.store.upsert_node(node) {
            Ok(outcome) => {
                self.count_node(outcome);
                true
            }
            Err(e) => {
                warn!("Failed to write node {}: {}", id, e);
                self.fail(id, e.to_string());
                false
            }
        }
    }

    fn edge(&mut self, edge: EdgeUpsert, target_written: bool) {
        let entity_id = format!("{} -[{}]-> {}", edge.source, edge.edge_type, edge.target);
        if !target_written {
            debug!("Skipping edge {}: target node was not written", entity_id);
            self.fail(entity_id, "target node was not written".to_string());
            return;
        }

        match self.store.upsert_edge(edge) {
            Ok(UpsertOutcome::Inserted) => self.report.edges_inserted += 1,
            Ok(UpsertOutcome::Updated) => self.report.edges_updated += 1,
            Err(e) => {
                warn!("Failed to write edge {}: {}", entity_id, e);
                self.fail(entity_id, e.to_string());
            }
        }
    }

    fn count_node(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.report.nodes_inserted += 1,
            UpsertOutcome::Updated => self.report.nodes_updated += 1,
        }
    }

    fn fail(&mut self, entity_id: String, reason: String) {
        self.report.failures.push(IngestFailure { entity_id, reason });
    }

    fn finish(self) -> IngestReport {
        self.report
    }
}
