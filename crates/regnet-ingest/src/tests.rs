//! Integration tests for the Relationship Ingestor

#[cfg(test)]
mod tests {
    use crate::{
        Address, CompanyRecord, DebtRecord, HistoricalNameRecord, IngestConfig, IngestError,
        PersonEntry, RelationshipIngestor,
    };
    use regnet_domain::identity::{address_id, owner_id, person_id};
    use regnet_domain::traits::{GraphStore, UpsertOutcome};
    use regnet_domain::{Edge, EdgeType, EdgeUpsert, Node, NodeType, NodeUpsert};
    use regnet_store::SqliteGraphStore;
    use serde_json::json;
    use std::collections::HashSet;

    fn alfa_record() -> CompanyRecord {
        CompanyRecord {
            registry_id: "123".to_string(),
            country: "SK".to_string(),
            company_label: "Alfa s.r.o.".to_string(),
            address: Some(Address::raw("Hlavná 1, Bratislava")),
            executive_people: vec![PersonEntry::named("Ján Novák")
                .with_role("Konateľ")
                .with_birth_date("1970-01-01")],
            owners: vec!["Beta a.s.".to_string(), "Peter Malý".to_string()],
            source: Some("ORSR".to_string()),
            ..Default::default()
        }
    }

    fn ingestor() -> RelationshipIngestor {
        RelationshipIngestor::new(IngestConfig::default())
    }

    /// Store that refuses writes for selected node ids and edge types
    struct FlakyStore {
        inner: SqliteGraphStore,
        failing: HashSet<String>,
        failing_edges: HashSet<EdgeType>,
    }

    impl FlakyStore {
        fn failing(ids: &[&str]) -> Self {
            Self {
                inner: SqliteGraphStore::new(":memory:").unwrap(),
                failing: ids.iter().map(|s| s.to_string()).collect(),
                failing_edges: HashSet::new(),
            }
        }

        fn failing_edges(types: &[EdgeType]) -> Self {
            Self {
                failing_edges: types.iter().copied().collect(),
                ..Self::failing(&[])
            }
        }
    }

    impl GraphStore for FlakyStore {
        type Error = String;

        fn upsert_node(&mut self, node: NodeUpsert) -> Result<UpsertOutcome, Self::Error> {
            if self.failing.contains(&node.id) {
                return Err(format!("disk full while writing {}", node.id));
            }
            self.inner.upsert_node(node).map_err(|e| e.to_string())
        }

        fn upsert_edge(&mut self, edge: EdgeUpsert) -> Result<UpsertOutcome, Self::Error> {
            if self.failing_edges.contains(&edge.edge_type) {
                return Err(format!("constraint failed on {} edge", edge.edge_type));
            }
            self.inner.upsert_edge(edge).map_err(|e| e.to_string())
        }

        fn get_node(&self, id: &str) -> Result<Option<Node>, Self::Error> {
            self.inner.get_node(id).map_err(|e| e.to_string())
        }

        fn get_edges_from(&self, source_id: &str) -> Result<Vec<Edge>, Self::Error> {
            self.inner.get_edges_from(source_id).map_err(|e| e.to_string())
        }

        fn fetch_edges_from(&self, source_id: &str, types: &[EdgeType]) -> Result<Vec<Edge>, Self::Error> {
            self.inner.fetch_edges_from(source_id, types).map_err(|e| e.to_string())
        }

        fn fetch_edges_into(
            &self,
            target_ids: &[String],
            types: &[EdgeType],
            limit: usize,
        ) -> Result<Vec<Edge>, Self::Error> {
            self.inner
                .fetch_edges_into(target_ids, types, limit)
                .map_err(|e| e.to_string())
        }

        fn node_count(&self) -> Result<usize, Self::Error> {
            self.inner.node_count().map_err(|e| e.to_string())
        }

        fn edge_count(&self) -> Result<usize, Self::Error> {
            self.inner.edge_count().map_err(|e| e.to_string())
        }
    }

    #[test]
    fn test_full_ingestion_flow() {
        let mut store = SqliteGraphStore::new(":memory:").unwrap();

        let report = ingestor()
            .ingest_company_relationships(&mut store, &alfa_record())
            .unwrap();

        assert_eq!(report.company_id, "sk_123");
        assert!(report.is_complete(), "Unexpected failures: {:?}", report.failures);
        assert_eq!(report.nodes_inserted, 5);
        assert_eq!(report.edges_inserted, 4);
        assert_eq!(store.node_count().unwrap(), 5);
        assert_eq!(store.edge_count().unwrap(), 4);

        let company = store.get_node("sk_123").unwrap().unwrap();
        assert_eq!(company.label, "Alfa s.r.o.");
        assert_eq!(company.node_type, NodeType::Company);
        assert_eq!(company.details["registry_id"], json!("123"));
        assert_eq!(company.details["source"], json!("ORSR"));

        let addr = address_id("SK", "Hlavná 1, Bratislava");
        let seat = store.get_node(&addr).unwrap().unwrap();
        assert_eq!(seat.node_type, NodeType::Address);
        assert_eq!(seat.details["raw"], json!("Hlavná 1, Bratislava"));
        assert!(store.get_edge("sk_123", &addr, EdgeType::LocatedAt).unwrap().is_some());
    }

    #[test]
    fn test_reingestion_is_idempotent() {
        let mut store = SqliteGraphStore::new(":memory:").unwrap();
        let ingestor = ingestor();

        ingestor.ingest_company_relationships(&mut store, &alfa_record()).unwrap();
        let nodes = store.node_count().unwrap();
        let edges = store.edge_count().unwrap();

        let again = ingestor.ingest_company_relationships(&mut store, &alfa_record()).unwrap();

        assert_eq!(store.node_count().unwrap(), nodes);
        assert_eq!(store.edge_count().unwrap(), edges);
        assert_eq!(again.total_inserted(), 0);
        assert_eq!(again.nodes_updated, nodes);
        assert_eq!(again.edges_updated, edges);
    }

    #[test]
    fn test_structured_executives_preferred_over_names() {
        let mut store = SqliteGraphStore::new(":memory:").unwrap();
        let mut record = alfa_record();
        record.executives = vec!["Somebody Else".to_string()];

        ingestor().ingest_company_relationships(&mut store, &record).unwrap();

        let managers = store.fetch_edges_from("sk_123", &[EdgeType::ManagedBy]).unwrap();
        assert_eq!(managers.len(), 1);

        let novak = person_id("SK", "Ján Novák", "1970-01-01");
        assert_eq!(managers[0].target, novak);
        assert_eq!(managers[0].details["role"], json!("Konateľ"));

        let person = store.get_node(&novak).unwrap().unwrap();
        assert_eq!(person.details["role"], json!("Konateľ"));
        assert_eq!(person.details["birth_date"], json!("1970-01-01"));
        assert!(!person.details.contains_key("until"), "Absent fields are not written");
    }

    #[test]
    fn test_shareholders_are_classified() {
        let mut store = SqliteGraphStore::new(":memory:").unwrap();

        ingestor().ingest_company_relationships(&mut store, &alfa_record()).unwrap();

        let beta = store.get_node(&owner_id("SK", "Beta a.s.")).unwrap().unwrap();
        assert_eq!(beta.node_type, NodeType::CompanyRef);

        let maly = store.get_node(&person_id("SK", "Peter Malý", "")).unwrap().unwrap();
        assert_eq!(maly.node_type, NodeType::Person);

        let owners = store.fetch_edges_from("sk_123", &[EdgeType::OwnedBy]).unwrap();
        assert_eq!(owners.len(), 2);
    }

    #[test]
    fn test_shareholder_percentage_on_edge() {
        let mut store = SqliteGraphStore::new(":memory:").unwrap();
        let mut record = alfa_record();
        record.shareholder_people = vec![PersonEntry {
            percentage: Some(60.0),
            ..PersonEntry::named("Gamma GmbH")
        }];

        ingestor().ingest_company_relationships(&mut store, &record).unwrap();

        let owners = store.fetch_edges_from("sk_123", &[EdgeType::OwnedBy]).unwrap();
        assert_eq!(owners.len(), 1, "Structured shareholders replace plain names");
        assert_eq!(owners[0].target, owner_id("SK", "Gamma GmbH"));
        assert_eq!(owners[0].details["percentage"], json!(60.0));
    }

    #[test]
    fn test_failed_person_does_not_stop_siblings() {
        let novak = person_id("SK", "Ján Novák", "1970-01-01");
        let mut store = FlakyStore::failing(&[novak.as_str()]);

        let report = ingestor()
            .ingest_company_relationships(&mut store, &alfa_record())
            .unwrap();

        assert_eq!(report.failures.len(), 2, "Node failure plus skipped edge");
        assert_eq!(report.failures[0].entity_id, novak);
        assert!(report.failures[0].reason.contains("disk full"));
        assert!(report.failures[1].entity_id.contains("MANAGED_BY"));

        assert!(store.fetch_edges_from("sk_123", &[EdgeType::ManagedBy]).unwrap().is_empty());
        assert_eq!(store.fetch_edges_from("sk_123", &[EdgeType::OwnedBy]).unwrap().len(), 2);
        assert_eq!(report.nodes_inserted, 4);
    }

    #[test]
    fn test_failed_edge_does_not_stop_later_writes() {
        let mut store = FlakyStore::failing_edges(&[EdgeType::LocatedAt]);
        let addr = address_id("SK", "Hlavná 1, Bratislava");

        let report = ingestor()
            .ingest_company_relationships(&mut store, &alfa_record())
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].entity_id, format!("sk_123 -[LOCATED_AT]-> {}", addr));
        assert!(report.failures[0].reason.contains("constraint failed"));

        assert_eq!(report.nodes_inserted, 5);
        assert_eq!(report.edges_inserted, 3);
        assert!(store.get_node(&addr).unwrap().is_some());
        assert!(store.fetch_edges_from("sk_123", &[EdgeType::LocatedAt]).unwrap().is_empty());
        assert_eq!(store.fetch_edges_from("sk_123", &[EdgeType::ManagedBy]).unwrap().len(), 1);
        assert_eq!(store.fetch_edges_from("sk_123", &[EdgeType::OwnedBy]).unwrap().len(), 2);
    }

    #[test]
    fn test_failed_company_node_aborts() {
        let mut store = FlakyStore::failing(&["sk_123"]);

        let result = ingestor().ingest_company_relationships(&mut store, &alfa_record());

        assert!(matches!(result, Err(IngestError::Store(_))));
        assert_eq!(store.node_count().unwrap(), 0);
        assert_eq!(store.edge_count().unwrap(), 0);
    }

    #[test]
    fn test_blank_names_and_empty_address_skipped() {
        let mut store = SqliteGraphStore::new(":memory:").unwrap();
        let record = CompanyRecord {
            registry_id: "9".to_string(),
            country: "CZ".to_string(),
            address: Some(Address::default()),
            executives: vec!["".to_string(), "   ".to_string()],
            owners: vec!["".to_string()],
            ..Default::default()
        };

        let report = ingestor().ingest_company_relationships(&mut store, &record).unwrap();

        assert_eq!(report.nodes_inserted, 1);
        assert_eq!(report.edges_inserted, 0);

        let company = store.get_node("cz_9").unwrap().unwrap();
        assert_eq!(company.label, "cz_9", "Empty label falls back to the id");
        assert_eq!(company.details["source"], json!("V4"));
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let mut store = SqliteGraphStore::new(":memory:").unwrap();
        let ingestor = RelationshipIngestor::new(IngestConfig {
            max_label_len: 5,
            ..Default::default()
        });
        let record = CompanyRecord {
            registry_id: "1".to_string(),
            country: "PL".to_string(),
            company_label: "Przedsiębiorstwo".to_string(),
            ..Default::default()
        };

        ingestor.ingest_company_relationships(&mut store, &record).unwrap();

        assert_eq!(store.get_node("pl_1").unwrap().unwrap().label, "Przed");
    }

    #[test]
    fn test_missing_natural_key_rejected() {
        let mut store = SqliteGraphStore::new(":memory:").unwrap();
        let record = CompanyRecord {
            country: "SK".to_string(),
            ..Default::default()
        };

        let result = ingestor().ingest_company_relationships(&mut store, &record);

        assert!(matches!(result, Err(IngestError::InvalidRecord(_))));
        assert_eq!(store.node_count().unwrap(), 0);
    }

    #[test]
    fn test_debt_requires_known_company() {
        let mut store = SqliteGraphStore::new(":memory:").unwrap();
        let ingestor = ingestor();
        let debt = DebtRecord {
            registry_id: "123".to_string(),
            country: "SK".to_string(),
            total_debt: 1500.5,
            currency: "EUR".to_string(),
            risk_score: Some(6),
            source: Some("FS".to_string()),
        };

        let result = ingestor.ingest_debt(&mut store, &debt);
        assert!(matches!(result, Err(IngestError::UnknownCompany(ref id)) if id == "sk_123"));

        ingestor.ingest_company_relationships(&mut store, &alfa_record()).unwrap();
        let report = ingestor.ingest_debt(&mut store, &debt).unwrap();
        assert_eq!(report.nodes_inserted, 1);
        assert_eq!(report.edges_inserted, 1);

        let node = store.get_node("debt_sk_123").unwrap().unwrap();
        assert_eq!(node.node_type, NodeType::Debt);
        assert_eq!(node.label, "Debt: 1500.5 EUR");
        assert_eq!(node.details["risk_score"], json!(6));
        assert!(store.get_edge("sk_123", "debt_sk_123", EdgeType::HasDebt).unwrap().is_some());
    }

    #[test]
    fn test_historical_name() {
        let mut store = SqliteGraphStore::new(":memory:").unwrap();
        let ingestor = ingestor();
        ingestor.ingest_company_relationships(&mut store, &alfa_record()).unwrap();

        let record = HistoricalNameRecord {
            registry_id: "123".to_string(),
            country: "SK".to_string(),
            name: "Alfa Trade s.r.o.".to_string(),
            since: Some("2001-05-01".to_string()),
            until: Some("2015-12-31".to_string()),
            source: None,
        };
        let report = ingestor.ingest_historical_name(&mut store, &record).unwrap();
        assert!(report.is_complete());

        let edges = store.fetch_edges_from("sk_123", &[EdgeType::HistoricalName]).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].details["until"], json!("2015-12-31"));

        let former = store.get_node(&edges[0].target).unwrap().unwrap();
        assert_eq!(former.label, "Alfa Trade s.r.o.");
        assert_eq!(former.node_type, NodeType::Company);
        assert_eq!(former.details["source"], json!("V4"));
    }
}
