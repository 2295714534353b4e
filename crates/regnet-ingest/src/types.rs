//! Ingestion input records and the per-call report

use regnet_domain::Details;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A normalized company record as supplied by a registry provider
///
/// Field names follow the providers' JSON (`name`, `shareholders`), with
/// camelCase aliases accepted for the structured people lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Registry identifier (IČO, KRS, ...), unique within the country
    #[serde(default)]
    pub registry_id: String,

    /// Two-letter country code of the registry
    #[serde(default)]
    pub country: String,

    /// Company display name
    #[serde(default, alias = "name")]
    pub company_label: String,

    /// Registered seat
    #[serde(default)]
    pub address: Option<Address>,

    /// Executive names (used only when `executive_people` is empty)
    #[serde(default)]
    pub executives: Vec<String>,

    /// Owner names (used only when `shareholder_people` is empty)
    #[serde(default, alias = "shareholders")]
    pub owners: Vec<String>,

    /// Structured executive entries
    #[serde(default, alias = "executivePeople")]
    pub executive_people: Vec<PersonEntry>,

    /// Structured shareholder entries
    #[serde(default, alias = "shareholderPeople")]
    pub shareholder_people: Vec<PersonEntry>,

    /// Provider tag (e.g. "ORSR", "RPO"); the configured default is used when absent
    #[serde(default)]
    pub source: Option<String>,
}

/// A structured executive or shareholder entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonEntry {
    /// Full name
    #[serde(default)]
    pub name: String,

    /// Role in the company (e.g. "Konateľ")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Start of the role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,

    /// End of the role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,

    /// Birth date, part of a person's identity key when known
    #[serde(default, alias = "birthDate", skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    /// Residence address as reported by the registry (free-form)
    #[serde(default, alias = "residenceAddress", skip_serializing_if = "Option::is_none")]
    pub residence_address: Option<Value>,

    /// Ownership share in percent (shareholders only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl PersonEntry {
    /// Entry carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the birth date
    pub fn with_birth_date(mut self, birth_date: impl Into<String>) -> Self {
        self.birth_date = Some(birth_date.into());
        self
    }

    pub(crate) fn birth_date_or_empty(&self) -> &str {
        self.birth_date.as_deref().unwrap_or("")
    }
}

/// A registered address, either free text or split into parts
///
/// Deserializes from a bare JSON string (taken as `raw`) or from an object;
/// unknown object keys are kept in `extra` and copied into node details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "AddressRepr")]
pub struct Address {
    /// Full address line as printed by the registry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,

    /// Street and number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,

    /// City
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// Any further provider fields (region, district, ...)
    #[serde(flatten)]
    pub extra: Details,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AddressRepr {
    Text(String),
    Parts {
        #[serde(default)]
        raw: Option<String>,
        #[serde(default)]
        street: Option<String>,
        #[serde(default)]
        city: Option<String>,
        #[serde(default, alias = "postalCode", alias = "zip")]
        postal_code: Option<String>,
        #[serde(flatten)]
        extra: Details,
    },
}

impl From<AddressRepr> for Address {
    fn from(repr: AddressRepr) -> Self {
        match repr {
            AddressRepr::Text(raw) => Address::raw(raw),
            AddressRepr::Parts {
                raw,
                street,
                city,
                postal_code,
                extra,
            } => Address {
                raw,
                street,
                city,
                postal_code,
                extra,
            },
        }
    }
}

impl Address {
    /// Address given as a single line
    pub fn raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Default::default()
        }
    }

    /// Display label: `raw` when present, otherwise `street city postal_code`
    pub fn label(&self) -> String {
        if let Some(raw) = self.raw.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            return raw.to_string();
        }

        [&self.street, &self.city, &self.postal_code]
            .iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// All known fields as a details map
    pub fn to_details(&self) -> Details {
        let mut details = self.extra.clone();
        for (key, value) in [
            ("raw", &self.raw),
            ("street", &self.street),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
        ] {
            if let Some(value) = value {
                details.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        details
    }
}

/// A debt recorded against an already-ingested company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtRecord {
    /// Registry identifier of the indebted company
    pub registry_id: String,

    /// Country code
    pub country: String,

    /// Outstanding amount
    pub total_debt: f64,

    /// Currency code (EUR, CZK, PLN, HUF)
    pub currency: String,

    /// Risk score assigned by the debt register, if any
    #[serde(default)]
    pub risk_score: Option<i32>,

    /// Provider tag
    #[serde(default)]
    pub source: Option<String>,
}

/// A former registered name of an already-ingested company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalNameRecord {
    /// Registry identifier of the company
    pub registry_id: String,

    /// Country code
    pub country: String,

    /// The former name
    pub name: String,

    /// When the name came into use
    #[serde(default)]
    pub since: Option<String>,

    /// When the name was replaced
    #[serde(default)]
    pub until: Option<String>,

    /// Provider tag
    #[serde(default)]
    pub source: Option<String>,
}

/// Outcome of one ingestion call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    /// Id of the company node the record was written under
    pub company_id: String,

    /// Nodes created by this call
    pub nodes_inserted: usize,

    /// Existing nodes whose details were refreshed
    pub nodes_updated: usize,

    /// Edges created by this call
    pub edges_inserted: usize,

    /// Existing edges whose details were refreshed
    pub edges_updated: usize,

    /// Writes that failed or were skipped
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    pub(crate) fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            ..Default::default()
        }
    }

    /// Whether every write succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of rows created by this call
    pub fn total_inserted(&self) -> usize {
        self.nodes_inserted + self.edges_inserted
    }
}

/// A single write that did not make it into the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestFailure {
    /// Node id, or `source -[TYPE]-> target` for edges
    pub entity_id: String,

    /// Why the write failed or was skipped
    pub reason: String,
}
