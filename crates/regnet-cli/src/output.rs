//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use regnet_domain::GraphView;
use regnet_ingest::IngestReport;
use regnet_risk::{RiskReport, RiskSummary};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// A network as printed by the `graph` command.
#[derive(Debug, Serialize)]
pub struct GraphOutput<'a> {
    /// The expanded network
    #[serde(flatten)]
    pub graph: &'a GraphView,

    /// Risk summary, present when the network was rescored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskSummary>,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the outcome of an ingestion.
    pub fn format_ingest_report(&self, report: &IngestReport) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(report)?);
        }

        let mut builder = Builder::default();
        builder.push_record(["Company", "Nodes new", "Nodes updated", "Edges new", "Edges updated"]);
        builder.push_record([
            report.company_id.clone(),
            report.nodes_inserted.to_string(),
            report.nodes_updated.to_string(),
            report.edges_inserted.to_string(),
            report.edges_updated.to_string(),
        ]);
        let mut out = self.table(builder);

        if report.failures.is_empty() {
            out.push('\n');
            out.push_str(&self.success("All writes succeeded"));
        } else {
            let mut failures = Builder::default();
            failures.push_record(["Entity", "Reason"]);
            for failure in &report.failures {
                failures.push_record([failure.entity_id.as_str(), failure.reason.as_str()]);
            }
            out.push('\n');
            out.push_str(&self.warning(&format!("{} write(s) failed", report.failures.len())));
            out.push('\n');
            out.push_str(&self.table(failures));
        }
        Ok(out)
    }

    /// Format an expanded network.
    pub fn format_graph(&self, graph: &GraphView, risk: Option<RiskSummary>) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(&GraphOutput { graph, risk })?);
        }

        if graph.is_empty() {
            return Ok(self.warning("No such company in the graph."));
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Type", "Label", "Country", "Risk"]);
        for node in &graph.nodes {
            builder.push_record([
                node.id.clone(),
                node.node_type.map(|t| t.to_string()).unwrap_or_default(),
                node.label.clone(),
                node.country.clone(),
                node.risk_score.to_string(),
            ]);
        }
        let mut out = self.table(builder);

        out.push('\n');
        out.push_str(&self.info(&format!(
            "{} nodes, {} edges, {} related companies",
            graph.nodes.len(),
            graph.edges.len(),
            graph.summary.same_person_or_owner_companies.unwrap_or(0)
        )));
        if let Some(summary) = risk {
            out.push('\n');
            out.push_str(&self.risk_line(&summary));
        }
        Ok(out)
    }

    /// Format a risk report.
    pub fn format_risk_report(&self, report: &RiskReport) -> Result<String> {
        if let OutputFormat::Json = self.format {
            return Ok(serde_json::to_string_pretty(report)?);
        }

        let mut builder = Builder::default();
        builder.push_record(["Pattern", "Node(s)", "Companies"]);
        for horse in &report.white_horses {
            builder.push_record([
                "White horse".to_string(),
                horse.person_id.clone(),
                horse.company_count.to_string(),
            ]);
        }
        for cycle in &report.circular_structures {
            builder.push_record([
                "Carousel".to_string(),
                cycle.join(" → "),
                cycle.len().to_string(),
            ]);
        }
        for seat in &report.virtual_seats {
            builder.push_record([
                "Virtual seat".to_string(),
                seat.address_id.clone(),
                seat.company_count.to_string(),
            ]);
        }

        let mut out = self.table(builder);
        out.push('\n');
        out.push_str(&self.risk_line(&report.summary));
        Ok(out)
    }

    fn risk_line(&self, summary: &RiskSummary) -> String {
        let line = format!(
            "{} white horse(s), {} carousel(s), {} virtual seat(s), {} high-risk compan(ies)",
            summary.white_horse_count,
            summary.circular_structure_count,
            summary.virtual_seat_count,
            summary.high_risk_companies
        );
        if summary.high_risk_companies > 0 {
            self.error(&line)
        } else {
            self.info(&line)
        }
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
