//! Enhanced risk scoring

use crate::detector::RiskFindings;
use crate::RiskConfig;
use regnet_domain::{NodeType, ViewNode};

/// Combine a node's base score with the bonuses earned from detector findings
///
/// Bonuses saturate instead of overflowing on out-of-range upstream scores.
/// The result is clamped to `0..=max_score`. Debt nodes are floored at
/// `debt_floor` before clamping.
pub fn calculate_enhanced_risk_score(node: &ViewNode, findings: &RiskFindings, config: &RiskConfig) -> i32 {
    let mut score = node.risk_score;

    match node.node_type {
        Some(NodeType::Person) => {
            if let Some(count) = findings.white_horse_count(&node.id) {
                if count >= config.white_horse_major_companies {
                    score = score.saturating_add(config.white_horse_major_bonus);
                } else if count >= config.white_horse_min_companies {
                    score = score.saturating_add(config.white_horse_bonus);
                }
            }
        }
        Some(NodeType::Company) => {
            if findings.in_cycle(&node.id) {
                score = score.saturating_add(config.cycle_bonus);
            }
        }
        Some(NodeType::Address) => {
            if let Some(count) = findings.virtual_seat_count(&node.id) {
                if count >= config.virtual_seat_major_companies {
                    score = score.saturating_add(config.virtual_seat_major_bonus);
                } else if count >= config.virtual_seat_bonus_companies {
                    score = score.saturating_add(config.virtual_seat_bonus);
                }
            }
        }
        Some(NodeType::Debt) => score = score.max(config.debt_floor),
        Some(NodeType::CompanyRef) | None => {}
    }

    score.clamp(0, config.max_score.max(0))
}
