//! Risk analysis configuration

use serde::{Deserialize, Serialize};

/// Thresholds and score bonuses for the fraud-pattern detectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// A person managing at least this many companies is a white horse
    pub white_horse_min_companies: usize,

    /// Bonus for a white horse
    pub white_horse_bonus: i32,

    /// A person managing at least this many companies gets the major bonus instead
    pub white_horse_major_companies: usize,

    /// Bonus for a white horse above the major threshold
    pub white_horse_major_bonus: i32,

    /// Shortest ownership cycle reported as a carousel
    pub cycle_min_length: usize,

    /// Bonus for a company taking part in any carousel
    pub cycle_bonus: i32,

    /// An address hosting at least this many companies is a virtual seat
    pub virtual_seat_min_companies: usize,

    /// A virtual seat hosting at least this many companies gets a bonus
    pub virtual_seat_bonus_companies: usize,

    /// Bonus for a crowded virtual seat
    pub virtual_seat_bonus: i32,

    /// A virtual seat hosting at least this many companies gets the major bonus instead
    pub virtual_seat_major_companies: usize,

    /// Bonus for a virtual seat above the major threshold
    pub virtual_seat_major_bonus: i32,

    /// Debt nodes never score below this
    pub debt_floor: i32,

    /// Upper bound of every score
    pub max_score: i32,

    /// Companies at or above this score count as high risk in the report summary
    pub high_risk_threshold: i32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            white_horse_min_companies: 5,
            white_horse_bonus: 3,
            white_horse_major_companies: 10,
            white_horse_major_bonus: 5,
            cycle_min_length: 3,
            cycle_bonus: 4,
            virtual_seat_min_companies: 3,
            virtual_seat_bonus_companies: 10,
            virtual_seat_bonus: 2,
            virtual_seat_major_companies: 20,
            virtual_seat_major_bonus: 4,
            debt_floor: 8,
            max_score: 10,
            high_risk_threshold: 7,
        }
    }
}

impl RiskConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.white_horse_min_companies == 0 || self.virtual_seat_min_companies == 0 {
            return Err("detector thresholds must be greater than 0".to_string());
        }
        if self.white_horse_major_companies < self.white_horse_min_companies {
            return Err("white_horse_major_companies is below white_horse_min_companies".to_string());
        }
        if self.virtual_seat_major_companies < self.virtual_seat_bonus_companies {
            return Err("virtual_seat_major_companies is below virtual_seat_bonus_companies".to_string());
        }
        if self.cycle_min_length < 2 {
            return Err("cycle_min_length must be at least 2".to_string());
        }
        if self.max_score < 0 {
            return Err("max_score cannot be negative".to_string());
        }
        Ok(())
    }
}
