//! Investment ledger
//!
//! Holds the user's recurring health investments and totals the money and
//! time committed to the active ones.

use crate::error::RoiError;
use crate::types::{Investment, NewInvestment};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Ledger of health investments for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentLedger {
    investments: Vec<Investment>,
    /// Next id to hand out; never reused within a session
    next_id: u64,
}

impl Default for InvestmentLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InvestmentLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            investments: Vec::new(),
            next_id: 1,
        }
    }

    /// Ledger pre-filled with the default starter investments
    pub fn with_starter_set() -> Self {
        let mut ledger = Self::new();
        let starters = [
            NewInvestment::new("Gym Membership", 50.0, 4.0, "Exercise"),
            NewInvestment::new("Therapy", 120.0, 1.0, "Mental Health"),
            NewInvestment::new("Meal Prep Service", 80.0, 0.0, "Nutrition"),
        ];
        for starter in starters {
            let id = ledger.next_id;
            ledger.investments.push(starter.into_investment(id));
            ledger.next_id += 1;
        }
        ledger
    }

    /// Build a ledger from existing records, validating each one
    pub fn from_investments(investments: Vec<Investment>) -> Result<Self, RoiError> {
        let mut seen = HashSet::new();
        for investment in &investments {
            validate_fields(
                &investment.name,
                investment.monthly_cost,
                investment.weekly_time_hours,
            )?;
            if !seen.insert(investment.id) {
                return Err(RoiError::InvalidInvestment(format!(
                    "duplicate id {}",
                    investment.id
                )));
            }
        }

        let next_id = investments.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        Ok(Self {
            investments,
            next_id,
        })
    }

    /// Parse a JSON array of investments
    pub fn from_json(json: &str) -> Result<Self, RoiError> {
        let investments: Vec<Investment> = serde_json::from_str(json)?;
        Self::from_investments(investments)
    }

    /// Add an investment, returning its freshly allocated id
    pub fn add(&mut self, record: NewInvestment) -> Result<u64, RoiError> {
        if let Err(e) = validate_fields(&record.name, record.monthly_cost, record.weekly_time_hours)
        {
            warn!(name = %record.name, error = %e, "rejected investment");
            return Err(e);
        }

        let id = self.next_id;
        self.next_id += 1;
        debug!(id, name = %record.name, "investment added");
        self.investments.push(record.into_investment(id));
        Ok(id)
    }

    /// Remove an investment by id, returning the removed record
    pub fn remove(&mut self, id: u64) -> Result<Investment, RoiError> {
        let index = self
            .investments
            .iter()
            .position(|i| i.id == id)
            .ok_or(RoiError::InvestmentNotFound(id))?;

        let removed = self.investments.remove(index);
        debug!(id, name = %removed.name, "investment removed");
        Ok(removed)
    }

    pub fn get(&self, id: u64) -> Option<&Investment> {
        self.investments.iter().find(|i| i.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Investment> {
        self.investments.iter()
    }

    pub fn as_slice(&self) -> &[Investment] {
        &self.investments
    }

    pub fn len(&self) -> usize {
        self.investments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.investments.is_empty()
    }

    /// Monthly cost of active investments
    pub fn total_monthly_cost(&self) -> f64 {
        total_monthly_cost(&self.investments)
    }

    /// Weekly hours of active investments
    pub fn total_weekly_time(&self) -> f64 {
        total_weekly_time(&self.investments)
    }
}

/// Sum of `monthly_cost` over active investments
pub fn total_monthly_cost(investments: &[Investment]) -> f64 {
    investments
        .iter()
        .filter(|i| i.active)
        .map(|i| i.monthly_cost)
        .sum()
}

/// Sum of `weekly_time_hours` over active investments
pub fn total_weekly_time(investments: &[Investment]) -> f64 {
    investments
        .iter()
        .filter(|i| i.active)
        .map(|i| i.weekly_time_hours)
        .sum()
}

fn validate_fields(name: &str, monthly_cost: f64, weekly_time_hours: f64) -> Result<(), RoiError> {
    if name.trim().is_empty() {
        return Err(RoiError::InvalidInvestment("name is empty".to_string()));
    }
    if !monthly_cost.is_finite() || monthly_cost < 0.0 {
        return Err(RoiError::InvalidInvestment(format!(
            "monthly cost must be a non-negative number, got {monthly_cost}"
        )));
    }
    if !weekly_time_hours.is_finite() || weekly_time_hours < 0.0 {
        return Err(RoiError::InvalidInvestment(format!(
            "weekly time must be a non-negative number, got {weekly_time_hours}"
        )));
    }
    Ok(())
}
