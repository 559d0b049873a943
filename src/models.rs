//! Data models for the Quote Engine.
//!
//! The `models` module defines the serialisable records that flow into
//! and out of the pricing engine: the customer profile, the line items
//! a salesperson toggles on and off, and the totals record that gets
//! stored alongside a quote.  Field names serialise in camelCase so
//! that a persisted totals record reads the same as the one the
//! downstream PSA integration expects (`monthlyTotal`, `contractTotal`).

use crate::error::QuoteError;
use crate::rates::LaborRates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the managed-services contract is structured.  Co-managed
/// contracts share support with an in-house IT team, which halves the
/// per-user factor used by the legacy support-labor formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContractType {
    #[serde(alias = "Managed Services")]
    Managed,
    #[serde(alias = "Co-Managed Services")]
    CoManaged,
}

/// The customer profile a quote is built for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub company_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub region: String,
    /// Contract length in months.  Must be positive; checked by
    /// [`QuoteRequest::validate`], not by the engine.
    pub contract_months: u32,
    pub contract_type: ContractType,
    /// Users with a full seat (workstation, mailbox, support).
    pub full_users: u32,
    /// Users who only need a mailbox.
    #[serde(default)]
    pub email_only_users: u32,
    pub workstations: u32,
    pub servers: u32,
    #[serde(default)]
    pub printers: u32,
    #[serde(default)]
    pub phone_extensions: u32,
}

/// Labor seniority band.  Serialised as the integers `1`, `2` and `3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SkillLevel {
    Level1,
    Level2,
    Level3,
}

impl TryFrom<u8> for SkillLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SkillLevel::Level1),
            2 => Ok(SkillLevel::Level2),
            3 => Ok(SkillLevel::Level3),
            other => Err(format!("skill level must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<SkillLevel> for u8 {
    fn from(level: SkillLevel) -> Self {
        match level {
            SkillLevel::Level1 => 1,
            SkillLevel::Level2 => 2,
            SkillLevel::Level3 => 3,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Where setup work is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationFactor {
    Onsite,
    #[default]
    Remote,
}

/// When setup work is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeFactor {
    #[default]
    Business,
    AfterHours,
}

/// Legacy per-category support hours.  The hours are per customer
/// factor unit (see [`crate::legacy::support_labor`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub onsite_business_hours: f64,
    #[serde(default)]
    pub remote_business_hours: f64,
    #[serde(default)]
    pub onsite_after_hours: f64,
    #[serde(default)]
    pub remote_after_hours: f64,
    pub skill_level: SkillLevel,
    pub is_active: bool,
}

/// A one-time onboarding or configuration item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupService {
    /// Identifier used to look up the hours formula.  See
    /// [`crate::setup::SetupServiceKind`] for the known identifiers.
    pub id: String,
    pub name: String,
    pub is_active: bool,
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub location_factor: LocationFactor,
    #[serde(default)]
    pub time_factor: TimeFactor,
    /// Explicit hours; when present they replace the formula.
    #[serde(default)]
    pub hours: Option<f64>,
    /// Display-only internal cost.
    #[serde(default)]
    pub cost: Option<f64>,
    /// Flat price used when no hours/skill pricing applies.
    #[serde(default)]
    pub price: Option<f64>,
}

/// N-central licensing configuration captured by the monthly-services
/// step.  The engine carries it through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NCentralConfig {
    pub licensing_structure: String,
    pub workstation_count: u32,
    pub server_count: u32,
    pub pricing_mode: String,
}

/// A monthly tool billed at a fixed price regardless of seat count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCostTool {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    #[serde(default)]
    pub monthly_cost: f64,
    pub extended_price: f64,
}

/// A monthly tool billed per unit (user, device, mailbox, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCostTool {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
    /// Precomputed by the tool's configuration step.
    pub extended_price: f64,
}

/// Everything selected on the monthly-services step of the quote.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyServicesData {
    pub ncentral: NCentralConfig,
    pub fixed_cost_tools: Vec<FixedCostTool>,
    pub variable_cost_tools: Vec<VariableCostTool>,
}

/// The priced result of a quote.
///
/// `monthly_total = support_labor + tools_software + haas + warranty`
/// and `contract_total = monthly_total * contract_months + setup_costs`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    pub tools_software: f64,
    pub support_labor: f64,
    pub setup_costs: f64,
    pub haas: f64,
    pub warranty: f64,
    pub monthly_total: f64,
    pub contract_total: f64,
}

/// Output of [`crate::engine::calculate_quote`]: the inputs echoed back
/// together with the computed totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteCalculation {
    pub customer: CustomerInfo,
    pub service_categories: Vec<ServiceCategory>,
    pub setup_services: Vec<SetupService>,
    pub monthly_services: Option<MonthlyServicesData>,
    pub labor_rates: LaborRates,
    pub totals: QuoteTotals,
}

/// Request envelope accepted by the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Tenant whose rate table should price this quote.
    #[serde(default)]
    pub tenant: Option<String>,
    pub customer: CustomerInfo,
    #[serde(default)]
    pub service_categories: Vec<ServiceCategory>,
    #[serde(default)]
    pub setup_services: Vec<SetupService>,
    #[serde(default)]
    pub monthly_services: Option<MonthlyServicesData>,
    /// Explicit rates take precedence over the tenant's table.
    #[serde(default)]
    pub labor_rates: Option<LaborRates>,
}

impl QuoteRequest {
    /// Checks the request before it reaches the engine.  The engine
    /// assumes a positive contract length and finite, non-negative
    /// amounts; anything else is rejected here.
    pub fn validate(&self) -> Result<(), QuoteError> {
        if self.customer.contract_months == 0 {
            return Err(QuoteError::InvalidContractMonths);
        }
        for category in &self.service_categories {
            check_amount(&category.id, "onsiteBusinessHours", category.onsite_business_hours)?;
            check_amount(&category.id, "remoteBusinessHours", category.remote_business_hours)?;
            check_amount(&category.id, "onsiteAfterHours", category.onsite_after_hours)?;
            check_amount(&category.id, "remoteAfterHours", category.remote_after_hours)?;
        }
        for service in &self.setup_services {
            for (field, value) in [
                ("hours", service.hours),
                ("cost", service.cost),
                ("price", service.price),
            ] {
                if let Some(value) = value {
                    check_amount(&service.id, field, value)?;
                }
            }
        }
        if let Some(monthly) = &self.monthly_services {
            for tool in &monthly.fixed_cost_tools {
                check_amount(&tool.id, "extendedPrice", tool.extended_price)?;
            }
            for tool in &monthly.variable_cost_tools {
                check_amount(&tool.id, "extendedPrice", tool.extended_price)?;
            }
        }
        if let Some(rates) = &self.labor_rates {
            rates.validate()?;
        }
        Ok(())
    }
}

pub(crate) fn check_amount(item: &str, field: &'static str, value: f64) -> Result<(), QuoteError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(QuoteError::InvalidAmount {
            item: item.to_string(),
            field,
            value,
        })
    }
}
