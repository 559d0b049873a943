//! Legacy monthly calculators.
//!
//! These formulas priced support labor, licensing and hardware before
//! monthly tooling moved to per-tool extended prices.  They remain
//! callable on their own but [`crate::engine::calculate_quote`] does
//! not include them in a quote's totals.

use crate::engine::round_currency;
use crate::models::{ContractType, CustomerInfo, ServiceCategory};
use crate::rates::{HardwareRates, LaborRates, RateTable, ToolRates};
use serde::{Deserialize, Serialize};

/// Scales per-category hours by the size of the customer.  Co-managed
/// customers carry half the support load.
pub fn customer_factor(customer: &CustomerInfo) -> f64 {
    let users = f64::from(customer.full_users);
    match customer.contract_type {
        ContractType::Managed => users,
        ContractType::CoManaged => users * 0.5,
    }
}

/// Monthly support labor across active service categories.
pub fn support_labor(
    categories: &[ServiceCategory],
    customer: &CustomerInfo,
    rates: &LaborRates,
) -> f64 {
    let factor = customer_factor(customer);
    let total: f64 = categories
        .iter()
        .filter(|category| category.is_active)
        .map(|category| {
            let rate = rates.for_level(category.skill_level);
            let business_hours = category.onsite_business_hours + category.remote_business_hours;
            let after_hours = category.onsite_after_hours + category.remote_after_hours;
            business_hours * factor * rate.business_hours_price
                + after_hours * factor * rate.after_hours_price
        })
        .sum();
    round_currency(total)
}

/// Flat-rate tools and licensing, priced per full user, workstation
/// and server.
pub fn tools_licensing(customer: &CustomerInfo, rates: &ToolRates) -> f64 {
    let users = f64::from(customer.full_users);
    let workstations = f64::from(customer.workstations);
    let servers = f64::from(customer.servers);
    let total = rates.ncentral_per_workstation * workstations
        + rates.remote_control_per_user * users
        + rates.quickpass_per_user * users
        + rates.antivirus_per_workstation * workstations
        + rates.backup_per_server * servers;
    round_currency(total)
}

fn per_device(customer: &CustomerInfo, rates: &HardwareRates) -> f64 {
    round_currency(
        rates.per_workstation * f64::from(customer.workstations)
            + rates.per_server * f64::from(customer.servers),
    )
}

/// Hardware-as-a-service monthly charge.
pub fn haas(customer: &CustomerInfo, rates: &HardwareRates) -> f64 {
    per_device(customer, rates)
}

/// Extended warranty monthly charge.
pub fn warranty(customer: &CustomerInfo, rates: &HardwareRates) -> f64 {
    per_device(customer, rates)
}

/// All four legacy figures side by side, for comparing against the
/// current totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyBreakdown {
    pub support_labor: f64,
    pub tools_licensing: f64,
    pub haas: f64,
    pub warranty: f64,
    pub monthly_total: f64,
}

pub fn legacy_breakdown(
    categories: &[ServiceCategory],
    customer: &CustomerInfo,
    labor: &LaborRates,
    table: &RateTable,
) -> LegacyBreakdown {
    let support_labor = support_labor(categories, customer, labor);
    let tools_licensing = tools_licensing(customer, &table.tools);
    let haas = haas(customer, &table.haas);
    let warranty = warranty(customer, &table.warranty);
    LegacyBreakdown {
        support_labor,
        tools_licensing,
        haas,
        warranty,
        monthly_total: round_currency(support_labor + tools_licensing + haas + warranty),
    }
}
