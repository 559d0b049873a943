//! Quote computation engine.
//!
//! The `engine` module turns a customer profile and the selected line
//! items into a [`QuoteCalculation`].  Everything here is a pure
//! function of its arguments.  [`calculate_quotes`] uses [`rayon`] to
//! price independent quotes across CPU cores.

use crate::error::QuoteError;
use crate::models::{
    CustomerInfo, MonthlyServicesData, QuoteCalculation, QuoteRequest, QuoteTotals,
    ServiceCategory, SetupService,
};
use crate::rates::{LaborRates, RateBook};
use crate::setup::calculate_setup_costs;
use rayon::prelude::*;

/// Rounds a currency amount to cents, halves rounding up.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Sum of extended prices over active fixed- and variable-cost tools.
pub fn calculate_monthly_services_total(monthly: &MonthlyServicesData) -> f64 {
    let fixed: f64 = monthly
        .fixed_cost_tools
        .iter()
        .filter(|tool| tool.is_active)
        .map(|tool| tool.extended_price)
        .sum();
    let variable: f64 = monthly
        .variable_cost_tools
        .iter()
        .filter(|tool| tool.is_active)
        .map(|tool| tool.extended_price)
        .sum();
    round_currency(fixed + variable)
}

/// Prices a quote.
///
/// Setup costs and monthly tooling are rounded to cents.  Support
/// labor, HaaS and warranty are fixed at zero; their formulas live in
/// [`crate::legacy`].  `service_categories` is carried through to the
/// result but does not affect the totals.
pub fn calculate_quote(
    customer: CustomerInfo,
    service_categories: Vec<ServiceCategory>,
    setup_services: Vec<SetupService>,
    monthly_services: Option<MonthlyServicesData>,
    labor_rates: LaborRates,
) -> QuoteCalculation {
    let setup_costs = round_currency(calculate_setup_costs(&setup_services, &labor_rates, &customer));
    let tools_software = monthly_services
        .as_ref()
        .map(calculate_monthly_services_total)
        .unwrap_or(0.0);

    let support_labor = 0.0;
    let haas = 0.0;
    let warranty = 0.0;
    let monthly_total = support_labor + tools_software + haas + warranty;
    let contract_total = monthly_total * f64::from(customer.contract_months) + setup_costs;

    tracing::debug!(
        company = %customer.company_name,
        setup_costs,
        monthly_total,
        contract_total,
        "Calculated quote"
    );

    QuoteCalculation {
        customer,
        service_categories,
        setup_services,
        monthly_services,
        labor_rates,
        totals: QuoteTotals {
            tools_software,
            support_labor,
            setup_costs,
            haas,
            warranty,
            monthly_total,
            contract_total,
        },
    }
}

/// Prices a request with the labor rates it resolves to: its own
/// `laborRates` if given, otherwise its tenant's table.
pub fn price_request(request: QuoteRequest, rates: &RateBook) -> QuoteCalculation {
    let labor_rates = request
        .labor_rates
        .unwrap_or_else(|| rates.resolve(request.tenant.as_deref()).labor);
    calculate_quote(
        request.customer,
        request.service_categories,
        request.setup_services,
        request.monthly_services,
        labor_rates,
    )
}

/// Validates and prices a batch of independent quotes in parallel.
/// Results come back in input order.  Any invalid request rejects the
/// whole batch.
pub fn calculate_quotes(
    requests: Vec<QuoteRequest>,
    rates: &RateBook,
) -> Result<Vec<QuoteCalculation>, QuoteError> {
    if requests.is_empty() {
        return Err(QuoteError::EmptyBatch);
    }
    requests.iter().try_for_each(QuoteRequest::validate)?;
    Ok(requests
        .into_par_iter()
        .map(|request| price_request(request, rates))
        .collect())
}
