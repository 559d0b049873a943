//! One-time setup pricing.
//!
//! Each setup service identifier maps to a fixed hours formula.  The
//! set of identifiers is closed: [`SetupServiceKind`] lists every
//! service the engine knows how to estimate, and an identifier outside
//! that set simply contributes no hours.

use crate::models::{CustomerInfo, SetupService};
use crate::rates::LaborRates;
use serde::Serialize;

/// Hours required for a setup service: a flat base plus an optional
/// per-workstation component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursFormula {
    pub base_hours: f64,
    pub hours_per_workstation: f64,
}

impl HoursFormula {
    const fn flat(base_hours: f64) -> Self {
        Self {
            base_hours,
            hours_per_workstation: 0.0,
        }
    }

    const fn scaled(base_hours: f64, hours_per_workstation: f64) -> Self {
        Self {
            base_hours,
            hours_per_workstation,
        }
    }

    pub fn hours(&self, customer: &CustomerInfo) -> f64 {
        self.base_hours + self.hours_per_workstation * f64::from(customer.workstations)
    }
}

/// Every setup service with a known hours formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupServiceKind {
    NetworkAssessment,
    SecurityBaseline,
    M365TenantSetup,
    ServerMigration,
    StandardOnboarding,
    IntuneOnboarding,
    Documentation,
    BackupConfiguration,
    FirewallConfiguration,
    EmailMigration,
    DomainMigration,
}

impl SetupServiceKind {
    pub const ALL: [SetupServiceKind; 11] = [
        SetupServiceKind::NetworkAssessment,
        SetupServiceKind::SecurityBaseline,
        SetupServiceKind::M365TenantSetup,
        SetupServiceKind::ServerMigration,
        SetupServiceKind::StandardOnboarding,
        SetupServiceKind::IntuneOnboarding,
        SetupServiceKind::Documentation,
        SetupServiceKind::BackupConfiguration,
        SetupServiceKind::FirewallConfiguration,
        SetupServiceKind::EmailMigration,
        SetupServiceKind::DomainMigration,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            SetupServiceKind::NetworkAssessment => "network-assessment",
            SetupServiceKind::SecurityBaseline => "security-baseline",
            SetupServiceKind::M365TenantSetup => "m365-tenant-setup",
            SetupServiceKind::ServerMigration => "server-migration",
            SetupServiceKind::StandardOnboarding => "standard-onboarding",
            SetupServiceKind::IntuneOnboarding => "intune-onboarding",
            SetupServiceKind::Documentation => "documentation",
            SetupServiceKind::BackupConfiguration => "backup-configuration",
            SetupServiceKind::FirewallConfiguration => "firewall-configuration",
            SetupServiceKind::EmailMigration => "email-migration",
            SetupServiceKind::DomainMigration => "domain-migration",
        }
    }

    pub fn formula(&self) -> HoursFormula {
        match self {
            SetupServiceKind::NetworkAssessment => HoursFormula::flat(3.23),
            SetupServiceKind::SecurityBaseline => HoursFormula::flat(3.07),
            SetupServiceKind::M365TenantSetup => HoursFormula::flat(9.15),
            SetupServiceKind::ServerMigration => HoursFormula::flat(13.4),
            SetupServiceKind::StandardOnboarding => HoursFormula::scaled(33.99, 0.5),
            SetupServiceKind::IntuneOnboarding => HoursFormula::scaled(12.66, 0.22),
            // Flat estimates until the work is timed.
            SetupServiceKind::Documentation => HoursFormula::flat(1.0),
            SetupServiceKind::BackupConfiguration => HoursFormula::flat(2.0),
            SetupServiceKind::FirewallConfiguration => HoursFormula::flat(4.0),
            SetupServiceKind::EmailMigration => HoursFormula::flat(8.0),
            SetupServiceKind::DomainMigration => HoursFormula::flat(16.0),
        }
    }
}

/// Catalog entry returned to clients that build the setup-service list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupServiceInfo {
    pub id: &'static str,
    #[serde(flatten)]
    pub formula: HoursFormula,
}

pub fn setup_service_catalog() -> Vec<SetupServiceInfo> {
    SetupServiceKind::ALL
        .iter()
        .map(|kind| SetupServiceInfo {
            id: kind.id(),
            formula: kind.formula(),
        })
        .collect()
}

/// Returns the labor hours needed to deliver setup service `id`.
///
/// Inactive services and unknown identifiers both resolve to zero.
pub fn setup_service_hours(id: &str, is_active: bool, customer: &CustomerInfo) -> f64 {
    if !is_active {
        return 0.0;
    }
    match SetupServiceKind::from_id(id) {
        Some(kind) => kind.formula().hours(customer),
        None => {
            tracing::debug!(id, "No hours formula for setup service");
            0.0
        }
    }
}

/// Hours for a setup line item: explicit hours win over the formula.
pub fn service_hours(service: &SetupService, customer: &CustomerInfo) -> f64 {
    if !service.is_active {
        return 0.0;
    }
    service
        .hours
        .unwrap_or_else(|| setup_service_hours(&service.id, service.is_active, customer))
}

/// Total one-time setup cost across active services.
///
/// Services with hours and a skill level are priced at the level's
/// business-hours rate whatever their time factor; everything else
/// falls back to its flat price.  The sum is left unrounded.
pub fn calculate_setup_costs(
    services: &[SetupService],
    rates: &LaborRates,
    customer: &CustomerInfo,
) -> f64 {
    services
        .iter()
        .filter(|service| service.is_active)
        .map(|service| {
            let hours = service_hours(service, customer);
            match service.skill_level {
                Some(level) if hours > 0.0 => hours * rates.for_level(level).business_hours_price,
                _ => service.price.unwrap_or(0.0),
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::round_currency;
    use crate::models::fixtures::{customer, setup_service};
    use crate::models::{SkillLevel, TimeFactor};

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn test_every_kind_round_trips_through_its_id() {
        for kind in SetupServiceKind::ALL {
            assert_eq!(SetupServiceKind::from_id(kind.id()), Some(kind));
        }
    }

    #[test]
    fn test_flat_formulas() {
        let customer = customer(40);
        assert_close(setup_service_hours("network-assessment", true, &customer), 3.23);
        assert_close(setup_service_hours("security-baseline", true, &customer), 3.07);
        assert_close(setup_service_hours("m365-tenant-setup", true, &customer), 9.15);
        assert_close(setup_service_hours("server-migration", true, &customer), 13.4);
        assert_close(setup_service_hours("domain-migration", true, &customer), 16.0);
    }

    #[test]
    fn test_workstation_scaled_formulas() {
        assert_close(setup_service_hours("standard-onboarding", true, &customer(10)), 38.99);
        assert_close(setup_service_hours("intune-onboarding", true, &customer(20)), 17.06);
        assert_close(setup_service_hours("standard-onboarding", true, &customer(0)), 33.99);
    }

    #[test]
    fn test_inactive_and_unknown_resolve_to_zero() {
        let customer = customer(10);
        assert_eq!(setup_service_hours("standard-onboarding", false, &customer), 0.0);
        assert_eq!(setup_service_hours("nonexistent", true, &customer), 0.0);
    }

    #[test]
    fn test_standard_onboarding_cost() {
        let services = vec![setup_service("standard-onboarding", Some(SkillLevel::Level2))];
        let cost = calculate_setup_costs(&services, &LaborRates::default(), &customer(10));
        assert_eq!(round_currency(cost), 7213.15);
    }

    #[test]
    fn test_intune_onboarding_cost() {
        let services = vec![setup_service("intune-onboarding", Some(SkillLevel::Level1))];
        let cost = calculate_setup_costs(&services, &LaborRates::default(), &customer(20));
        assert_eq!(round_currency(cost), 2644.30);
    }

    #[test]
    fn test_unknown_service_without_price_contributes_nothing() {
        let services = vec![setup_service("nonexistent", Some(SkillLevel::Level3))];
        assert_eq!(calculate_setup_costs(&services, &LaborRates::default(), &customer(10)), 0.0);
    }

    #[test]
    fn test_unknown_service_falls_back_to_price() {
        let mut service = setup_service("site-survey", Some(SkillLevel::Level3));
        service.price = Some(450.0);
        assert_eq!(calculate_setup_costs(&[service], &LaborRates::default(), &customer(10)), 450.0);
    }

    #[test]
    fn test_missing_skill_level_falls_back_to_price() {
        let mut service = setup_service("server-migration", None);
        service.price = Some(1200.0);
        assert_eq!(calculate_setup_costs(&[service], &LaborRates::default(), &customer(10)), 1200.0);
    }

    #[test]
    fn test_explicit_hours_override_formula() {
        let mut service = setup_service("standard-onboarding", Some(SkillLevel::Level1));
        service.hours = Some(2.0);
        assert_eq!(calculate_setup_costs(&[service], &LaborRates::default(), &customer(10)), 310.0);
    }

    #[test]
    fn test_zero_explicit_hours_fall_back_to_price() {
        let mut service = setup_service("standard-onboarding", Some(SkillLevel::Level2));
        service.hours = Some(0.0);
        service.price = Some(875.0);
        assert_eq!(calculate_setup_costs(&[service], &LaborRates::default(), &customer(10)), 875.0);
    }

    #[test]
    fn test_after_hours_services_still_use_business_price() {
        let mut service = setup_service("server-migration", Some(SkillLevel::Level2));
        service.time_factor = TimeFactor::AfterHours;
        let cost = calculate_setup_costs(&[service], &LaborRates::default(), &customer(10));
        assert_eq!(round_currency(cost), round_currency(13.4 * 185.0));
    }

    #[test]
    fn test_inactive_service_removes_only_its_contribution() {
        let mut services = vec![
            setup_service("documentation", Some(SkillLevel::Level1)),
            setup_service("email-migration", Some(SkillLevel::Level1)),
        ];
        let rates = LaborRates::default();
        let customer = customer(10);
        let both = calculate_setup_costs(&services, &rates, &customer);
        services[1].is_active = false;
        let one = calculate_setup_costs(&services, &rates, &customer);
        assert_eq!(both, 9.0 * 155.0);
        assert_eq!(one, 155.0);
    }

    #[test]
    fn test_catalog_lists_every_kind() {
        let catalog = setup_service_catalog();
        assert_eq!(catalog.len(), SetupServiceKind::ALL.len());
        let onboarding = catalog.iter().find(|c| c.id == "standard-onboarding").unwrap();
        assert_eq!(onboarding.formula.hours_per_workstation, 0.5);
    }
}
