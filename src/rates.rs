//! Rate tables and loading helpers.
//!
//! The `rates` module holds every price the engine multiplies by: the
//! three-level labor-rate table used for setup work, and the per-seat
//! and per-device rates used by the legacy calculators.  Rates are
//! plain data passed into the engine so that tenants (and tests) can
//! override them.  Tenant overrides are stored as JSON files, one per
//! tenant, and loaded with [`load_rate_tables_from_dir`].

use crate::error::QuoteError;
use crate::models::{check_amount, SkillLevel};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Hourly cost and billable prices for one skill level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborRate {
    /// What an hour of this level costs the provider.
    pub cost_per_hour: f64,
    /// Billable price for an hour during business hours.
    pub business_hours_price: f64,
    /// Billable price for an hour outside business hours.
    pub after_hours_price: f64,
}

impl LaborRate {
    const fn new(cost_per_hour: f64, business_hours_price: f64, after_hours_price: f64) -> Self {
        Self {
            cost_per_hour,
            business_hours_price,
            after_hours_price,
        }
    }
}

/// The labor-rate table, one [`LaborRate`] per [`SkillLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborRates {
    pub level1: LaborRate,
    pub level2: LaborRate,
    pub level3: LaborRate,
}

impl Default for LaborRates {
    fn default() -> Self {
        Self {
            level1: LaborRate::new(22.0, 155.0, 155.0),
            level2: LaborRate::new(37.0, 185.0, 275.0),
            level3: LaborRate::new(46.0, 275.0, 375.0),
        }
    }
}

impl LaborRates {
    pub fn for_level(&self, level: SkillLevel) -> &LaborRate {
        match level {
            SkillLevel::Level1 => &self.level1,
            SkillLevel::Level2 => &self.level2,
            SkillLevel::Level3 => &self.level3,
        }
    }

    pub fn validate(&self) -> Result<(), QuoteError> {
        for (name, rate) in [
            ("laborRates.level1", &self.level1),
            ("laborRates.level2", &self.level2),
            ("laborRates.level3", &self.level3),
        ] {
            check_amount(name, "costPerHour", rate.cost_per_hour)?;
            check_amount(name, "businessHoursPrice", rate.business_hours_price)?;
            check_amount(name, "afterHoursPrice", rate.after_hours_price)?;
        }
        Ok(())
    }
}

/// Flat monthly rates of the legacy tools/licensing model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolRates {
    pub ncentral_per_workstation: f64,
    pub remote_control_per_user: f64,
    pub quickpass_per_user: f64,
    pub antivirus_per_workstation: f64,
    pub backup_per_server: f64,
}

impl Default for ToolRates {
    fn default() -> Self {
        Self {
            ncentral_per_workstation: 5.50,
            remote_control_per_user: 2.25,
            quickpass_per_user: 1.50,
            antivirus_per_workstation: 3.00,
            backup_per_server: 25.00,
        }
    }
}

impl ToolRates {
    pub fn validate(&self) -> Result<(), QuoteError> {
        check_amount("tools", "ncentralPerWorkstation", self.ncentral_per_workstation)?;
        check_amount("tools", "remoteControlPerUser", self.remote_control_per_user)?;
        check_amount("tools", "quickpassPerUser", self.quickpass_per_user)?;
        check_amount("tools", "antivirusPerWorkstation", self.antivirus_per_workstation)?;
        check_amount("tools", "backupPerServer", self.backup_per_server)
    }
}

/// Monthly per-device rates used by the HaaS and warranty calculators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareRates {
    pub per_workstation: f64,
    pub per_server: f64,
}

impl HardwareRates {
    pub fn haas() -> Self {
        Self {
            per_workstation: 25.0,
            per_server: 100.0,
        }
    }

    pub fn warranty() -> Self {
        Self {
            per_workstation: 15.0,
            per_server: 75.0,
        }
    }

    /// `section` names the table section in error messages.
    pub fn validate(&self, section: &str) -> Result<(), QuoteError> {
        check_amount(section, "perWorkstation", self.per_workstation)?;
        check_amount(section, "perServer", self.per_server)
    }
}

/// Every rate a tenant may override.  Sections omitted from a rate
/// table file take the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    pub tenant: String,
    #[serde(default)]
    pub labor: LaborRates,
    #[serde(default)]
    pub tools: ToolRates,
    #[serde(default = "HardwareRates::haas")]
    pub haas: HardwareRates,
    #[serde(default = "HardwareRates::warranty")]
    pub warranty: HardwareRates,
}

impl RateTable {
    /// Every section must hold finite, non-negative rates.
    pub fn validate(&self) -> Result<(), QuoteError> {
        self.labor.validate()?;
        self.tools.validate()?;
        self.haas.validate("haas")?;
        self.warranty.validate("warranty")
    }

    /// The built-in table used when a tenant has no overrides.
    pub fn defaults(tenant: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            labor: LaborRates::default(),
            tools: ToolRates::default(),
            haas: HardwareRates::haas(),
            warranty: HardwareRates::warranty(),
        }
    }
}

/// Tenant rate tables keyed by tenant, with the built-in table as the
/// fallback for tenants that have none.
#[derive(Debug, Clone)]
pub struct RateBook {
    tables: HashMap<String, RateTable>,
    fallback: RateTable,
}

impl Default for RateBook {
    fn default() -> Self {
        Self {
            tables: HashMap::new(),
            fallback: RateTable::defaults(DEFAULT_TENANT),
        }
    }
}

pub const DEFAULT_TENANT: &str = "default";

impl RateBook {
    pub fn from_tables(tables: impl IntoIterator<Item = RateTable>) -> Self {
        let mut book = Self::default();
        for table in tables {
            book.insert(table);
        }
        book
    }

    /// Adds or replaces a tenant's table.  A table for the default
    /// tenant replaces the built-in fallback.
    pub fn insert(&mut self, table: RateTable) {
        if table.tenant == DEFAULT_TENANT {
            self.fallback = table;
        } else {
            self.tables.insert(table.tenant.clone(), table);
        }
    }

    pub fn resolve(&self, tenant: Option<&str>) -> &RateTable {
        match tenant {
            Some(name) => self.tables.get(name).unwrap_or_else(|| {
                tracing::debug!(tenant = name, "No rate table for tenant, using defaults");
                &self.fallback
            }),
            None => &self.fallback,
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Load all tenant rate tables from a directory.
///
/// Every `.json` file is parsed as a [`RateTable`].  Files that fail
/// to parse are logged and skipped so one bad tenant file does not
/// take the others down.  A missing directory yields no tables.
pub fn load_rate_tables_from_dir(path: &Path) -> Result<Vec<RateTable>> {
    let mut tables = Vec::new();
    if !path.is_dir() {
        tracing::info!(dir = %path.display(), "Rate table directory not found, using defaults only");
        return Ok(tables);
    }
    let mut entries = std::fs::read_dir(path)
        .with_context(|| format!("reading rate table directory {}", path.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    // Later files win on duplicate tenants, so make "later" deterministic.
    entries.sort_by_key(|entry| entry.path());
    for entry in entries {
        let file = entry.path();
        if !entry.file_type()?.is_file() || file.extension().map_or(true, |ext| ext != "json") {
            continue;
        }
        let data = std::fs::read_to_string(&file)
            .with_context(|| format!("reading rate table {}", file.display()))?;
        match serde_json::from_str::<RateTable>(&data) {
            Ok(table) => match table.validate() {
                Ok(()) => {
                    tracing::debug!(tenant = %table.tenant, file = %file.display(), "Loaded rate table");
                    tables.push(table);
                }
                Err(err) => {
                    tracing::warn!(file = %file.display(), error = %err, "Skipping invalid rate table");
                }
            },
            Err(err) => {
                tracing::warn!(file = %file.display(), error = %err, "Failed to parse rate table");
            }
        }
    }
    Ok(tables)
}
