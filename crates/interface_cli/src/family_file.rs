//! Family configuration file
//!
//! `family_config.yaml` is read through the `config` crate into
//! [`FamilyConfigFile`], a plain serde mirror of the file, and then validated
//! into the domain [`FamilyConfig`]. Families keep the order they are listed
//! in, which is the column order of the ledger and the last tie-break of
//! penny-drift reconciliation.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use core_kernel::{FamilyId, PhoneNumber};
use domain_allocation::{AllocationError, Device, DeviceKind, Family, FamilyConfig, PlanSplit};

use crate::error::{AppError, AppResult};

fn default_adults() -> u32 {
    2
}

/// A device entry as written in the file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceEntry {
    pub number: String,
    pub kind: DeviceKind,
    #[serde(default)]
    pub label: Option<String>,
}

/// A family entry as written in the file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FamilyEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

/// The family configuration file before validation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FamilyConfigFile {
    /// Defaults to the first family listed
    #[serde(default)]
    pub priority_family: Option<String>,
    #[serde(default)]
    pub plan_split: PlanSplit,
    #[serde(deserialize_with = "ordered_families")]
    pub families: Vec<(String, FamilyEntry)>,
}

fn ordered_families<'de, D>(deserializer: D) -> Result<Vec<(String, FamilyEntry)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedFamilies;

    impl<'de> Visitor<'de> for OrderedFamilies {
        type Value = Vec<(String, FamilyEntry)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of family codes to families")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut families = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, FamilyEntry>()? {
                families.push(entry);
            }
            Ok(families)
        }
    }

    deserializer.deserialize_map(OrderedFamilies)
}

impl FamilyConfigFile {
    /// Reads a YAML family configuration file
    ///
    /// # Errors
    ///
    /// Returns `FamilyConfig` when the file is missing or not valid YAML of
    /// the expected shape.
    pub fn load(path: &Path) -> AppResult<Self> {
        config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Yaml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::family_config(path.display().to_string(), e))
    }

    /// Parses YAML text
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Yaml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::family_config("<inline>", e))
    }

    /// Validates the file into a domain configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for an empty family code, a number that is not
    /// ten digits, and everything [`FamilyConfig::new`] rejects.
    pub fn into_config(self) -> Result<FamilyConfig, AllocationError> {
        let mut families = Vec::with_capacity(self.families.len());
        for (code, entry) in self.families {
            let id = FamilyId::new(&code)
                .map_err(|e| AllocationError::configuration(format!("family '{code}': {e}")))?;

            let mut devices = Vec::with_capacity(entry.devices.len());
            for device in entry.devices {
                let number = PhoneNumber::parse(&device.number).map_err(|e| {
                    AllocationError::configuration(format!("family {id}: {e}"))
                })?;
                let mut parsed = Device::new(number, device.kind);
                if let Some(label) = device.label {
                    parsed = parsed.with_label(label);
                }
                devices.push(parsed);
            }

            families.push(Family {
                name: entry.name.unwrap_or_else(|| id.to_string()),
                adults: entry.adults,
                id,
                devices,
            });
        }

        let priority = match self.priority_family {
            Some(code) => FamilyId::new(&code)
                .map_err(|e| AllocationError::configuration(format!("priority family: {e}")))?,
            None => families
                .first()
                .map(|f| f.id.clone())
                .ok_or_else(|| AllocationError::configuration("at least one family is required"))?,
        };

        FamilyConfig::new(families, priority, self.plan_split)
    }
}

/// Loads and validates `family_config.yaml`
pub fn load_family_config(path: &Path) -> AppResult<FamilyConfig> {
    FamilyConfigFile::load(path)?
        .into_config()
        .map_err(|e| AppError::family_config(path.display().to_string(), e))
}

/// Parses and validates family configuration YAML text
pub fn parse_family_config(text: &str) -> AppResult<FamilyConfig> {
    FamilyConfigFile::from_yaml(text)?
        .into_config()
        .map_err(|e| AppError::family_config("<inline>", e))
}
