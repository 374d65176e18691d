//! Family configuration
//!
//! Who owns each line and device, how many adults each family has, and
//! which family absorbs a rounding tie. The configuration is validated once
//! on construction and only read afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use core_kernel::{DeviceId, FamilyId, PhoneNumber};

use crate::error::AllocationError;

/// Plan type of a configured device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Voice,
    Wearable,
    Connected,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Voice => write!(f, "voice"),
            DeviceKind::Wearable => write!(f, "wearable"),
            DeviceKind::Connected => write!(f, "connected"),
        }
    }
}

/// How a per-device plan subtotal is split
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Each device passes its plan fee through to its owner
    #[default]
    PassThrough,
    /// Shared pool across families; not supported
    Pooled,
}

/// Split strategy per plan category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSplit {
    #[serde(default)]
    pub wearable: SplitStrategy,
    #[serde(default)]
    pub connected: SplitStrategy,
}

/// A configured line or device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub number: PhoneNumber,
    pub kind: DeviceKind,
    /// Human-readable name, e.g. `jonah iphone`
    pub label: Option<String>,
}

impl Device {
    pub fn new(number: PhoneNumber, kind: DeviceKind) -> Self {
        Self {
            number,
            kind,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A cost-sharing household
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,
    /// Display name used in reports
    pub name: String,
    /// Adults sharing the Netflix add-on
    pub adults: u32,
    pub devices: Vec<Device>,
}

/// Validated family configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyConfig {
    families: Vec<Family>,
    priority: FamilyId,
    plan_split: PlanSplit,
    owners: BTreeMap<DeviceId, (FamilyId, DeviceKind)>,
}

impl FamilyConfig {
    /// Validates and indexes a family configuration
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when there are no families, a family code is
    /// repeated, the priority family is not configured, a number is owned
    /// twice, or a plan split other than pass-through is requested.
    pub fn new(
        families: Vec<Family>,
        priority: FamilyId,
        plan_split: PlanSplit,
    ) -> Result<Self, AllocationError> {
        if families.is_empty() {
            return Err(AllocationError::configuration("at least one family is required"));
        }

        for (category, strategy) in [
            ("wearable", plan_split.wearable),
            ("connected", plan_split.connected),
        ] {
            if strategy == SplitStrategy::Pooled {
                return Err(AllocationError::configuration(format!(
                    "pooled plan split for {category} is not supported; use pass_through"
                )));
            }
        }

        let mut owners = BTreeMap::new();
        for (position, family) in families.iter().enumerate() {
            if families[..position].iter().any(|f| f.id == family.id) {
                return Err(AllocationError::configuration(format!(
                    "family {} is configured twice",
                    family.id
                )));
            }
            for device in &family.devices {
                let key = DeviceId::from(&device.number);
                if let Some((owner, _)) = owners.insert(key, (family.id.clone(), device.kind)) {
                    return Err(AllocationError::configuration(format!(
                        "number {} is owned by both {} and {}",
                        device.number, owner, family.id
                    )));
                }
            }
        }

        if !families.iter().any(|f| f.id == priority) {
            return Err(AllocationError::configuration(format!(
                "priority family {priority} is not configured"
            )));
        }

        Ok(Self {
            families,
            priority,
            plan_split,
            owners,
        })
    }

    /// Families in configuration order
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn family_ids(&self) -> impl Iterator<Item = &FamilyId> {
        self.families.iter().map(|f| &f.id)
    }

    pub fn family(&self, id: &FamilyId) -> Option<&Family> {
        self.families.iter().find(|f| &f.id == id)
    }

    /// Family that absorbs rounding ties
    pub fn priority_family(&self) -> &FamilyId {
        &self.priority
    }

    pub fn plan_split(&self) -> PlanSplit {
        self.plan_split
    }

    /// Position of a family in configuration order
    pub fn position(&self, id: &FamilyId) -> usize {
        self.families
            .iter()
            .position(|f| &f.id == id)
            .unwrap_or(self.families.len())
    }

    /// Owner of a phone line
    pub fn owner_of_phone(&self, phone: &PhoneNumber) -> Option<&FamilyId> {
        self.owners.get(&DeviceId::from(phone)).map(|(family, _)| family)
    }

    /// Owner of a device; identifiers match on the exact ten digits
    pub fn owner_of_device(&self, device: &DeviceId) -> Option<&FamilyId> {
        self.owners.get(device).map(|(family, _)| family)
    }

    /// Configured devices of one kind, with their owners
    pub fn devices_of_kind(&self, kind: DeviceKind) -> impl Iterator<Item = (&FamilyId, &Device)> {
        self.families.iter().flat_map(move |family| {
            family
                .devices
                .iter()
                .filter(move |device| device.kind == kind)
                .map(move |device| (&family.id, device))
        })
    }

    pub fn adults(&self, id: &FamilyId) -> u32 {
        self.family(id).map(|f| f.adults).unwrap_or_default()
    }

    pub fn total_adults(&self) -> u32 {
        self.families.iter().map(|f| f.adults).sum()
    }

    /// Display name, falling back to the family code
    pub fn display_name<'a>(&'a self, id: &'a FamilyId) -> &'a str {
        self.family(id)
            .map(|f| f.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(code: &str, adults: u32, devices: &[(&str, DeviceKind)]) -> Family {
        Family {
            id: FamilyId::new(code).unwrap(),
            name: String::new(),
            adults,
            devices: devices
                .iter()
                .map(|(number, kind)| Device::new(PhoneNumber::parse(number).unwrap(), *kind))
                .collect(),
        }
    }

    fn jj() -> FamilyId {
        FamilyId::new("JJ").unwrap()
    }

    #[test]
    fn test_owner_lookup() {
        let config = FamilyConfig::new(
            vec![
                family("JJ", 2, &[("4102272625", DeviceKind::Voice)]),
                family("KS", 2, &[("3476366212", DeviceKind::Wearable)]),
            ],
            jj(),
            PlanSplit::default(),
        )
        .unwrap();

        let phone = PhoneNumber::parse("(410) 227-2625").unwrap();
        assert_eq!(config.owner_of_phone(&phone), Some(&jj()));
        assert_eq!(
            config.owner_of_device(&DeviceId::new("3476366212").unwrap()),
            Some(&FamilyId::new("KS").unwrap())
        );
        assert_eq!(config.owner_of_device(&DeviceId::new("3476362625").unwrap()), None);
        assert_eq!(config.devices_of_kind(DeviceKind::Wearable).count(), 1);
        assert_eq!(config.total_adults(), 4);
        assert_eq!(config.display_name(&jj()), "JJ");
    }

    #[test]
    fn test_duplicate_number_rejected() {
        let result = FamilyConfig::new(
            vec![
                family("JJ", 2, &[("4102272625", DeviceKind::Voice)]),
                family("KS", 2, &[("4102272625", DeviceKind::Voice)]),
            ],
            jj(),
            PlanSplit::default(),
        );
        assert!(matches!(result, Err(AllocationError::Configuration(_))));
    }

    #[test]
    fn test_unknown_priority_rejected() {
        let result = FamilyConfig::new(
            vec![family("KS", 2, &[])],
            jj(),
            PlanSplit::default(),
        );
        assert!(matches!(result, Err(AllocationError::Configuration(_))));
    }

    #[test]
    fn test_pooled_split_rejected() {
        let result = FamilyConfig::new(
            vec![family("JJ", 2, &[])],
            jj(),
            PlanSplit {
                wearable: SplitStrategy::Pooled,
                connected: SplitStrategy::PassThrough,
            },
        );
        assert!(matches!(result, Err(AllocationError::Configuration(m)) if m.contains("pooled")));
    }

    #[test]
    fn test_empty_config_rejected() {
        assert!(FamilyConfig::new(Vec::new(), jj(), PlanSplit::default()).is_err());
    }
}
