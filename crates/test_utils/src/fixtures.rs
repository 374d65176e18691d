//! Pre-built Test Fixtures
//!
//! A three-page March 2025 bill and the four-family configuration that owns
//! every line on it. The figures are chosen so that every rule has
//! something to split:
//!
//! | Category | Subtotal | Notes |
//! |----------|----------|-------|
//! | Voice | $260.00 | 11 lines reported, 10 billable ($26.00 each) |
//! | Wearables | $36.00 | 2 watches |
//! | Connected | $20.00 | 1 hotspot |
//! | Equipment | $59.59 | iPhone $37.30 - $3.96, Galaxy $26.25 |
//! | Netflix | $24.00 | 8 adults |
//! | Usage | $2.34 | 2 lines |

use chrono::NaiveDate;
use core_kernel::{FamilyId, Money, PhoneNumber};
use domain_allocation::{Device, DeviceKind, Family, FamilyConfig, PlanSplit};
use domain_extraction::{BillDocument, PAGE_SEPARATOR};
use rust_decimal_macros::dec;

/// Page 1: account summary and plans banner
pub const SAMPLE_PAGE_1: &str = "\
Bill issue date Mar 03, 2025
Account 987654321
Your bill is due by Mar 24, 2025.
TOTAL DUE $401.93

PLANS
11 VOICE LINES = $260.00 | 2 WEARABLES = $36.00 | 1 CONNECTED
DEVICE = $20.00
Netflix Standard with ads included $0.00
Regular charges bill period Mar 04 - Apr 03
";

/// Page 2: per-line summary with one transferred number
pub const SAMPLE_PAGE_2: &str = "\
THIS BILL SUMMARY
Line Type Plans Equipment Services One-time Total
(410) 227-2625 Voice $26.00 $33.34 - $0.50 $59.84
(201) 290-4373 Voice $26.00 - - - $26.00
(240) 584-4111 Voice $26.00 - - - $26.00
(240) 988-3907 Voice $26.00 - - - $26.00
(240) 988-3908 Voice $26.00 - - - $26.00
(240) 988-3906 - Old number Voice - - - - $0.00
(301) 555-0111 Voice $26.00 - - - $26.00
(301) 555-0112 Voice $26.00 - - - $26.00
(301) 555-0113 Voice $26.00 - - - $26.00
(202) 258-6292 Voice $26.00 $26.25 - - $52.25
(202) 555-0133 Voice $26.00 - - - $26.00
(347) 636-6212 Wearable $18.00 - - $1.84 $19.84
(202) 555-0134 Wearable $18.00 - - - $18.00
(443) 555-0101 Connected device $20.00 - - - $20.00
SERVICES $24.00
Netflix Premium add-on $24.00
";

/// Page 3: equipment detail and usage
pub const SAMPLE_PAGE_3: &str = "\
EQUIPMENT $59.59
(410) 227-2625 Apple iPhone 15
Installment 14 of 24 $37.30
Promotional credit -$3.96
$33.34

(202) 258-6292 Samsung Galaxy S23 $26.25

CHARGED USAGE $2.34
(410) 227-2625 International call to Canada $0.50
(347) 636-6212 Data pass
$1.84
TAXES & FEES
Regulatory programs fee $0.00
";

/// Sample family configuration, as the YAML file holds it
pub const SAMPLE_FAMILY_YAML: &str = r#"priority_family: JJ
plan_split:
  wearable: pass_through
  connected: pass_through
families:
  JJ:
    name: Jonah & Janet
    adults: 2
    devices:
      - { number: "4102272625", kind: voice, label: jonah iphone }
      - { number: "2012904373", kind: voice, label: janet iphone }
      - { number: "3476366212", kind: wearable, label: julia apple watch }
  KS:
    name: Kevin & Sue
    adults: 2
    devices:
      - { number: "2405844111", kind: voice, label: fran phone }
      - { number: "2409883907", kind: voice }
      - { number: "2409883908", kind: voice }
      - { number: "4435550101", kind: connected, label: hotspot }
  DJ:
    name: Dana & Jules
    adults: 2
    devices:
      - { number: "3015550111", kind: voice }
      - { number: "3015550112", kind: voice }
      - { number: "3015550113", kind: voice }
  RE:
    name: Rebecca & Eli
    adults: 2
    devices:
      - { number: "2022586292", kind: voice, label: rebecca iphone }
      - { number: "2025550133", kind: voice }
      - { number: "2025550134", kind: wearable }
"#;

/// Fixture for the sample bill
pub struct BillFixtures;

impl BillFixtures {
    /// Page texts of the sample bill
    pub fn sample_pages() -> Vec<&'static str> {
        vec![SAMPLE_PAGE_1, SAMPLE_PAGE_2, SAMPLE_PAGE_3]
    }

    pub fn sample_document() -> BillDocument {
        BillDocument::from_pages(Self::sample_pages())
    }

    /// The sample bill as a form-feed separated text dump
    pub fn sample_text() -> String {
        let mut text = Self::sample_pages().join(&PAGE_SEPARATOR.to_string());
        text.push(PAGE_SEPARATOR);
        text
    }

    pub fn due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 24).unwrap()
    }

    pub fn total_due() -> Money {
        Money::new(dec!(401.93))
    }

    /// The number moved to another line during the cycle
    pub fn transferred_number() -> PhoneNumber {
        PhoneNumber::parse("2409883906").unwrap()
    }

    pub fn iphone() -> PhoneNumber {
        PhoneNumber::parse("4102272625").unwrap()
    }

    pub fn galaxy() -> PhoneNumber {
        PhoneNumber::parse("2022586292").unwrap()
    }
}

/// Fixture for family configurations
pub struct FamilyFixtures;

impl FamilyFixtures {
    pub fn jj() -> FamilyId {
        FamilyId::new("JJ").unwrap()
    }

    pub fn ks() -> FamilyId {
        FamilyId::new("KS").unwrap()
    }

    pub fn dj() -> FamilyId {
        FamilyId::new("DJ").unwrap()
    }

    pub fn re() -> FamilyId {
        FamilyId::new("RE").unwrap()
    }

    /// The configuration of `SAMPLE_FAMILY_YAML`, built in code
    pub fn sample_config() -> FamilyConfig {
        let family = |code: &str, name: &str, devices: &[(&str, DeviceKind)]| Family {
            id: FamilyId::new(code).unwrap(),
            name: name.to_string(),
            adults: 2,
            devices: devices
                .iter()
                .map(|(number, kind)| Device::new(PhoneNumber::parse(number).unwrap(), *kind))
                .collect(),
        };

        FamilyConfig::new(
            vec![
                family(
                    "JJ",
                    "Jonah & Janet",
                    &[
                        ("4102272625", DeviceKind::Voice),
                        ("2012904373", DeviceKind::Voice),
                        ("3476366212", DeviceKind::Wearable),
                    ],
                ),
                family(
                    "KS",
                    "Kevin & Sue",
                    &[
                        ("2405844111", DeviceKind::Voice),
                        ("2409883907", DeviceKind::Voice),
                        ("2409883908", DeviceKind::Voice),
                        ("4435550101", DeviceKind::Connected),
                    ],
                ),
                family(
                    "DJ",
                    "Dana & Jules",
                    &[
                        ("3015550111", DeviceKind::Voice),
                        ("3015550112", DeviceKind::Voice),
                        ("3015550113", DeviceKind::Voice),
                    ],
                ),
                family(
                    "RE",
                    "Rebecca & Eli",
                    &[
                        ("2022586292", DeviceKind::Voice),
                        ("2025550133", DeviceKind::Voice),
                        ("2025550134", DeviceKind::Wearable),
                    ],
                ),
            ],
            Self::jj(),
            PlanSplit::default(),
        )
        .unwrap()
    }
}
