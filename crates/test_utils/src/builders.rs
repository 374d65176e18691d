//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use core_kernel::{BillingCycle, DeviceId, FamilyId, Money, PhoneNumber};
use domain_allocation::{AllocationError, Device, DeviceKind, Family, FamilyConfig, PlanSplit};
use domain_extraction::{
    BillDocument, BillTotals, EquipmentEntry, EquipmentFidelity, ExclusionReason, UsageCharge,
    VoiceLineRecord, PAGE_SEPARATOR,
};

/// Builder for synthetic bill text
///
/// Produces pages in the layout the parser reads: dates and the plans
/// banner on page 1, the line summary on page 2 and the equipment and
/// usage sections on the equipment page (3 unless changed).
pub struct BillTextBuilder {
    issue_date: Option<String>,
    due_date: Option<String>,
    bill_period: Option<(String, String)>,
    total_due: Vec<Money>,
    voice: Option<(u32, Money)>,
    wearables: Option<(u32, Money)>,
    connected: Option<(u32, Money)>,
    netflix: Option<Money>,
    summary_rows: Vec<String>,
    equipment_subtotal: Option<Money>,
    equipment_lines: Vec<String>,
    equipment_page: usize,
    usage_subtotal: Option<Money>,
    usage_lines: Vec<String>,
}

impl Default for BillTextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BillTextBuilder {
    /// Creates a builder for a March 2025 bill with no charges
    pub fn new() -> Self {
        Self {
            issue_date: Some("Mar 03, 2025".to_string()),
            due_date: Some("Mar 24, 2025".to_string()),
            bill_period: Some(("Mar 04".to_string(), "Apr 03".to_string())),
            total_due: Vec::new(),
            voice: None,
            wearables: None,
            connected: None,
            netflix: None,
            summary_rows: Vec::new(),
            equipment_subtotal: None,
            equipment_lines: Vec::new(),
            equipment_page: 3,
            usage_subtotal: None,
            usage_lines: Vec::new(),
        }
    }

    pub fn issue_date(mut self, date: impl Into<String>) -> Self {
        self.issue_date = Some(date.into());
        self
    }

    pub fn without_issue_date(mut self) -> Self {
        self.issue_date = None;
        self
    }

    pub fn due_date(mut self, date: impl Into<String>) -> Self {
        self.due_date = Some(date.into());
        self
    }

    pub fn without_due_date(mut self) -> Self {
        self.due_date = None;
        self
    }

    pub fn bill_period(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.bill_period = Some((start.into(), end.into()));
        self
    }

    /// Adds a `TOTAL DUE` figure; call twice for a conflicting bill
    pub fn total_due(mut self, amount: Money) -> Self {
        self.total_due.push(amount);
        self
    }

    pub fn voice_lines(mut self, count: u32, subtotal: Money) -> Self {
        self.voice = Some((count, subtotal));
        self
    }

    pub fn wearables(mut self, count: u32, subtotal: Money) -> Self {
        self.wearables = Some((count, subtotal));
        self
    }

    pub fn connected(mut self, count: u32, subtotal: Money) -> Self {
        self.connected = Some((count, subtotal));
        self
    }

    pub fn netflix(mut self, amount: Money) -> Self {
        self.netflix = Some(amount);
        self
    }

    /// Adds a billable voice row to the bill summary
    pub fn voice_row(mut self, phone: &str, plan: Money) -> Self {
        let phone = render_phone(phone);
        self.summary_rows
            .push(format!("{phone} Voice {plan} - - - {plan}"));
        self
    }

    /// Adds a voice row with a description and an empty plans column
    pub fn excluded_row(mut self, phone: &str, description: &str) -> Self {
        let phone = render_phone(phone);
        self.summary_rows
            .push(format!("{phone} - {description} Voice - - - - $0.00"));
        self
    }

    /// Adds a wearable row to the bill summary
    pub fn wearable_row(mut self, phone: &str, plan: Money) -> Self {
        let phone = render_phone(phone);
        self.summary_rows
            .push(format!("{phone} Wearable {plan} - - - {plan}"));
        self
    }

    pub fn equipment_subtotal(mut self, amount: Money) -> Self {
        self.equipment_subtotal = Some(amount);
        self
    }

    /// Adds a device paragraph: the phone header followed by body lines
    ///
    /// A blank line is appended after the paragraph.
    pub fn device(mut self, header: &str, body: &[&str]) -> Self {
        self.equipment_lines.push(header.to_string());
        self.equipment_lines
            .extend(body.iter().map(|line| line.to_string()));
        self.equipment_lines.push(String::new());
        self
    }

    /// Adds raw lines to the equipment section
    pub fn equipment_lines(mut self, lines: &[&str]) -> Self {
        self.equipment_lines
            .extend(lines.iter().map(|line| line.to_string()));
        self
    }

    pub fn equipment_page(mut self, page: usize) -> Self {
        self.equipment_page = page.max(1);
        self
    }

    pub fn usage_subtotal(mut self, amount: Money) -> Self {
        self.usage_subtotal = Some(amount);
        self
    }

    /// Adds a raw line to the usage section
    pub fn usage_line(mut self, line: impl Into<String>) -> Self {
        self.usage_lines.push(line.into());
        self
    }

    /// Sum of every rendered subtotal
    fn computed_total(&self) -> Money {
        [
            self.voice.map(|(_, amount)| amount),
            self.wearables.map(|(_, amount)| amount),
            self.connected.map(|(_, amount)| amount),
            self.netflix,
            self.equipment_subtotal,
            self.usage_subtotal,
        ]
        .into_iter()
        .flatten()
        .sum()
    }

    /// Builds the page texts
    pub fn build_pages(&self) -> Vec<String> {
        let mut first = String::new();
        if let Some(date) = &self.issue_date {
            first.push_str(&format!("Bill issue date {date}\n"));
        }
        if let Some(date) = &self.due_date {
            first.push_str(&format!("Your bill is due by {date}.\n"));
        }
        if self.total_due.is_empty() {
            first.push_str(&format!("TOTAL DUE {}\n", self.computed_total()));
        }
        for total in &self.total_due {
            first.push_str(&format!("TOTAL DUE {total}\n"));
        }

        let mut banner = Vec::new();
        if let Some((count, amount)) = self.voice {
            banner.push(format!("{count} VOICE LINES = {amount}"));
        }
        if let Some((count, amount)) = self.wearables {
            banner.push(format!("{count} WEARABLES = {amount}"));
        }
        if let Some((count, amount)) = self.connected {
            banner.push(format!("{count} CONNECTED DEVICES = {amount}"));
        }
        if !banner.is_empty() {
            first.push_str("\nPLANS\n");
            first.push_str(&banner.join(" | "));
            first.push('\n');
        }
        if let Some((start, end)) = &self.bill_period {
            first.push_str(&format!("Regular charges bill period {start} - {end}\n"));
        }

        let mut second = String::new();
        if !self.summary_rows.is_empty() {
            second.push_str("THIS BILL SUMMARY\n");
        }
        for row in &self.summary_rows {
            second.push_str(row);
            second.push('\n');
        }
        if let Some(amount) = self.netflix {
            second.push_str(&format!("SERVICES {amount}\nNetflix Premium add-on {amount}\n"));
        }

        let mut detail = String::new();
        if let Some(subtotal) = self.equipment_subtotal {
            detail.push_str(&format!("EQUIPMENT {subtotal}\n"));
            for line in &self.equipment_lines {
                detail.push_str(line);
                detail.push('\n');
            }
        }
        if self.usage_subtotal.is_some() || !self.usage_lines.is_empty() {
            match self.usage_subtotal {
                Some(amount) => detail.push_str(&format!("CHARGED USAGE {amount}\n")),
                None => detail.push_str("CHARGED USAGE\n"),
            }
            for line in &self.usage_lines {
                detail.push_str(line);
                detail.push('\n');
            }
            detail.push_str("TAXES & FEES\n");
        }

        let mut pages = vec![first, second];
        while pages.len() + 1 < self.equipment_page {
            pages.push(format!("Page {}\n", pages.len() + 1));
        }
        if self.equipment_page <= pages.len() {
            let page = &mut pages[self.equipment_page - 1];
            page.push('\n');
            page.push_str(&detail);
        } else {
            pages.push(detail);
        }
        pages
    }

    /// Builds a form-feed separated text dump
    pub fn build_text(&self) -> String {
        self.build_pages().join(&PAGE_SEPARATOR.to_string())
    }

    pub fn build_document(&self) -> BillDocument {
        BillDocument::from_pages(self.build_pages())
    }
}

/// Renders ten digits the way the bill prints them
pub fn render_phone(number: &str) -> String {
    PhoneNumber::parse(number)
        .map(|phone| phone.formatted())
        .unwrap_or_else(|_| number.to_string())
}

/// Builder for family configurations
pub struct FamilyConfigBuilder {
    families: Vec<Family>,
    priority: Option<FamilyId>,
    plan_split: PlanSplit,
}

impl Default for FamilyConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FamilyConfigBuilder {
    pub fn new() -> Self {
        Self {
            families: Vec::new(),
            priority: None,
            plan_split: PlanSplit::default(),
        }
    }

    /// Adds a family with the given number of adults
    pub fn family(mut self, code: &str, adults: u32) -> Self {
        self.families.push(Family {
            id: FamilyId::new(code).unwrap(),
            name: code.to_string(),
            adults,
            devices: Vec::new(),
        });
        self
    }

    /// Adds a device to a family added earlier
    pub fn device(mut self, code: &str, number: &str, kind: DeviceKind) -> Self {
        let id = FamilyId::new(code).unwrap();
        let device = Device::new(PhoneNumber::parse(number).unwrap(), kind);
        match self.families.iter_mut().find(|f| f.id == id) {
            Some(family) => family.devices.push(device),
            None => panic!("family {code} must be added before its devices"),
        }
        self
    }

    pub fn voice(self, code: &str, number: &str) -> Self {
        self.device(code, number, DeviceKind::Voice)
    }

    pub fn wearable(self, code: &str, number: &str) -> Self {
        self.device(code, number, DeviceKind::Wearable)
    }

    pub fn connected(self, code: &str, number: &str) -> Self {
        self.device(code, number, DeviceKind::Connected)
    }

    /// Sets the tie-break family; defaults to the first family
    pub fn priority(mut self, code: &str) -> Self {
        self.priority = Some(FamilyId::new(code).unwrap());
        self
    }

    pub fn plan_split(mut self, plan_split: PlanSplit) -> Self {
        self.plan_split = plan_split;
        self
    }

    pub fn try_build(self) -> Result<FamilyConfig, AllocationError> {
        let priority = self
            .priority
            .or_else(|| self.families.first().map(|f| f.id.clone()))
            .unwrap_or_else(|| FamilyId::new("NONE").unwrap());
        FamilyConfig::new(self.families, priority, self.plan_split)
    }

    pub fn build(self) -> FamilyConfig {
        self.try_build().unwrap()
    }
}

/// Builder for extracted bill totals
pub struct BillTotalsBuilder {
    totals: BillTotals,
    total_due: Option<Money>,
}

impl Default for BillTotalsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BillTotalsBuilder {
    /// Creates empty totals for the cycle due Mar 24, 2025
    pub fn new() -> Self {
        let due = NaiveDate::from_ymd_opt(2025, 3, 24).unwrap();
        Self {
            totals: BillTotals {
                cycle: BillingCycle::ending_on(due),
                total_due: Money::zero(),
                voice_subtotal: Money::zero(),
                wearable_subtotal: Money::zero(),
                connected_subtotal: Money::zero(),
                netflix_subtotal: Money::zero(),
                equipment_subtotal: Money::zero(),
                usage_subtotal: Money::zero(),
                reported_voice_lines: 0,
                voice_lines: Vec::new(),
                equipment: BTreeMap::new(),
                equipment_entries: Vec::new(),
                equipment_fidelity: EquipmentFidelity::Absent,
                usage: Vec::new(),
                warnings: Vec::new(),
            },
            total_due: None,
        }
    }

    pub fn due_date(mut self, due: NaiveDate) -> Self {
        self.totals.cycle = BillingCycle::ending_on(due);
        self
    }

    /// Sets the voice subtotal and the line count printed with it
    pub fn voice(mut self, subtotal: Money, reported_lines: u32) -> Self {
        self.totals.voice_subtotal = subtotal;
        self.totals.reported_voice_lines = reported_lines;
        self
    }

    pub fn voice_line(mut self, number: &str) -> Self {
        self.totals.voice_lines.push(VoiceLineRecord {
            phone: PhoneNumber::parse(number).unwrap(),
            plan: Some("$26.00".to_string()),
            description: None,
            exclusion: None,
        });
        self
    }

    pub fn transferred_line(mut self, number: &str) -> Self {
        self.totals.voice_lines.push(VoiceLineRecord {
            phone: PhoneNumber::parse(number).unwrap(),
            plan: None,
            description: Some("Old number".to_string()),
            exclusion: Some(ExclusionReason::Transferred),
        });
        self
    }

    pub fn wearable(mut self, subtotal: Money) -> Self {
        self.totals.wearable_subtotal = subtotal;
        self
    }

    pub fn connected(mut self, subtotal: Money) -> Self {
        self.totals.connected_subtotal = subtotal;
        self
    }

    pub fn netflix(mut self, subtotal: Money) -> Self {
        self.totals.netflix_subtotal = subtotal;
        self
    }

    /// Adds an equipment entry; entries for one device are netted
    pub fn equipment(mut self, number: &str, amount: Money) -> Self {
        let device = DeviceId::new(number).unwrap();
        *self.totals.equipment.entry(device.clone()).or_default() += amount;
        self.totals.equipment_entries.push(EquipmentEntry { device, amount });
        self.totals.equipment_subtotal += amount;
        self.totals.equipment_fidelity = EquipmentFidelity::Detailed;
        self
    }

    /// Adds a usage charge; charges for one number are summed
    pub fn usage(mut self, number: &str, amount: Money) -> Self {
        let phone = PhoneNumber::parse(number).unwrap();
        match self.totals.usage.iter_mut().find(|c| c.phone == phone) {
            Some(charge) => charge.amount += amount,
            None => self.totals.usage.push(UsageCharge { phone, amount }),
        }
        self.totals.usage_subtotal += amount;
        self
    }

    /// Sets the total due; defaults to the sum of the subtotals
    pub fn total_due(mut self, amount: Money) -> Self {
        self.total_due = Some(amount);
        self
    }

    pub fn build(mut self) -> BillTotals {
        self.totals.total_due = self.total_due.unwrap_or_else(|| {
            self.totals.voice_subtotal
                + self.totals.wearable_subtotal
                + self.totals.connected_subtotal
                + self.totals.netflix_subtotal
                + self.totals.equipment_total()
                + self.totals.usage_total()
        });
        self.totals
    }
}
