//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{Money, PhoneNumber};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::render_phone;

/// Strategy for whole-cent amounts between one cent and `max_cents`
pub fn cents_strategy(max_cents: i64) -> impl Strategy<Value = Money> {
    (1i64..=max_cents).prop_map(Money::from_cents)
}

/// Strategy for amounts with up to six decimal places
///
/// Covers half-cent boundaries such as `$0.005` and `$12.345`.
pub fn precise_amount_strategy() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64, 0u32..=6u32).prop_map(|(m, s)| Money::new(Decimal::new(m, s)))
}

/// Strategy for adult counts of one to six families, at least one adult overall
pub fn adult_counts_strategy() -> impl Strategy<Value = Vec<u32>> {
    vec(0u32..=4u32, 1..=6).prop_filter("at least one adult", |counts| {
        counts.iter().sum::<u32>() > 0
    })
}

/// Strategy for `count` distinct ten-digit numbers
pub fn distinct_numbers_strategy(count: usize) -> impl Strategy<Value = Vec<String>> {
    btree_set(2_000_000_000u64..9_899_999_999u64, count)
        .prop_map(|numbers| numbers.into_iter().map(|n| n.to_string()).collect())
}

/// How a generated device paragraph states its net amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphLayout {
    /// Installment and credit lines closed by a standalone net line
    Standalone,
    /// One amount on the phone line
    Inline,
    /// Installment and credit lines with no closing net line
    Evidence,
}

/// A device paragraph of an equipment section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentParagraph {
    pub number: String,
    pub installment: Money,
    pub credit: Option<Money>,
    pub layout: ParagraphLayout,
}

impl EquipmentParagraph {
    /// Net amount the paragraph states
    pub fn net(&self) -> Money {
        match self.layout {
            ParagraphLayout::Inline => self.installment,
            _ => self.installment - self.credit.unwrap_or_default(),
        }
    }

    pub fn phone(&self) -> PhoneNumber {
        PhoneNumber::parse(&self.number).unwrap()
    }

    /// Renders the paragraph, blank line included
    pub fn render(&self) -> Vec<String> {
        let phone = render_phone(&self.number);
        let mut lines = Vec::new();
        match self.layout {
            ParagraphLayout::Inline => {
                lines.push(format!("{phone} Apple iPhone 15 {}", self.installment));
            }
            ParagraphLayout::Standalone | ParagraphLayout::Evidence => {
                lines.push(format!("{phone} Apple iPhone 15"));
                lines.push(format!("Installment 3 of 24 {}", self.installment));
                if let Some(credit) = self.credit {
                    lines.push(format!("Promotional credit {}", -credit));
                }
                if self.layout == ParagraphLayout::Standalone {
                    lines.push(self.net().to_string());
                }
            }
        }
        lines.push(String::new());
        lines
    }
}

fn layout_strategy() -> impl Strategy<Value = ParagraphLayout> {
    prop_oneof![
        Just(ParagraphLayout::Standalone),
        Just(ParagraphLayout::Inline),
        Just(ParagraphLayout::Evidence),
    ]
}

/// Strategy for an equipment section of one to six devices
pub fn equipment_section_strategy() -> impl Strategy<Value = Vec<EquipmentParagraph>> {
    (1usize..=6)
        .prop_flat_map(|count| {
            (
                distinct_numbers_strategy(count),
                vec(
                    (
                        cents_strategy(150_000),
                        proptest::option::of(cents_strategy(2_000)),
                        layout_strategy(),
                    ),
                    count,
                ),
            )
        })
        .prop_map(|(numbers, figures)| {
            numbers
                .into_iter()
                .zip(figures)
                .map(|(number, (installment, credit, layout))| EquipmentParagraph {
                    number,
                    installment,
                    credit,
                    layout,
                })
                .collect()
        })
}
