//! Unit tests for the Money module
//!
//! Tests cover parsing bill amounts, arithmetic, cent rounding and
//! the tolerance comparisons used by reconciliation.

use core_kernel::{Money, MoneyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_keeps_full_precision() {
        let m = Money::new(dec!(86.666666666666666666));
        assert_eq!(m.amount(), dec!(86.666666666666666666));
    }

    #[test]
    fn test_from_cents_converts_correctly() {
        let m = Money::from_cents(26000);
        assert_eq!(m.amount(), dec!(260.00));
    }

    #[test]
    fn test_zero_is_default() {
        assert_eq!(Money::zero(), Money::default());
        assert!(Money::zero().is_zero());
    }
}

mod predicates {
    use super::*;

    #[test]
    fn test_sign_predicates() {
        assert!(Money::new(dec!(37.30)).is_positive());
        assert!(Money::new(dec!(-3.96)).is_negative());
        assert!(!Money::zero().is_positive());
        assert!(!Money::zero().is_negative());
    }

    #[test]
    fn test_within_tolerance() {
        let a = Money::new(dec!(411.59));
        let b = Money::new(dec!(411.58));
        assert!(a.within(&b, Money::CENT));
        assert!(!a.within(&Money::new(dec!(411.57)), Money::CENT));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_installment_and_credit_net() {
        let installment = Money::new(dec!(37.30));
        let credit = Money::new(dec!(-3.96));
        assert_eq!(installment + credit, Money::new(dec!(33.34)));
    }

    #[test]
    fn test_sum_of_iterator() {
        let amounts = vec![
            Money::new(dec!(33.34)),
            Money::new(dec!(26.25)),
            Money::zero(),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::new(dec!(59.59)));
    }

    #[test]
    fn test_per_line_rate_times_count() {
        let rate = Money::new(dec!(260.00)).divide(dec!(10)).unwrap();
        assert_eq!(rate, Money::new(dec!(26.00)));
        assert_eq!(rate * dec!(3), Money::new(dec!(78.00)));
    }

    #[test]
    fn test_divide_by_zero_is_an_error() {
        let result = Money::new(dec!(260.00)).divide(Decimal::ZERO);
        assert_eq!(result, Err(MoneyError::DivisionByZero));
    }

    #[test]
    fn test_exact_thirds_round_up() {
        let share = Money::new(dec!(260.00)).divide(dec!(3)).unwrap();
        assert_eq!(share.round_to_cents(), Money::new(dec!(86.67)));
        assert_eq!(share.round_to_cents().to_cents() * 3, 26001);
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_parse_rejects_text() {
        assert!(matches!(
            Money::parse("Included"),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_from_str() {
        let m: Money = "$18.00".parse().unwrap();
        assert_eq!(m, Money::new(dec!(18)));
    }
}
