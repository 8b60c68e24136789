use super::*;
use rust_decimal_macros::dec;

#[test]
fn test_default_tolerance() {
    assert_eq!(Materiality::default().tolerance, dec!(0.01));
}

#[test]
fn test_below_tolerance_is_zero() {
    let materiality = Materiality::default();
    assert!(materiality.is_zero(dec!(0.005)));
    assert!(materiality.is_zero(dec!(-0.009)));
    assert!(materiality.is_zero(Decimal::ZERO));
}

#[test]
fn test_at_tolerance_is_material() {
    let materiality = Materiality::default();
    assert!(materiality.is_material(dec!(0.01)));
    assert!(materiality.is_material(dec!(-0.01)));
    assert!(materiality.is_material(dec!(1000.00)));
}

#[test]
fn test_agrees() {
    let materiality = Materiality::default();
    assert!(materiality.agrees(dec!(1000.00), dec!(1000.004)));
    assert!(!materiality.agrees(dec!(1000.00), dec!(1000.02)));
}

#[test]
fn test_negative_tolerance_is_normalized() {
    let materiality = Materiality::new(dec!(-0.05));
    assert_eq!(materiality.tolerance, dec!(0.05));
    assert!(materiality.is_zero(dec!(0.04)));
}

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(dec!(1000)), "1000.00");
    assert_eq!(format_amount(dec!(12.345)), "12.35");
    assert_eq!(format_amount(dec!(-12.345)), "-12.35");
    assert_eq!(format_amount(dec!(0.004)), "0.00");
}
