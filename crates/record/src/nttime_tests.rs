use std::time::Duration;

use super::*;

#[test]
fn epoch_boundaries() {
    assert_eq!(from_epoch(0), 116_444_736_000_000_000);
    assert_eq!(to_epoch(116_444_736_000_000_000), Some(0));
    assert_eq!(to_epoch(116_444_736_000_000_000 - 1), None);
    assert_eq!(to_epoch(0), None);
}

#[test]
fn to_epoch_inverts_from_epoch_between_1970_and_2100() {
    // 2100-01-01T00:00:00Z
    const END: i64 = 4_102_444_800;

    let mut t = 0i64;
    while t < END {
        assert_eq!(to_epoch(from_epoch(t)), Some(t), "t = {t}");
        t += 86_399 * 37;
    }
    assert_eq!(to_epoch(from_epoch(END - 1)), Some(END - 1));
}

#[test]
fn to_epoch_truncates_sub_second_ticks() {
    let base = from_epoch(1_000);
    assert_eq!(to_epoch(base + TICKS_PER_SECOND - 1), Some(1_000));
}

#[test]
fn from_epoch_clamps_before_1601() {
    assert_eq!(from_epoch(-(EPOCH_DIFFERENCE_SECS as i64)), 0);
    assert_eq!(from_epoch(i64::MIN), 0);
    assert_eq!(from_epoch(i64::MAX), u64::MAX);
}

#[test]
fn from_high_res_keeps_100ns_precision() {
    assert_eq!(from_high_res(0, 0), 116_444_736_000_000_000);
    assert_eq!(from_high_res(0, 199), 116_444_736_000_000_001);
    assert_eq!(from_high_res(1, 500), 116_444_736_010_000_005);
    assert_eq!(from_high_res(1, 500) / TICKS_PER_SECOND, from_epoch(1) / TICKS_PER_SECOND);
}

#[test]
fn from_system_time_matches_high_res_on_both_sides_of_epoch() {
    let after = UNIX_EPOCH + Duration::new(1_500_000_000, 123_456_700);
    assert_eq!(from_system_time(after), from_high_res(1_500_000_000, 123_456_700));

    let before = UNIX_EPOCH - Duration::from_secs(10);
    assert_eq!(from_system_time(before), from_epoch(-10));
}

#[test]
fn format_renders_infinity_symbolically() {
    assert_eq!(format(NTTIME_INFINITY), "+∞");
}

#[test]
fn format_reports_pre_1970_as_unrepresentable() {
    assert_eq!(format(0), "unrepresentable");
    assert_eq!(format(from_epoch(-1)), "unrepresentable");
}

#[test]
fn format_renders_dates_with_offset() {
    // 2025-05-27, far from any day boundary in every zone offset
    let s = format(0x01db_cefc_93fc_a0da);
    assert!(s.starts_with("2025-05-2"), "unexpected rendering {s}");
    assert_eq!(s.len(), "2025-05-27 11:43:34 +0000".len());
}
