use super::*;

#[test]
fn table_covers_each_low_bit_once() {
    assert_eq!(ATTRIBUTE_TABLE.len(), 16);

    let mut seen = AttributeFlags::empty();
    for (i, a) in ATTRIBUTE_TABLE.iter().enumerate() {
        assert_eq!(a.flag.bits(), 1 << i, "entry {i} ({}) out of order", a.code);
        assert!(!seen.intersects(a.flag));
        seen |= a.flag;
    }
    assert_eq!(seen, AttributeFlags::all());
}

#[test]
fn to_chars_uses_canonical_order() {
    let cases: &[(u32, &str)] = &[
        (0x0000, ""),
        (0x0001, "R"),
        (0x0003, "RH"),
        (0x0022, "HA"),
        (0x0011, "RD"),
        (0x8008, "vV"),
        (0xffff, "RHSvDAdNTsLCOIEV"),
    ];

    for &(bits, expected) in cases {
        let got = AttributeFlags::from_bits_retain(bits).to_chars();
        assert_eq!(got, expected, "bits 0x{bits:04x}");
    }
}

#[test]
fn to_chars_ignores_unnamed_high_bits() {
    let flags = AttributeFlags::from_bits_retain(0x0001_0020);
    assert_eq!(flags.to_chars(), "A");
    assert_eq!(flags.bits(), 0x0001_0020, "unnamed bits must be retained");
}

#[test]
fn from_chars_accepts_any_order_and_repeats() {
    let cases: &[(&str, u32)] = &[
        ("RH", 0x0003),
        ("HR", 0x0003),
        ("AAA", 0x0020),
        ("D", 0x0010),
        ("vdsV", 0x8248),
    ];

    for &(input, expected) in cases {
        let got = AttributeFlags::from_chars(input).expect("valid letters");
        assert_eq!(got.bits(), expected, "input {input:?}");
    }
}

#[test]
fn from_chars_is_case_sensitive() {
    assert_eq!(
        AttributeFlags::from_chars("v").unwrap(),
        AttributeFlags::VOLUME
    );
    assert_eq!(
        AttributeFlags::from_chars("V").unwrap(),
        AttributeFlags::INTEGRITY
    );
    assert_eq!(
        AttributeFlags::from_chars("r"),
        Err(FlagsError::InvalidAttributeLetter('r'))
    );
}

#[test]
fn from_chars_rejects_whole_string_on_unknown_letter() {
    assert_eq!(
        AttributeFlags::from_chars("X"),
        Err(FlagsError::InvalidAttributeLetter('X'))
    );
    assert_eq!(
        AttributeFlags::from_chars("RHX"),
        Err(FlagsError::InvalidAttributeLetter('X'))
    );
    assert_eq!(AttributeFlags::from_chars(""), Err(FlagsError::Empty));
}

#[test]
fn chars_round_trip_for_every_named_combination_sample() {
    for bits in [0x0001u32, 0x00a5, 0x1234, 0x7fff, 0xffff] {
        let flags = AttributeFlags::from_bits_retain(bits);
        let parsed = AttributeFlags::from_chars(&flags.to_chars()).unwrap();
        assert_eq!(parsed, flags);
    }
}

#[test]
fn describe_lists_set_bits() {
    let flags = AttributeFlags::HIDDEN | AttributeFlags::ARCHIVE;
    assert_eq!(
        flags.describe(),
        vec!["Hidden from directory listing", "Archive"]
    );
}

#[test]
fn keep_all_preserves_every_bit() {
    let flags = AttributeFlags::from_bits_retain(0xdead_beef);
    assert_eq!(flags & AttributeFlags::keep_all(), flags);
}
