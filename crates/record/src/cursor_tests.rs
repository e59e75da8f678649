use super::*;

#[test]
fn reads_little_endian_integers_in_sequence() {
    let bytes = [
        0x05, 0x00, // u16
        0x11, 0x00, 0x00, 0x00, // u32
        0xda, 0xa0, 0xfc, 0x93, 0xfc, 0xce, 0xdb, 0x01, // u64
    ];
    let mut r = ByteReader::new(&bytes);

    assert_eq!(r.get_u16(), Ok(5));
    assert_eq!(r.get_u32(), Ok(0x11));
    assert_eq!(r.get_u64(), Ok(0x01db_cefc_93fc_a0da));
    assert_eq!(r.remaining(), 0);
    assert_eq!(r.position(), bytes.len());
}

#[test]
fn empty_reader_reports_exhausted_not_short() {
    let mut r = ByteReader::new(&[]);
    assert_eq!(r.get_u16(), Err(CursorError::Exhausted));
    assert_eq!(r.get_u32(), Err(CursorError::Exhausted));
    assert_eq!(r.get_u64(), Err(CursorError::Exhausted));
}

#[test]
fn short_read_fails_without_advancing() {
    let bytes = [1u8, 2, 3];
    let mut r = ByteReader::new(&bytes);

    assert_eq!(
        r.get_u32(),
        Err(CursorError::Short {
            needed: 4,
            remaining: 3
        })
    );
    assert_eq!(r.position(), 0, "failed read must not move the cursor");

    // A narrower read still succeeds afterwards.
    assert_eq!(r.get_u16(), Ok(0x0201));
    assert_eq!(r.rest(), &[3]);
}

#[test]
fn writer_emits_little_endian_and_tracks_length() {
    let mut buf = [0xffu8; 14];
    let mut w = ByteWriter::new(&mut buf);

    w.put_u16(0x0102).unwrap();
    w.put_u32(0x0304_0506).unwrap();
    w.put_u64(0x0708).unwrap();
    assert_eq!(w.written(), 14);
    assert_eq!(w.remaining(), 0);

    assert_eq!(
        buf,
        [2, 1, 6, 5, 4, 3, 8, 7, 0, 0, 0, 0, 0, 0],
        "integers should be written least significant byte first"
    );
}

#[test]
fn writer_refuses_overflow_and_leaves_buffer_untouched() {
    let mut buf = [0xaau8; 6];
    let mut w = ByteWriter::new(&mut buf);

    w.put_u32(0).unwrap();
    assert_eq!(
        w.put_u64(u64::MAX),
        Err(CursorError::Short {
            needed: 8,
            remaining: 2
        })
    );
    assert_eq!(w.written(), 4);
    assert_eq!(buf[4..], [0xaa, 0xaa]);
}

#[test]
fn pad_to_rounds_up_to_alignment() {
    let cases: &[(usize, usize)] = &[(0, 0), (1, 4), (2, 4), (4, 4), (5, 8), (7, 8)];

    for &(len, expected) in cases {
        let mut buf = [0xffu8; 8];
        let mut w = ByteWriter::new(&mut buf);
        w.put_bytes(&vec![1u8; len]).unwrap();
        w.pad_to(4).unwrap();

        assert_eq!(w.written(), expected, "len {len} should pad to {expected}");
        assert!(buf[len..expected].iter().all(|&b| b == 0));
    }
}

#[test]
fn pad_to_fails_when_padding_does_not_fit() {
    let mut buf = [0u8; 5];
    let mut w = ByteWriter::new(&mut buf);
    w.put_bytes(&[1, 2, 3, 4, 5]).unwrap();

    assert!(w.pad_to(4).is_err());
}
