// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use proptest::prelude::*;

use crate::CodepointBuffer;

fn utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

const MIXED: &str = "This\r\na\r\nstring\n🌐 🍪 🍕 🚀\n يتكلّم \n हालाँकि प्रचलित रूप पूज 緳 踥踕";

#[test]
fn offset_maps_for_mixed_script() {
    let mut buf = CodepointBuffer::new();
    buf.append(&utf16(MIXED));
    for j in 0..buf.len() {
        let unit = buf.utf32_to_utf16(j).unwrap();
        assert_eq!(buf.utf16_to_utf32(unit), Some(j), "index {j}");
    }
    // "This\r\n": the CR and LF units both map to the first LF scalar.
    let lf = buf
        .scalars()
        .iter()
        .position(|&cp| cp == u32::from(b'\n'))
        .unwrap();
    assert_eq!(lf, 4);
    assert_eq!(buf.utf16_to_utf32(4), Some(lf));
    assert_eq!(buf.utf16_to_utf32(5), Some(lf));
}

#[test]
fn surrogate_collapse() {
    let mut buf = CodepointBuffer::new();
    buf.append(&utf16("A🌐B"));
    assert_eq!(buf.utf16_len(), 4);
    assert_eq!(buf.len(), 3);
    assert_eq!(
        (0..3).map(|j| buf.utf32_to_utf16(j).unwrap()).collect::<Vec<_>>(),
        vec![0, 1, 3]
    );
    assert_eq!(
        (0..4).map(|i| buf.utf16_to_utf32(i).unwrap()).collect::<Vec<_>>(),
        vec![0, 1, 1, 2]
    );
}

#[test]
fn round_trip_without_cr() {
    let input = utf16("plain ascii and עברית and 🚀");
    let mut buf = CodepointBuffer::new();
    buf.append(&input);
    assert_eq!(buf.to_utf16(), input);
}

#[test]
fn round_trip_strips_cr_of_crlf() {
    let mut buf = CodepointBuffer::new();
    buf.append(&utf16("one\r\ntwo\r\nthree"));
    assert_eq!(buf.to_utf16(), utf16("one\ntwo\nthree"));
}

#[test]
fn maps_are_monotonic() {
    let mut buf = CodepointBuffer::new();
    buf.append(&utf16(MIXED));
    for w in (0..buf.len()).map(|j| buf.utf32_to_utf16(j).unwrap()).collect::<Vec<_>>().windows(2) {
        assert!(w[0] < w[1]);
    }
    for w in (0..buf.utf16_len())
        .map(|i| buf.utf16_to_utf32(i).unwrap())
        .collect::<Vec<_>>()
        .windows(2)
    {
        assert!(w[0] <= w[1]);
    }
}

proptest! {
    /// Invariant: `utf16_to_utf32(utf32_to_utf16(j)) == j` for arbitrary
    /// input, including lone surrogates, CRs and split appends.
    #[test]
    fn prop_round_map(units in proptest::collection::vec(any::<u16>(), 0..64), split in 0_usize..64) {
        let mut buf = CodepointBuffer::new();
        let split = split.min(units.len());
        buf.append(&units[..split]);
        buf.append(&units[split..]);
        for j in 0..buf.len() {
            let unit = buf.utf32_to_utf16(j).unwrap();
            prop_assert_eq!(buf.utf16_to_utf32(unit), Some(j));
        }
        prop_assert_eq!(buf.utf16_len(), units.len());
        for j in 1..buf.len() {
            prop_assert!(buf.utf32_to_utf16(j).unwrap() > buf.utf32_to_utf16(j - 1).unwrap());
        }
    }
}
