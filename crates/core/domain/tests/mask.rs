use domain::Mask;

#[test]
fn contains_requires_every_bit() {
    let mask = Mask::from(0b110);
    assert!(mask.contains(&Mask::from(0b100)));
    assert!(mask.contains(&Mask::from(0b110)));
    assert!(!mask.contains(&Mask::from(0b101)));
    assert!(mask.contains(&Mask::zero()));
}

#[test]
fn wide_bits_survive() {
    let high = Mask::bit(100);
    let mask = high.union(&Mask::bit(1));
    assert!(mask.contains(&high));
    assert_eq!(mask.bit_len(), 101);
    assert_eq!(mask.intersection(&Mask::bit(1)), Mask::bit(1));
}

#[test]
fn low_bits_covers_width() {
    assert_eq!(Mask::low_bits(3), Mask::from(0b111));
    assert!(Mask::low_bits(128).contains(&Mask::bit(127)));
    assert!(!Mask::low_bits(128).contains(&Mask::bit(128)));
}

#[test]
fn parse_decimal_and_hex() {
    let decimal: Mask = "340282366920938463463374607431768211455".parse().expect("parse");
    assert_eq!(decimal, Mask::low_bits(128));
    let hex: Mask = "0xff".parse().expect("parse hex");
    assert_eq!(hex, Mask::from(255));
    assert!("not-a-number".parse::<Mask>().is_err());
}

#[test]
fn serializes_as_decimal_string() {
    let value = serde_json::to_value(Mask::bit(70)).expect("serialize");
    assert_eq!(value, serde_json::json!("1180591620717411303424"));

    let from_text: Mask = serde_json::from_str("\"6\"").expect("text");
    let from_number: Mask = serde_json::from_str("6").expect("number");
    assert_eq!(from_text, from_number);
}

#[test]
fn collect_unions_masks() {
    let mask: Mask = vec![Mask::bit(0), Mask::bit(2), Mask::bit(0)].into_iter().collect();
    assert_eq!(mask, Mask::from(0b101));
}
