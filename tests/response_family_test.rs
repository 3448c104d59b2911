//! Integration tests for response family classification.

use probe_core::http::{family_of, is_2xx, is_4xx, is_5xx, matches_code_or_range, ResponseFamily};

#[test]
fn families_by_leading_digit() {
    assert_eq!(family_of(404).as_str(), "4xx");
    assert_eq!(family_of(200).as_str(), "2xx");
    assert_eq!(family_of(101), ResponseFamily::Informational);
    assert_eq!(family_of(302), ResponseFamily::Redirection);
    assert_eq!(family_of(503), ResponseFamily::ServerError);
}

#[test]
fn out_of_range_codes_fall_back_to_zero() {
    assert_eq!(family_of(999).as_str(), "0xx");
    assert_eq!(family_of(0), ResponseFamily::Zero);
    assert_eq!(family_of(42), ResponseFamily::Zero);
    assert_eq!(ResponseFamily::of_code("teapot"), ResponseFamily::Zero);
}

#[test]
fn predicates() {
    assert!(is_2xx(204));
    assert!(is_4xx(422));
    assert!(is_5xx(500));
    assert!(!is_4xx(500));
    assert!(!is_2xx(999));
}

#[test]
fn every_code_maps_to_exactly_one_family() {
    for status in 0..=u16::MAX {
        let family = family_of(status);
        let flags = [family.is_2xx(), family.is_4xx(), family.is_5xx()];
        assert!(flags.iter().filter(|f| **f).count() <= 1);
        if (100..600).contains(&status) {
            assert_eq!(family.leading_digit(), char::from(b'0' + (status / 100) as u8));
        } else {
            assert_eq!(family, ResponseFamily::Zero);
        }
    }
}

#[test]
fn display_and_serde_use_the_family_name() {
    assert_eq!(ResponseFamily::ClientError.to_string(), "4xx");
    assert_eq!(serde_json::to_string(&ResponseFamily::ServerError).unwrap(), "\"5xx\"");
    let parsed: ResponseFamily = serde_json::from_str("\"2xx\"").unwrap();
    assert_eq!(parsed, ResponseFamily::Success);
}

#[test]
fn codes_match_ranges() {
    assert!(matches_code_or_range("406", "4XX"));
    assert!(matches_code_or_range("2xx", "201"));
    assert!(!matches_code_or_range("406", "400"));
    assert!(!matches_code_or_range("5XX", "4XX"));
}
