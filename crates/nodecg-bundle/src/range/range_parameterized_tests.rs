#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

fn version(s: &str) -> Version {
    Version::parse(s).unwrap()
}

// ============================================================================
// Parsing
// ============================================================================

#[test_case("~0.7.0")]
#[test_case("^1.2.3")]
#[test_case(">=0.7.0 <0.9.0")]
#[test_case(">= 0.7.0 < 0.9.0")]
#[test_case(">=1.0.0, <2.0.0")]
#[test_case("1.2.3 - 2.0.0")]
#[test_case("0.7.* || 0.8.*")]
#[test_case("*")]
#[test_case("v1.2.3")]
fn CompatibleRange___parse___accepts_npm_syntax(raw: &str) {
    let range = CompatibleRange::parse(raw);

    assert!(range.is_ok(), "{raw} should parse: {range:?}");
}

#[test_case("")]
#[test_case("   ")]
#[test_case("not a range")]
#[test_case(">=")]
#[test_case("1.2.3 - ")]
#[test_case("~0.7.0 || banana")]
fn CompatibleRange___parse___rejects_invalid(raw: &str) {
    let range = CompatibleRange::parse(raw);

    assert!(range.is_err(), "{raw} should not parse");
}

// ============================================================================
// Matching
// ============================================================================

#[test_case("~0.7.0", "0.7.5", true)]
#[test_case("~0.7.0", "0.8.0", false)]
#[test_case(">=0.7.0 <0.9.0", "0.8.2", true)]
#[test_case(">=0.7.0 <0.9.0", "0.9.0", false)]
#[test_case("1.2.3 - 2.0.0", "2.0.0", true)]
#[test_case("1.2.3 - 2.0.0", "1.2.2", false)]
#[test_case("0.7.* || 0.8.*", "0.8.4", true)]
#[test_case("0.7.* || 0.8.*", "0.6.0", false)]
#[test_case("1.2.3", "1.2.3", true)]
#[test_case("1.2.3", "1.2.4", false)]
fn CompatibleRange___matches___follows_npm_semantics(raw: &str, candidate: &str, expected: bool) {
    let range = CompatibleRange::parse(raw).unwrap();

    assert_eq!(range.matches(&version(candidate)), expected);
}

#[test]
fn CompatibleRange___display___preserves_declared_text() {
    let range: CompatibleRange = ">= 0.7.0  < 0.9.0".parse().unwrap();

    assert_eq!(range.to_string(), ">= 0.7.0  < 0.9.0");
    assert_eq!(range.as_str(), ">= 0.7.0  < 0.9.0");
}

#[test]
fn CompatibleRange___serialize___writes_declared_text() {
    let range = CompatibleRange::parse("~0.7.0").unwrap();

    let json = serde_json::to_string(&range).unwrap();

    assert_eq!(json, r#""~0.7.0""#);
}
