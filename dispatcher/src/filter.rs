//! Recipient filter
//!
//! Reduces a raw address list to the subset eligible for sending:
//! syntactically valid, not already contacted, not unsubscribed.
//! Invalid addresses are dropped with a warning rather than surfaced as
//! per-address errors.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

static ADDRESS_RE: OnceLock<Regex> = OnceLock::new();

fn address_re() -> &'static Regex {
    ADDRESS_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("address pattern is valid")
    })
}

/// Syntactic validity check for an email address
pub fn is_valid_address(address: &str) -> bool {
    address_re().is_match(address)
}

/// Addresses from `raw` that may be sent to, in input order
///
/// Duplicates in the input are not collapsed here; intra-run dedup falls
/// out of sent-set insertion in the dispatch loop.
pub fn eligible(
    raw: &[String],
    sent: &HashSet<String>,
    unsubscribed: &HashSet<String>,
) -> Vec<String> {
    raw.iter()
        .filter(|address| {
            let address = address.as_str();
            if !is_valid_address(address) {
                warn!("Invalid email format: {address}");
                return false;
            }
            !sent.contains(address) && !unsubscribed.contains(address)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_address("alice@example.com"));
        assert!(is_valid_address("a.b_c%d+e-f@sub.domain-x.co"));
        assert!(is_valid_address("UPPER@EXAMPLE.ORG"));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_address("not-an-email"));
        assert!(!is_valid_address("missing@tld"));
        assert!(!is_valid_address("@example.com"));
        assert!(!is_valid_address("alice@example.c"));
        assert!(!is_valid_address("alice@exa mple.com"));
        assert!(!is_valid_address(""));
    }

    #[test]
    fn test_eligible_excludes_sent_and_unsubscribed() {
        let raw = vec![
            "alice@example.com".to_string(),
            "bob@example.com".to_string(),
            "carol@example.com".to_string(),
            "not-an-email".to_string(),
        ];
        let sent: HashSet<String> = ["bob@example.com".to_string()].into();
        let unsubscribed: HashSet<String> = ["carol@example.com".to_string()].into();

        let result = eligible(&raw, &sent, &unsubscribed);
        assert_eq!(result, vec!["alice@example.com".to_string()]);
    }

    #[test]
    fn test_unsubscribed_wins_over_sent_status() {
        let raw = vec!["dave@example.com".to_string()];
        let sent = HashSet::new();
        let unsubscribed: HashSet<String> = ["dave@example.com".to_string()].into();

        assert!(eligible(&raw, &sent, &unsubscribed).is_empty());
    }

    #[test]
    fn test_input_order_preserved_and_duplicates_pass_through() {
        let raw = vec![
            "b@example.com".to_string(),
            "a@example.com".to_string(),
            "b@example.com".to_string(),
        ];
        let result = eligible(&raw, &HashSet::new(), &HashSet::new());
        assert_eq!(
            result,
            vec![
                "b@example.com".to_string(),
                "a@example.com".to_string(),
                "b@example.com".to_string()
            ]
        );
    }
}
