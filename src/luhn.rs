//! Card-number normalization, the Luhn mod-10 checksum, and brand
//! classification by IIN prefix.

/// Card network inferred from the leading digits of a normalized number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Jcb,
    Diners,
    Unknown,
}

/// Strips spaces and dashes from `raw`.
pub fn clean(raw: &str) -> String {
    raw.chars().filter(|c| *c != ' ' && *c != '-').collect()
}

/// `true` iff `raw`, after [`clean`], is 13-19 digits and passes the Luhn
/// checksum. Equivalent to calling [`clean`] first: `luhn_valid(clean(n)) == luhn_valid(n)`.
pub fn luhn_valid(raw: &str) -> bool {
    let cleaned = clean(raw);
    if !(13..=19).contains(&cleaned.len()) {
        return false;
    }
    if !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let mut sum = 0u32;
    let mut double = false;
    for c in cleaned.chars().rev() {
        let mut digit = c.to_digit(10).unwrap();
        if double {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        double = !double;
    }
    sum % 10 == 0
}

/// Classifies a (cleaned) card number's network by IIN prefix.
pub fn classify_brand(raw: &str) -> CardBrand {
    let cleaned = clean(raw);
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return CardBrand::Unknown;
    }

    let prefix2: u32 = cleaned.get(0..2).and_then(|s| s.parse().ok()).unwrap_or(0);
    let prefix1: u32 = cleaned.get(0..1).and_then(|s| s.parse().ok()).unwrap_or(0);

    if prefix1 == 4 {
        CardBrand::Visa
    } else if (51..=55).contains(&prefix2) {
        CardBrand::Mastercard
    } else if prefix2 == 34 || prefix2 == 37 {
        CardBrand::Amex
    } else if prefix2 == 60 || prefix2 == 65 {
        CardBrand::Discover
    } else if prefix2 == 35 {
        CardBrand::Jcb
    } else if prefix2 == 36 || prefix2 == 38 {
        CardBrand::Diners
    } else {
        CardBrand::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visa_test_number_passes() {
        assert!(luhn_valid("4111111111111111"));
    }

    #[test]
    fn mutated_visa_number_fails() {
        assert!(!luhn_valid("4111111111111112"));
    }

    #[test]
    fn spaces_and_dashes_are_ignored() {
        assert_eq!(
            luhn_valid("4111-1111-1111-1111"),
            luhn_valid("4111111111111111")
        );
        assert_eq!(
            luhn_valid("4111 1111 1111 1111"),
            luhn_valid("4111111111111111")
        );
    }

    #[test]
    fn wrong_length_or_non_digit_is_invalid() {
        assert!(!luhn_valid("411111111111")); // 12 digits
        assert!(!luhn_valid("4111111111111111a"));
    }

    #[test]
    fn brand_classification() {
        assert_eq!(classify_brand("4111111111111111"), CardBrand::Visa);
        assert_eq!(classify_brand("5500000000000004"), CardBrand::Mastercard);
        assert_eq!(classify_brand("340000000000009"), CardBrand::Amex);
        assert_eq!(classify_brand("6011000000000004"), CardBrand::Discover);
        assert_eq!(classify_brand("9999999999999999"), CardBrand::Unknown);
    }
}
