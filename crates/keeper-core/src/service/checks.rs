//! Input checks applied before anything is encrypted or stored.
//!
//! Every failure is `InvalidArgument` with a message naming the field, never
//! the rejected value.

use keeper_types::error::VaultError;
use keeper_types::item::{Card, MAX_NAME_LEN};

/// Shortest and longest accepted card numbers (ISO/IEC 7812).
const CARD_DIGITS_MIN: usize = 12;
const CARD_DIGITS_MAX: usize = 19;

/// CVV/CVC values with 3 or 4 digits.
const CVV_RANGE: std::ops::RangeInclusive<u16> = 100..=9999;

/// Item names are 1 to 50 characters after trimming.
pub fn validate_name(name: &str) -> Result<(), VaultError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(VaultError::InvalidArgument("name must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(VaultError::InvalidArgument(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    if trimmed.len() != name.len() {
        return Err(VaultError::InvalidArgument(
            "name must not have leading or trailing whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Check every field of a card before it is sealed.
pub fn validate_card(card: &Card) -> Result<(), VaultError> {
    validate_name(&card.name)?;
    validate_card_number(&card.number)?;
    validate_expiry(&card.expiry)?;
    if !CVV_RANGE.contains(&card.cvv) {
        return Err(VaultError::InvalidArgument("cvv must be 3 or 4 digits".to_string()));
    }
    if card.holder.trim().is_empty() {
        return Err(VaultError::InvalidArgument("holder must not be empty".to_string()));
    }
    Ok(())
}

/// Spaces and dashes are allowed as separators; what remains must be 12 to 19
/// digits passing the Luhn checksum.
pub fn validate_card_number(number: &str) -> Result<(), VaultError> {
    let digits: Vec<u32> = number
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()
        .ok_or_else(|| VaultError::InvalidArgument("card number must be numeric".to_string()))?;

    if !(CARD_DIGITS_MIN..=CARD_DIGITS_MAX).contains(&digits.len()) {
        return Err(VaultError::InvalidArgument(format!(
            "card number must have {CARD_DIGITS_MIN} to {CARD_DIGITS_MAX} digits"
        )));
    }
    if !luhn(&digits) {
        return Err(VaultError::InvalidArgument(
            "card number fails checksum".to_string(),
        ));
    }
    Ok(())
}

/// `MM/YY` with month 01..=12 and year 22..=99.
pub fn validate_expiry(expiry: &str) -> Result<(), VaultError> {
    let invalid = || VaultError::InvalidArgument("expiry must be MM/YY".to_string());

    let (month, year) = expiry.split_once('/').ok_or_else(invalid)?;
    if month.len() != 2 || year.len() != 2 {
        return Err(invalid());
    }
    if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let month: u8 = month.parse().map_err(|_| invalid())?;
    let year: u8 = year.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) || year < 22 {
        return Err(invalid());
    }
    Ok(())
}

fn luhn(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Card {
        Card {
            name: "visa".into(),
            number: "4111111111111111".into(),
            holder: "A. Smith".into(),
            expiry: "12/29".into(),
            cvv: 123,
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("email").is_ok());
        assert!(validate_name(&"n".repeat(50)).is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"n".repeat(51)).is_err());
        assert!(validate_name(" padded").is_err());
    }

    #[test]
    fn test_card_number_luhn() {
        assert!(validate_card_number("4111111111111111").is_ok());
        assert!(validate_card_number("4111 1111 1111 1111").is_ok());
        assert!(validate_card_number("4111-1111-1111-1111").is_ok());
        assert!(validate_card_number("5500005555555559").is_ok());

        assert!(validate_card_number("4111111111111112").is_err());
        assert!(validate_card_number("4111x11111111111").is_err());
        assert!(validate_card_number("42").is_err());
        assert!(validate_card_number(&"0".repeat(20)).is_err());
        assert!(validate_card_number("").is_err());
    }

    #[test]
    fn test_expiry() {
        assert!(validate_expiry("01/22").is_ok());
        assert!(validate_expiry("12/99").is_ok());

        assert!(validate_expiry("00/25").is_err());
        assert!(validate_expiry("13/25").is_err());
        assert!(validate_expiry("12/21").is_err());
        assert!(validate_expiry("1/25").is_err());
        assert!(validate_expiry("12-25").is_err());
        assert!(validate_expiry("12/2025").is_err());
        assert!(validate_expiry("+1/25").is_err());
    }

    #[test]
    fn test_validate_card() {
        assert!(validate_card(&card()).is_ok());

        for cvv in [0, 7, 42, 99, 10_000] {
            let mut c = card();
            c.cvv = cvv;
            assert!(
                matches!(validate_card(&c), Err(VaultError::InvalidArgument(_))),
                "cvv {cvv}"
            );
        }
        for cvv in [100, 999, 1234, 9999] {
            let mut c = card();
            c.cvv = cvv;
            assert!(validate_card(&c).is_ok(), "cvv {cvv}");
        }

        let mut c = card();
        c.holder = " ".into();
        assert!(validate_card(&c).is_err());

        let mut c = card();
        c.expiry = "13/30".into();
        assert!(validate_card(&c).is_err());
    }

    #[test]
    fn test_error_message_omits_value() {
        let err = validate_card_number("4111111111111112").unwrap_err();
        assert!(!err.to_string().contains("4111111111111112"));
    }
}
