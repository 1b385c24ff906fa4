use crate::error::{AppError, Result};

/// Largest amount a single message may record.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// First whitespace-separated token made only of ASCII digits. Tokens above
/// `MAX_AMOUNT` are skipped.
pub fn parse_amount(text: &str) -> Result<i64> {
    text.split_whitespace()
        .filter(|token| token.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|token| token.parse::<i64>().ok())
        .find(|amount| *amount <= MAX_AMOUNT)
        .ok_or(AppError::ParseFailure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_after_description() {
        assert_eq!(parse_amount("Такси 1500").unwrap(), 1500);
    }

    #[test]
    fn test_first_numeric_token_wins() {
        assert_eq!(parse_amount("2 кофе 900").unwrap(), 2);
    }

    #[test]
    fn test_tokens_with_suffix_are_ignored() {
        assert_eq!(parse_amount("бургер 3000₸ 2500").unwrap(), 2500);
        assert!(matches!(parse_amount("бургер 3000₸"), Err(AppError::ParseFailure)));
        assert!(matches!(parse_amount("такси 12.50"), Err(AppError::ParseFailure)));
        assert!(matches!(parse_amount("минус -400"), Err(AppError::ParseFailure)));
    }

    #[test]
    fn test_zero_is_a_valid_amount() {
        assert_eq!(parse_amount("бесплатный кофе 0").unwrap(), 0);
    }

    #[test]
    fn test_no_amount() {
        assert!(matches!(parse_amount("просто текст"), Err(AppError::ParseFailure)));
        assert!(matches!(parse_amount(""), Err(AppError::ParseFailure)));
    }

    #[test]
    fn test_amount_cap() {
        assert_eq!(parse_amount("квартира 1000000000000").unwrap(), MAX_AMOUNT);
        assert!(matches!(
            parse_amount("такси 1000000000001"),
            Err(AppError::ParseFailure)
        ));
        assert!(matches!(
            parse_amount("такси 9223372036854775807"),
            Err(AppError::ParseFailure)
        ));
        assert_eq!(parse_amount("такси 9223372036854775807 1500").unwrap(), 1500);
    }

    #[test]
    fn test_overflowing_token_is_skipped() {
        assert_eq!(parse_amount("99999999999999999999999 500").unwrap(), 500);
    }
}
