use rust_decimal::Decimal;

use crate::error::CoreError;

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Status ID type matching SMALLINT lookup tables in the database.
pub type StatusId = i16;

/// Material quantities are fixed-point, stored as `NUMERIC(20, 6)`.
pub type Quantity = Decimal;

/// Number of fractional digits kept on every stored quantity.
pub const QUANTITY_SCALE: u32 = 6;

/// Round a quantity to [`QUANTITY_SCALE`] fractional digits.
pub fn round_quantity(quantity: Quantity) -> Quantity {
    quantity.round_dp(QUANTITY_SCALE)
}

/// Round `quantity` and require it to be strictly positive.
///
/// `field` names the input in the error message.
pub fn positive_quantity(quantity: Quantity, field: &str) -> Result<Quantity, CoreError> {
    let rounded = round_quantity(quantity);
    if rounded <= Decimal::ZERO {
        return Err(CoreError::InvalidNumber(format!(
            "{field} must be greater than zero, got {quantity}"
        )));
    }
    Ok(rounded)
}

/// Round `quantity` and require it to be zero or positive.
pub fn non_negative_quantity(quantity: Quantity, field: &str) -> Result<Quantity, CoreError> {
    let rounded = round_quantity(quantity);
    if rounded < Decimal::ZERO {
        return Err(CoreError::InvalidNumber(format!(
            "{field} must not be negative, got {quantity}"
        )));
    }
    Ok(rounded)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn rounding_keeps_six_fractional_digits() {
        assert_eq!(round_quantity(dec!(1.23456789)), dec!(1.234568));
        assert_eq!(round_quantity(dec!(10)), dec!(10));
    }

    #[test]
    fn positive_quantity_rejects_zero_and_negative() {
        assert_matches!(
            positive_quantity(dec!(0), "quantity"),
            Err(CoreError::InvalidNumber(_))
        );
        assert_matches!(
            positive_quantity(dec!(-1), "quantity"),
            Err(CoreError::InvalidNumber(_))
        );
        // Rounds to zero at the stored scale.
        assert_matches!(
            positive_quantity(dec!(0.0000001), "quantity"),
            Err(CoreError::InvalidNumber(_))
        );
        assert_eq!(positive_quantity(dec!(2.5), "quantity").unwrap(), dec!(2.5));
    }

    #[test]
    fn non_negative_quantity_accepts_zero() {
        assert_eq!(non_negative_quantity(dec!(0), "quantity").unwrap(), dec!(0));
        assert!(non_negative_quantity(dec!(-0.5), "quantity").is_err());
    }
}
