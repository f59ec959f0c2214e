use kernel::model::catalog::price_limit;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

pub mod event;
pub mod reservation;
pub mod user;

// 金額は 0 以上、小数点以下 2 桁まで（NUMERIC(10, 2)）
pub(crate) fn validate_price(value: &Decimal, _: &()) -> garde::Result {
    if *value < Decimal::ZERO {
        return Err(garde::Error::new("ensure this value is greater than or equal to 0."));
    }
    if value.normalize().scale() > 2 {
        return Err(garde::Error::new(
            "ensure that there are no more than 2 decimal places.",
        ));
    }
    if *value >= price_limit() {
        return Err(garde::Error::new(
            "ensure that there are no more than 10 digits in total.",
        ));
    }
    Ok(())
}

pub(crate) fn validate_optional_price(value: &Option<Decimal>, ctx: &()) -> garde::Result {
    match value {
        Some(price) => validate_price(price, ctx),
        None => Ok(()),
    }
}

// PATCH で「項目なし」と「null」を区別するためのもの
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn prices() {
        assert!(validate_price(&dec!(0), &()).is_ok());
        assert!(validate_price(&dec!(150.00), &()).is_ok());
        assert!(validate_price(&dec!(49.5), &()).is_ok());
        assert!(validate_price(&dec!(12.500), &()).is_ok());
        assert!(validate_price(&dec!(-1), &()).is_err());
        assert!(validate_price(&dec!(1.005), &()).is_err());
        assert!(validate_price(&dec!(99999999.99), &()).is_ok());
        assert!(validate_price(&dec!(100000000.00), &()).is_err());
        assert!(validate_optional_price(&None, &()).is_ok());
    }
}
