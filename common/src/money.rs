//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a zero [`Money`] amount in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Multiplies this [`Money`] by the provided number of units (nights,
    /// items, etc).
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn times(self, units: u32) -> Option<Self> {
        Some(Self {
            amount: self.amount.checked_mul(Decimal::from(units))?,
            currency: self.currency,
        })
    }

    /// Adds the `other` [`Money`] to this one.
    ///
    /// [`None`] is returned if the [`Currency`]s differ or on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        (self.currency == other.currency).then_some(())?;
        Some(Self {
            amount: self.amount.checked_add(other.amount)?,
            currency: self.currency,
        })
    }

    /// Indicates whether this [`Money`] amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "US Dollar."]
        Usd = 1,

        #[doc = "Euro."]
        Eur = 2,

        #[doc = "Russian Ruble."]
        Rub = 3,

        #[doc = "Pound Sterling."]
        Gbp = 4,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            money("120.50EUR"),
            Money {
                amount: "120.50".parse::<Decimal>().unwrap(),
                currency: Currency::Eur,
            },
        );
        assert_eq!(money("95GBP").currency, Currency::Gbp);

        assert!(Money::from_str("120.50").is_err());
        assert!(Money::from_str("120.50Eu").is_err());
        assert!(Money::from_str("120.50Euros").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(money("120.50EUR").to_string(), "120.50EUR");
        assert_eq!(money("120.00USD").to_string(), "120USD");
        assert_eq!(money("120USD").to_string(), "120USD");
    }

    #[test]
    fn multiplies_by_nights() {
        assert_eq!(money("89.90EUR").times(3), Some(money("269.70EUR")));
        assert_eq!(money("89.90EUR").times(0), Some(money("0EUR")));
    }

    #[test]
    fn adds_same_currency_only() {
        assert_eq!(
            money("100USD").checked_add(money("20.5USD")),
            Some(money("120.5USD")),
        );
        assert_eq!(money("100USD").checked_add(money("20EUR")), None);
        assert_eq!(
            Money::zero(Currency::Rub).checked_add(money("10RUB")),
            Some(money("10RUB")),
        );
    }

    #[test]
    fn detects_negative_amounts() {
        assert!(money("-1USD").is_negative());
        assert!(!money("0USD").is_negative());
        assert!(!money("1USD").is_negative());
    }
}
