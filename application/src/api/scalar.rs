//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Helper for `#[graphql(with = ..)]` attribute of the string scalars backed
/// by a validated domain type `As` (`RoomNumber`, `CustomerEmail`, etc).
///
/// Output is the [`Display`] of `As`, while input is trimmed and parsed
/// with the [`FromStr`] of `As`, so `" 101 "` typed by the staff is accepted
/// as `"101"`.
///
/// Target type must implement [`TryFrom`] and [`AsRef`] for `As` type.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Converts the target type into scalar [`Value`].
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Constructs the target type from scalar [`Value`].
    ///
    /// # Errors
    ///
    /// If the input value is not a string, or isn't a valid `As` once
    /// trimmed.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = T::name(&()).expect("always has a name");
        let s = input.as_string_value().ok_or_else(|| {
            format!("`{name}` must be a string, found: {input}")
        })?;
        s.trim()
            .parse::<As>()
            .map_err(|e| format!("Invalid `{name}` \"{s}\": {e}"))?
            .try_into()
            .map_err(|e| format!("Invalid `{name}`: {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a [`String`].
    ///
    /// # Errors
    ///
    /// If the token is not a string.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue, Value};
    use service::domain;

    use crate::api::room::Number;

    use super::Via;

    type Scalar = Via<domain::room::Number>;

    #[test]
    fn trims_input() {
        let number = Scalar::from_input::<Number, DefaultScalarValue>(
            &InputValue::scalar(" 101 "),
        )
        .unwrap();

        assert_eq!(number.to_string(), "101");
        assert_eq!(
            Scalar::to_output::<_, DefaultScalarValue>(&number),
            Value::scalar("101".to_owned()),
        );
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(Scalar::from_input::<Number, DefaultScalarValue>(
            &InputValue::scalar("   "),
        )
        .is_err());
        assert!(Scalar::from_input::<Number, DefaultScalarValue>(
            &InputValue::scalar(101),
        )
        .is_err());
    }
}
