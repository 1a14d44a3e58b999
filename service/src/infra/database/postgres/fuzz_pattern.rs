//! [`FuzzPattern`] definition.

use itertools::Itertools as _;
use postgres_types::ToSql;

/// `ILIKE` patterns every one of which must match for a fuzzy search hit.
#[derive(Clone, Debug, Eq, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct FuzzPattern(Vec<String>);

impl FuzzPattern {
    /// Creates a new [`FuzzPattern`] matching each whitespace-separated word
    /// of the `input` anywhere in a value.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self(
            input
                .split_whitespace()
                .map(|word| {
                    format!(
                        "%{}%",
                        word.chars().format_with("", |c, f| match c {
                            '\\' | '%' | '_' => f(&format_args!("\\{c}")),
                            c => f(&c),
                        }),
                    )
                })
                .collect(),
        )
    }

    /// Indicates whether this [`FuzzPattern`] matches anything at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod spec {
    use super::FuzzPattern;

    #[test]
    fn escapes_wildcards() {
        assert_eq!(
            FuzzPattern::new("  ann 50%_off\\ "),
            FuzzPattern(vec!["%ann%".into(), r"%50\%\_off\\%".into()]),
        );
        assert!(FuzzPattern::new("   ").is_empty());
    }
}
