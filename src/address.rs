use std::{
    fmt::{self, Display},
    str::FromStr,
};

use thiserror::Error;

/// The candidate string could not be accepted as a recipient address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid recipient address: {0}")]
pub struct InvalidAddress(pub String);

/// A validated recipient address.
///
/// Validation is intentionally permissive: the string must contain exactly
/// one `@` separator with a non-empty local part, and the domain segment must
/// contain at least one `.`. Anything the downstream transport would reject
/// beyond that surfaces as a delivery failure, not a validation skip.
///
/// A `Recipient` is created once during validation and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Recipient(String);

impl Recipient {
    /// View the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Recipient {
    type Err = InvalidAddress;

    fn from_str(candidate: &str) -> Result<Self, Self::Err> {
        let Some((local, domain)) = candidate.split_once('@') else {
            return Err(InvalidAddress(candidate.to_owned()));
        };

        if local.is_empty() || domain.contains('@') || !domain.contains('.') {
            return Err(InvalidAddress(candidate.to_owned()));
        }

        Ok(Self(candidate.to_owned()))
    }
}

impl Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Recipient {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
