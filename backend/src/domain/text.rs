//! Validated string newtypes shared by the team, user, and pull request models.

/// Validation failures for identifiers and display strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextValidationError {
    /// The value was empty or whitespace only.
    #[error("{field} must not be empty")]
    Empty {
        /// Wire name of the rejected field.
        field: &'static str,
    },
    /// The value carried leading or trailing whitespace.
    #[error("{field} must not have leading or trailing whitespace")]
    SurroundingWhitespace {
        /// Wire name of the rejected field.
        field: &'static str,
    },
    /// The value exceeded the character limit.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Wire name of the rejected field.
        field: &'static str,
        /// Maximum accepted length in characters.
        max: usize,
    },
}

impl TextValidationError {
    /// Wire name of the field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::SurroundingWhitespace { field }
            | Self::TooLong { field, .. } => field,
        }
    }
}

pub(crate) fn validate_text(
    value: &str,
    field: &'static str,
    max: usize,
) -> Result<(), TextValidationError> {
    if value.trim().is_empty() {
        return Err(TextValidationError::Empty { field });
    }
    if value.trim() != value {
        return Err(TextValidationError::SurroundingWhitespace { field });
    }
    if value.chars().count() > max {
        return Err(TextValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Declare a string newtype validated by [`validate_text`].
macro_rules! bounded_text {
    (
        $(#[$outer:meta])*
        $name:ident, field = $field:literal, max = $max:expr
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Maximum length in characters.
            pub const MAX_LEN: usize = $max;

            /// Validate and wrap `value`.
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::domain::TextValidationError> {
                let value = value.into();
                $crate::domain::text::validate_text(&value, $field, Self::MAX_LEN)?;
                Ok(Self(value))
            }

            /// Borrow the validated value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::TextValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

pub(crate) use bounded_text;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    bounded_text! {
        /// Test newtype.
        Label, field = "label", max = 4
    }

    #[rstest]
    #[case("", TextValidationError::Empty { field: "label" })]
    #[case("   ", TextValidationError::Empty { field: "label" })]
    #[case(" ab", TextValidationError::SurroundingWhitespace { field: "label" })]
    #[case("abcde", TextValidationError::TooLong { field: "label", max: 4 })]
    fn rejects_invalid_values(#[case] raw: &str, #[case] expected: TextValidationError) {
        assert_eq!(Label::new(raw), Err(expected));
    }

    #[rstest]
    #[case("a")]
    #[case("a b")]
    #[case("ünï")]
    fn accepts_valid_values(#[case] raw: &str) {
        let label = Label::new(raw).expect("valid label");
        assert_eq!(label.as_str(), raw);
    }

    #[rstest]
    fn deserialisation_validates() {
        assert!(serde_json::from_str::<Label>("\"  \"").is_err());
        let label: Label = serde_json::from_str("\"ok\"").expect("valid label");
        assert_eq!(label.to_string(), "ok");
    }

    #[rstest]
    fn error_reports_field() {
        let err = Label::new("").expect_err("blank label");
        assert_eq!(err.field(), "label");
        assert_eq!(err.to_string(), "label must not be empty");
    }
}
