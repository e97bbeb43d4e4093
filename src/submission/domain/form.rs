//! Raw form fields as decoded from the request body.
//!
//! Form decoding yields either a single string or, when a key repeats, a
//! list of strings. [`FormFields`] keeps that shape explicit so the
//! normalisation rules in [`super::ContactForm`] can be applied per field.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Form key carrying the sender's full name.
pub const FULL_NAME_FIELD: &str = "fullName";
/// Form key carrying the message subject.
pub const SUBJECT_FIELD: &str = "subject";
/// Form key carrying the message body.
pub const MESSAGE_FIELD: &str = "message";
/// Form key carrying zero or more response preference tags.
pub const RESPONSE_FIELD: &str = "response";
/// Form key carrying the consent token.
pub const CONSENT_FIELD: &str = "consent";
/// Multipart file field carrying the optional attachment.
pub const ATTACHMENT_FIELD: &str = "attachment";

/// A decoded form value: a scalar, or a list when the key was repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// The key appeared once.
    Single(String),
    /// The key appeared more than once; values are in arrival order.
    Multiple(Vec<String>),
}

impl FormValue {
    /// Returns the first value carried by this entry.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()),
            Self::Multiple(values) => values.first().map(String::as_str),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                let previous = std::mem::take(existing);
                *self = Self::Multiple(vec![previous, value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for FormValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// Mapping of form keys to decoded values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    values: HashMap<String, FormValue>,
}

impl FormFields {
    /// Creates an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for `name`.
    ///
    /// The first value for a key is stored as [`FormValue::Single`]; any
    /// further value converts the entry into [`FormValue::Multiple`].
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let field_value = value.into();
        match self.values.entry(name.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(field_value),
            Entry::Vacant(entry) => {
                entry.insert(FormValue::Single(field_value));
            }
        }
    }

    /// Replaces the entry for `name` with the given value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Returns the value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.values.get(name)
    }

    /// Returns `true` when no fields were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.push(name, value);
        }
        fields
    }
}
