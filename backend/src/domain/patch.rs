//! Optional-patch values for partial updates.
//!
//! A [`Patch`] distinguishes "field absent from the request" from "field
//! explicitly set", including set to an empty or zero value. Payload structs
//! mark every patch field with `#[serde(default)]` so a missing key decodes to
//! [`Patch::Unset`].
//!
//! Decoding is deliberately lossy in one direction: an explicit `null` decodes
//! to `Set(T::default())`, so `null` and the zero value are both "present".
//! Encoding `Unset` emits `null`, which decodes back as `Set(default)`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Two-state patch for a single field.
///
/// # Examples
/// ```
/// use registry::domain::Patch;
///
/// let mut name = String::from("Ada");
/// Patch::set(String::new()).apply(&mut name);
/// assert!(name.is_empty());
///
/// Patch::<String>::unset().apply(&mut name);
/// assert!(name.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Leave the current value untouched.
    #[default]
    Unset,
    /// Overwrite the current value.
    Set(T),
}

impl<T> Patch<T> {
    /// Absent field.
    pub const fn unset() -> Self {
        Self::Unset
    }

    /// Present field carrying `value`.
    pub const fn set(value: T) -> Self {
        Self::Set(value)
    }

    /// Whether the field was present in the request.
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Borrow the carried value when present.
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unset => None,
        }
    }

    /// Convert into an `Option`, dropping the patch semantics.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unset => None,
        }
    }

    /// Overwrite `target` when the patch is set.
    pub fn apply(self, target: &mut T) {
        if let Self::Set(value) = self {
            *target = value;
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Unset => serializer.serialize_none(),
            Self::Set(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present; absence is `#[serde(default)]`.
        let value: Option<T> = Option::deserialize(deserializer)?;
        Ok(Self::Set(value.unwrap_or_default()))
    }
}
