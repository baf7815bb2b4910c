//! Outcome of resolving a configuration.

/// How a configuration lookup was satisfied.
///
/// A miss is an expected outcome, so it is a variant here rather than an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// The configuration was read from storage (or a cache of it).
    Found(T),
    /// Nothing was stored; defaults were materialized and persisted.
    Defaulted(T),
    /// Nothing was stored and no defaults were materialized.
    NotFound,
}

impl<T> Resolution<T> {
    /// Returns true if the value came from storage.
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// Returns true if the value was materialized from defaults.
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Resolution::Defaulted(_))
    }

    /// Returns true if no value is available.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound)
    }

    /// Returns a reference to the value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Resolution::Found(v) | Resolution::Defaulted(v) => Some(v),
            Resolution::NotFound => None,
        }
    }

    /// Converts into the value, discarding how it was obtained.
    pub fn into_value(self) -> Option<T> {
        match self {
            Resolution::Found(v) | Resolution::Defaulted(v) => Some(v),
            Resolution::NotFound => None,
        }
    }

    /// Maps the contained value, keeping the variant.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Resolution<U> {
        match self {
            Resolution::Found(v) => Resolution::Found(f(v)),
            Resolution::Defaulted(v) => Resolution::Defaulted(f(v)),
            Resolution::NotFound => Resolution::NotFound,
        }
    }

    /// Returns a label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Found(_) => "found",
            Resolution::Defaulted(_) => "defaulted",
            Resolution::NotFound => "not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let found = Resolution::Found(1);
        let defaulted = Resolution::Defaulted(2);
        let missing: Resolution<i32> = Resolution::NotFound;

        assert!(found.is_found());
        assert!(defaulted.is_defaulted());
        assert!(missing.is_not_found());

        assert_eq!(found.value(), Some(&1));
        assert_eq!(defaulted.into_value(), Some(2));
        assert_eq!(missing.into_value(), None);
    }

    #[test]
    fn test_map_keeps_variant() {
        assert_eq!(Resolution::Defaulted(2).map(|v| v * 10), Resolution::Defaulted(20));
        assert_eq!(Resolution::<i32>::NotFound.map(|v| v * 10).kind(), "not_found");
    }
}
