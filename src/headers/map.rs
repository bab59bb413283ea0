use super::{HeaderError, Iter, WithDefaults};

/// Ordered HTTP header mapping.
///
/// Keys are unique by exact comparison and iterate in insertion order. Case-insensitive lookup
/// is available separately, it is used when merging against default headers.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    fields: Vec<(String, String)>,
}

impl HeaderMap {
    /// Create new empty [`HeaderMap`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Create new empty [`HeaderMap`] with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { fields: Vec::with_capacity(capacity) }
    }

    /// Returns headers length.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if headers has no element.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.fields)
    }

    /// Iterate this map followed by every field of `defaults` whose name is not already present,
    /// compared case-insensitively.
    #[inline]
    pub fn with_defaults<'a>(&'a self, defaults: &'a HeaderMap) -> WithDefaults<'a> {
        WithDefaults::new(self, defaults)
    }
}

// ===== Lookup =====

impl HeaderMap {
    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(key, _)| key == name)
    }

    /// Returns `true` if the map contains exactly the given header name.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns `true` if the map contains the given header name in any letter case.
    #[inline]
    pub fn contains_key_ignore_case(&self, name: &str) -> bool {
        self.fields.iter().any(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// Returns the value of exactly the given header name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|i| self.fields[i].1.as_str())
    }

    /// Returns the value of the first header matching `name` in any letter case.
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// ===== Mutation =====

impl HeaderMap {
    /// Insert a header, returning the previous value of the same exact name.
    ///
    /// Replacing keeps the original position of the field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => Some(std::mem::replace(&mut self.fields[i].1, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    /// Insert a header after validating its name and value.
    pub fn try_insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, HeaderError> {
        let name = name.into();
        let value = value.into();
        validate_name(&name)?;
        validate_value(&name, &value)?;
        Ok(self.insert(name, value))
    }

    /// Remove a header of exactly the given name.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let i = self.position(name)?;
        Some(self.fields.remove(i).1)
    }

    /// Check every field with [`validate_name`] and [`validate_value`].
    pub fn validate(&self) -> Result<(), HeaderError> {
        for (name, value) in &self.fields {
            validate_name(name)?;
            validate_value(name, value)?;
        }
        Ok(())
    }
}

/// Validate that a header name only contains HTTP token characters.
///
/// An empty name passes, such field is skipped when the head is written.
pub fn validate_name(name: &str) -> Result<(), HeaderError> {
    match name.bytes().all(is_tchar) {
        true => Ok(()),
        false => Err(HeaderError::InvalidName(name.into())),
    }
}

/// Validate that a header value cannot break out of its line.
pub fn validate_value(name: &str, value: &str) -> Result<(), HeaderError> {
    match value.bytes().any(|b| matches!(b, b'\r' | b'\n' | 0)) {
        true => Err(HeaderError::InvalidValue(name.into())),
        false => Ok(()),
    }
}

/// [token](https://www.rfc-editor.org/rfc/rfc9110.html#name-tokens)
const fn is_tchar(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
    ) || b.is_ascii_alphanumeric()
}

// ===== Traits =====

impl<K, V> FromIterator<(K, V)> for HeaderMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = HeaderMap::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for HeaderMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a str, &'a str);

    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
