use super::HeaderMap;

/// Iterator over `(name, value)` in insertion order.
#[derive(Debug)]
pub struct Iter<'a> {
    iter: std::slice::Iter<'a, (String, String)>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(fields: &'a [(String, String)]) -> Self {
        Self { iter: fields.iter() }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Iterator returned by [`HeaderMap::with_defaults`].
///
/// Yields every field of the primary map, then the default fields whose name does not match
/// any primary field case-insensitively.
#[derive(Debug)]
pub struct WithDefaults<'a> {
    primary: &'a HeaderMap,
    own: Iter<'a>,
    defaults: Iter<'a>,
}

impl<'a> WithDefaults<'a> {
    pub(crate) fn new(primary: &'a HeaderMap, defaults: &'a HeaderMap) -> Self {
        Self {
            primary,
            own: primary.iter(),
            defaults: defaults.iter(),
        }
    }
}

impl<'a> Iterator for WithDefaults<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(field) = self.own.next() {
            return Some(field);
        }
        let primary = self.primary;
        self.defaults.find(|(name, _)| !primary.contains_key_ignore_case(name))
    }
}
