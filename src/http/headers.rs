//! HTTP header map with case-insensitive name lookup.
//!
//! HTTP headers are order-preserving and case-insensitive per [RFC 9110 §5].

use std::fmt;

/// An insertion-ordered, multi-value HTTP header map.
///
/// Keys are stored lower-cased — [`append`](Self::append) normalizes the name
/// on the way in — and lookups are case-insensitive. Each key maps to the
/// ordered sequence of values it accumulated, across repeated occurrences and
/// within one comma-separated field value. Whether a repeated occurrence is
/// legal at all is the request parser's decision, not the map's.
///
/// # Examples
///
/// ```
/// use intake::http::Headers;
///
/// let mut headers = Headers::new();
/// headers.append("Accept", vec!["text/html".into(), "application/json".into()]);
/// headers.append("Accept", vec!["*/*".into()]);
///
/// assert_eq!(
///     headers.get("ACCEPT"),
///     Some(&["text/html".to_owned(), "application/json".into(), "*/*".into()][..])
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers {
    inner: Vec<(String, Vec<String>)>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends values under `name`, lower-casing the name first.
    ///
    /// A new name gets its own entry at the end of the map; an existing name
    /// has the values appended to its list, preserving appearance order.
    pub fn append(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into().to_ascii_lowercase();
        match self.inner.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => existing.extend(values),
            None => self.inner.push((name, values)),
        }
    }

    /// Appends a single value under `name`. Convenience for response building.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.append(name, vec![value.into()]);
    }

    /// Returns all values for the given header name (case-insensitive), or `None`
    /// if the name never appeared.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.inner
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// Returns the first value for the given header name, or `None` if the name
    /// is absent or carries an empty value list.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)?.first().map(String::as_str)
    }

    /// Returns `true` if the map has an entry for the given name, even one with
    /// an empty value list.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Returns the number of distinct header names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no header was recorded.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over `(name, values)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in &self.inner {
            write!(f, "{name}: {}\r\n", values.join(", "))?;
        }
        Ok(())
    }
}
