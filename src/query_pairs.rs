use crate::code_unit::CodeUnit;
use crate::compat::{Cow, String, Vec};
use crate::component::Component;

/// Iterator over the `key=value` pairs of a query, as spans into the input.
///
/// Pairs are separated by `&`; the key ends at the first `=`, so
/// `a=b=c` is the key `a` with the value `b=c`. A pair without `=` has an
/// empty value and empty pairs (`a&&b`) are yielded too. Nothing is decoded.
#[derive(Debug, Clone)]
pub struct QueryPairs<'a, C> {
    spec: &'a [C],
    remaining: Component,
}

impl<'a, C: CodeUnit> QueryPairs<'a, C> {
    /// Walk `query`, a span of `spec` without the leading `?`.
    pub fn new(spec: &'a [C], query: Component) -> Self {
        Self {
            spec,
            remaining: query,
        }
    }
}

impl<'a> QueryPairs<'a, u8> {
    /// Walk all of `query`.
    pub fn from_query(query: &'a str) -> Self {
        Self::new(query.as_bytes(), Component::new(0, query.len()))
    }

    /// Form-decoded pairs: `+` is a space and escapes are decoded as UTF-8,
    /// malformed sequences replaced by U+FFFD.
    pub fn decoded(self) -> impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)> {
        let spec = self.spec;
        self.map(move |(key, value)| (decode_form(key.slice(spec)), decode_form(value.slice(spec))))
    }
}

impl<C: CodeUnit> Iterator for QueryPairs<'_, C> {
    type Item = (Component, Component);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.remaining.is_nonempty() {
            return None;
        }
        let spec = self.spec;
        let end = self.remaining.end();
        let mut cur = self.remaining.begin;

        let key_begin = cur;
        while cur < end && !spec[cur].is(b'&') && !spec[cur].is(b'=') {
            cur += 1;
        }
        let key = Component::from_range(key_begin, cur);
        if cur < end && spec[cur].is(b'=') {
            cur += 1;
        }

        let value_begin = cur;
        while cur < end && !spec[cur].is(b'&') {
            cur += 1;
        }
        let value = Component::from_range(value_begin, cur);
        if cur < end {
            cur += 1;
        }

        self.remaining = Component::from_range(cur, end);
        Some((key, value))
    }
}

fn decode_form(bytes: &[u8]) -> Cow<'_, str> {
    if !bytes.iter().any(|&b| b == b'+' || b == b'%') {
        return String::from_utf8_lossy(bytes);
    }
    let plus_as_space: Vec<u8> = bytes
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    let decoded = percent_encoding::percent_decode(&plus_as_space).decode_utf8_lossy();
    Cow::Owned(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::ToString;

    fn pairs(query: &str) -> Vec<(String, String)> {
        QueryPairs::from_query(query)
            .map(|(key, value)| {
                (
                    key.as_str_on(query).unwrap_or_default().to_string(),
                    value.as_str_on(query).unwrap_or_default().to_string(),
                )
            })
            .collect()
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_empty() {
        assert!(pairs("").is_empty());
    }

    #[test]
    fn test_single_and_multiple() {
        assert_eq!(pairs("key=value"), vec![pair("key", "value")]);
        assert_eq!(
            pairs("key1=value1&key2=value2"),
            vec![pair("key1", "value1"), pair("key2", "value2")]
        );
    }

    #[test]
    fn test_missing_parts() {
        assert_eq!(pairs("key1&key2=v"), vec![pair("key1", ""), pair("key2", "v")]);
        assert_eq!(pairs("=v"), vec![pair("", "v")]);
        assert_eq!(pairs("a&&b"), vec![pair("a", ""), pair("", ""), pair("b", "")]);
        assert_eq!(pairs("a&"), vec![pair("a", "")]);
    }

    #[test]
    fn test_value_keeps_later_equals() {
        assert_eq!(pairs("a=b=c"), vec![pair("a", "b=c")]);
    }

    #[test]
    fn test_spans_inside_url() {
        let url = "http://h/?x=1&y#f";
        let query = Component::new(10, 5);
        let spans: Vec<_> = QueryPairs::new(url.as_bytes(), query).collect();
        assert_eq!(
            spans,
            vec![
                (Component::new(10, 1), Component::new(12, 1)),
                (Component::new(14, 1), Component::new(15, 0)),
            ]
        );
    }

    #[test]
    fn test_decoded() {
        let decoded: Vec<_> = QueryPairs::from_query("a+b=%C3%A9&c=%zz%")
            .decoded()
            .collect();
        assert_eq!(decoded[0], (Cow::Borrowed("a b"), Cow::Borrowed("\u{e9}")));
        assert_eq!(decoded[1].1, "%zz%");
    }

    #[test]
    fn test_utf16() {
        let wide: Vec<u16> = "k=v&x".encode_utf16().collect();
        let count = QueryPairs::new(&wide[..], Component::new(0, wide.len())).count();
        assert_eq!(count, 2);
    }
}
