//! Query-string helpers.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Everything except unreserved characters and `!` (resource ids use it as a separator).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'!');

/// First value of `name` in the URL query, percent-decoded.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// Serializes pairs in the given order, e.g. `resid=A!1&authkey=K`.
pub fn encode_query(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, QUERY_VALUE),
                utf8_percent_encode(v, QUERY_VALUE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_bang_and_encodes_reserved() {
        assert_eq!(
            encode_query(&[("resid", "A!1"), ("authkey", "a&b=c")]),
            "resid=A!1&authkey=a%26b%3Dc"
        );
        assert_eq!(
            encode_query(&[("UniqueId", "{1234-AB}")]),
            "UniqueId=%7B1234-AB%7D"
        );
    }

    #[test]
    fn query_param_first_match_decoded() {
        let u = Url::parse("https://x.test/p?a=1&b=%21two&a=3").unwrap();
        assert_eq!(query_param(&u, "a").as_deref(), Some("1"));
        assert_eq!(query_param(&u, "b").as_deref(), Some("!two"));
        assert_eq!(query_param(&u, "c"), None);
    }
}
