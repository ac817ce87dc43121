/*
[INPUT]:  Endpoint parameters (key/value pairs, repeatable keys)
[OUTPUT]: Canonical application/x-www-form-urlencoded strings
[POS]:    HTTP layer - parameter set shared by query string and form body
[UPDATE]: When changing canonical ordering or percent-encoding rules
*/

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Ordered multi-value parameter set.
///
/// Keys are kept sorted so encoding is canonical; values under one key keep
/// their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet {
    entries: BTreeMap<String, Vec<String>>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every value stored under `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.entries.insert(key.into(), vec![value.to_string()]);
        self
    }

    /// Append a value under `key`, keeping earlier values.
    pub fn add(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.entries
            .entry(key.into())
            .or_default()
            .push(value.to_string());
        self
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of (key, value) pairs, counting repeated keys once per value.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| (key.as_str(), value.as_str()))
        })
    }

    /// Canonical encoding: keys ascending, repeated keys in insertion order.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Decode an encoded query or form string.
    pub fn parse(encoded: &str) -> Self {
        let mut params = Self::new();
        for (key, value) in form_urlencoded::parse(encoded.as_bytes()) {
            params.add(key.into_owned(), value);
        }
        params
    }
}

impl<K, V> FromIterator<(K, V)> for ParamSet
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.add(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_previous_values() {
        let mut params = ParamSet::new();
        params.add("asset", "BTC").add("asset", "ETH");
        params.set("asset", "BNB");

        assert_eq!(params.get_all("asset"), ["BNB".to_string()]);
        assert_eq!(params.encode(), "asset=BNB");
    }

    #[test]
    fn test_add_keeps_insertion_order_for_repeated_keys() {
        let mut params = ParamSet::new();
        params.add("asset", "USDT").add("asset", "BUSD").set("poolId", 2);

        assert_eq!(params.encode(), "asset=USDT&asset=BUSD&poolId=2");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_encoding_is_independent_of_set_order() {
        let mut first = ParamSet::new();
        first.set("symbol", "BNBUSDT").set("limit", 10).set("fromId", "1");

        let mut second = ParamSet::new();
        second.set("fromId", "1").set("symbol", "BNBUSDT").set("limit", 10);

        assert_eq!(first.encode(), second.encode());
        assert_eq!(first.encode(), "fromId=1&limit=10&symbol=BNBUSDT");
    }

    #[test]
    fn test_reserved_characters_are_percent_encoded() {
        let mut params = ParamSet::new();
        params.set("email", "a+b@c.com").set("tag", "x&y=z");

        assert_eq!(params.encode(), "email=a%2Bb%40c.com&tag=x%26y%3Dz");
    }

    #[test]
    fn test_empty_set_encodes_to_empty_string() {
        assert_eq!(ParamSet::new().encode(), "");
        assert!(ParamSet::new().is_empty());
    }

    #[test]
    fn test_parse_recovers_multi_value_mapping() {
        let params: ParamSet = [
            ("asset", "BTC"),
            ("asset", "ETH"),
            ("note", "hello world"),
            ("email", "a+b@c.com"),
        ]
        .into_iter()
        .collect();

        let decoded = ParamSet::parse(&params.encode());
        assert_eq!(decoded, params);
        assert_eq!(decoded.get("note"), Some("hello world"));
    }

    #[test]
    fn test_values_render_with_to_string() {
        let mut params = ParamSet::new();
        params.set("futures", true).set("amount", 0.5).set("page", 3u32);

        assert_eq!(params.encode(), "amount=0.5&futures=true&page=3");
    }
}
