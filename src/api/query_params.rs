use std::{collections::BTreeMap, str::FromStr};

/// Multi-valued query string, e.g. `?tags=lunch&tags=dinner&limit=6`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    inner: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        let inner = BTreeMap::new();
        Self { inner }
    }

    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::new();
        pairs
            .iter()
            .for_each(|(key, value)| params.add_param(key, value));
        params
    }

    pub fn set_param(&mut self, key: &str, value: &str) {
        self.inner.insert(key.to_string(), vec![value.to_string()]);
    }

    pub fn add_param(&mut self, key: &str, value: &str) {
        self.inner
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
    }

    pub fn remove_param(&mut self, key: &str) {
        self.inner.remove(key);
    }

    /// Last value wins, like most web frameworks.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.inner.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// `Ok(None)` when absent or blank.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, String> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| format!("Enter a valid value for {key}.")),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, String> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(None),
            Some("1" | "true" | "True") => Ok(Some(true)),
            Some("0" | "false" | "False") => Ok(Some(false)),
            Some(_) => Err(format!("Enter a valid boolean for {key}.")),
        }
    }

    pub fn to_query_string(&self) -> String {
        self.inner
            .iter()
            .filter_map(|(key, values)| {
                values
                    .iter()
                    .map(|value| encode_component(key) + "=" + &encode_component(value))
                    .reduce(|current, next| current + "&" + &next)
            })
            .reduce(|current, next| current + "&" + &next)
            .unwrap_or_default()
    }
}

// Everything outside the RFC 3986 unreserved set is percent-encoded.
pub fn encode_component(value: &str) -> String {
    value.bytes().fold(String::new(), |mut encoded, byte| {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
        encoded
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::from_pairs(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn repeated_keys_are_kept() {
        let params = params(&[("tags", "lunch"), ("limit", "6"), ("tags", "dinner")]);

        assert_eq!(params.get_all("tags"), ["lunch", "dinner"]);
        assert_eq!(params.get("limit"), Some("6"));
        assert!(params.get_all("author").is_empty());
    }

    #[test]
    fn query_string_is_stable() {
        let mut params = params(&[("tags", "lunch"), ("tags", "dinner"), ("author", "3")]);
        params.set_param("offset", "12");

        assert_eq!(
            params.to_query_string(),
            "author=3&offset=12&tags=lunch&tags=dinner"
        );

        params.remove_param("tags");
        params.remove_param("missing");
        assert_eq!(params.to_query_string(), "author=3&offset=12");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let params = params(&[("name", "salt & pepper"), ("tags", "été")]);

        assert_eq!(
            params.to_query_string(),
            "name=salt%20%26%20pepper&tags=%C3%A9t%C3%A9"
        );
    }

    #[test]
    fn empty_params_render_empty_string() {
        assert_eq!(QueryParams::new().to_query_string(), "");
    }

    #[test]
    fn booleans() {
        let params = params(&[("a", "1"), ("b", "false"), ("c", "yes"), ("d", "")]);

        assert_eq!(params.get_bool("a"), Ok(Some(true)));
        assert_eq!(params.get_bool("b"), Ok(Some(false)));
        assert!(params.get_bool("c").is_err());
        assert_eq!(params.get_bool("d"), Ok(None));
        assert_eq!(params.get_bool("e"), Ok(None));
    }

    #[test]
    fn parsed_values() {
        let params = params(&[("author", "12"), ("bad", "x1")]);

        assert_eq!(params.get_parsed::<i32>("author"), Ok(Some(12)));
        assert!(params.get_parsed::<i32>("bad").is_err());
        assert_eq!(params.get_parsed::<i32>("none"), Ok(None));
    }
}
