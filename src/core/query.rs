//! Query Parameters
//!
//! Ordered query parameters with repeated-key list encoding (`key[]=a&key[]=b`).

use url::Url;

/// A single query value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryValue {
    /// Encoded as `key=value`.
    Scalar(String),
    /// Encoded as one `key[]=value` pair per element.
    List(Vec<String>),
}

impl QueryValue {
    /// The scalar value, if this is not a list.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

macro_rules! scalar_from_display {
    ($($t:ty),*) => {
        $(impl From<$t> for QueryValue {
            fn from(value: $t) -> Self {
                Self::Scalar(value.to_string())
            }
        })*
    };
}

scalar_from_display!(i32, i64, u32, u64, usize, bool);

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<i64>> for QueryValue {
    fn from(values: Vec<i64>) -> Self {
        Self::List(values.into_iter().map(|v| v.to_string()).collect())
    }
}

/// Ordered query parameters. Setting an existing key replaces it in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`QueryParams::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a parameter.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        let index = self.params.iter().position(|(k, _)| k == key)?;
        Some(self.params.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flatten into wire pairs, expanding lists to repeated `key[]` entries.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.params {
            match value {
                QueryValue::Scalar(v) => pairs.push((key.clone(), v.clone())),
                QueryValue::List(values) => {
                    let list_key = if key.ends_with("[]") {
                        key.clone()
                    } else {
                        format!("{}[]", key)
                    };
                    for v in values {
                        pairs.push((list_key.clone(), v.clone()));
                    }
                }
            }
        }
        pairs
    }

    /// Append every pair to the URL's query string.
    pub fn apply_to(&self, url: &mut Url) {
        let pairs = self.to_pairs();
        if pairs.is_empty() {
            return;
        }
        let mut serializer = url.query_pairs_mut();
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_values_repeat_key() {
        let query = QueryParams::new()
            .with("status", vec!["active", "completed"])
            .with("page_limit", 25u32);

        assert_eq!(
            query.to_pairs(),
            vec![
                ("status[]".to_string(), "active".to_string()),
                ("status[]".to_string(), "completed".to_string()),
                ("page_limit".to_string(), "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_bracketed_key_not_doubled() {
        let query = QueryParams::new().with("user_ids[]", vec![1i64, 2]);
        let keys: Vec<String> = query.to_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["user_ids[]", "user_ids[]"]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut query = QueryParams::new().with("per_page", 10u32).with("page", 1u32);
        query.set("per_page", 100u32);

        assert_eq!(query.len(), 2);
        assert_eq!(
            query.get("per_page").and_then(QueryValue::as_scalar),
            Some("100")
        );
        assert_eq!(query.iter().next().map(|(k, _)| k), Some("per_page"));
    }

    #[test]
    fn test_apply_to_url() {
        let mut url = Url::parse("https://api.hubstaff.com/v2/organizations/7/tasks").unwrap();
        QueryParams::new()
            .with("project_ids", vec![3i64, 4])
            .with("page", 2u32)
            .apply_to(&mut url);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("project_ids[]".to_string(), "3".to_string()),
                ("project_ids[]".to_string(), "4".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_query_leaves_url_untouched() {
        let mut url = Url::parse("https://api.hubstaff.com/v2/users/me").unwrap();
        QueryParams::new().apply_to(&mut url);
        assert_eq!(url.as_str(), "https://api.hubstaff.com/v2/users/me");
    }
}
