use serde::{Deserialize, Deserializer};
use serde_json::Value;

// issuers disagree on whether ids are strings or numbers, keep either as text
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Claims {
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        user_id: Option<String>,
    }

    fn parse(json: &str) -> Option<String> {
        serde_json::from_str::<Claims>(json).unwrap().user_id
    }

    #[test]
    fn test_string_or_number() {
        assert_eq!(parse(r#"{"user_id": "7"}"#).as_deref(), Some("7"));
        assert_eq!(parse(r#"{"user_id": 7}"#).as_deref(), Some("7"));
        assert_eq!(parse(r#"{"user_id": "abc"}"#).as_deref(), Some("abc"));
    }

    #[test]
    fn test_missing_or_other_types() {
        assert_eq!(parse(r#"{}"#), None);
        assert_eq!(parse(r#"{"user_id": null}"#), None);
        assert_eq!(parse(r#"{"user_id": [1]}"#), None);
    }
}
