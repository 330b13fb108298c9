use serde::{Deserialize, Deserializer};

/// Treats `null` the same as an absent field, yielding an empty string.
///
/// Pair with `#[serde(default)]` so that missing, `null` and `""` all reach
/// validation as the same empty value.
pub fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "deserialize_null_as_empty")]
        email: String,
    }

    #[test]
    fn test_null_missing_and_present() {
        let body: Body = serde_json::from_str(r#"{"email": null}"#).unwrap();
        assert_eq!(body.email, "");

        let body: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(body.email, "");

        let body: Body = serde_json::from_str(r#"{"email": "a@b.com"}"#).unwrap();
        assert_eq!(body.email, "a@b.com");
    }
}
