use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display, EnumString};

#[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Display, EnumString, SerializeDisplay, DeserializeFromStr)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_test::{Token, assert_de_tokens_error, assert_tokens};

    use super::*;

    #[test]
    fn names_are_lowercase() {
        assert_eq!(LogFormat::Compact.to_string(), "compact");
        assert_eq!(LogFormat::Json.to_string(), "json");
        assert_eq!(LogFormat::from_str("pretty"), Ok(LogFormat::Pretty));
        assert!(LogFormat::from_str("JSON").is_err());
    }

    #[test]
    fn serde_uses_names() {
        assert_tokens(&LogFormat::Pretty, &[Token::Str("pretty")]);
        assert_de_tokens_error::<LogFormat>(&[Token::Str("xml")], "Matching variant not found");
    }
}
