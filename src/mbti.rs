//! MBTI type codes and mention parsing.
//!
//! A mention looks like `@bot ENFP you are great @alice ESTJ`, which Slack
//! delivers as `<@U0BOT1234> ENFP you are great <@U123> ESTJ`. We take the first
//! four-letter upper-case word, the last user mention after it, and the first
//! four-letter word after that mention.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// The 16 valid MBTI type codes.
pub const MBTI_TYPES: [&str; 16] = [
    "INTJ", "INTP", "ENTJ", "ENTP", "INFJ", "INFP", "ENFJ", "ENFP", "ISTJ", "ISFJ", "ESTJ",
    "ESFJ", "ISTP", "ISFP", "ESTP", "ESFP",
];

static MENTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\b[A-Z]{4}\b).*<@([A-Z0-9]+)>.*?(\b[A-Z]{4}\b)").expect("valid regex")
});

/// A validated MBTI type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeCode(&'static str);

impl TypeCode {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for TypeCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MBTI_TYPES
            .iter()
            .find(|code| **code == s)
            .map(|code| TypeCode(code))
            .ok_or_else(|| format!("'{s}' is not an MBTI type"))
    }
}

/// Raw pattern match: two four-letter tokens around a user mention.
///
/// The tokens are not validated yet; see [`MentionMatch::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionMatch {
    pub requester_code: String,
    pub mentioned_user: String,
    pub mentioned_code: String,
}

/// A mention whose both codes are valid MBTI types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionIntent {
    pub requester_type: TypeCode,
    pub mentioned_user: String,
    pub mentioned_type: TypeCode,
}

impl MentionMatch {
    /// Check both codes against [`MBTI_TYPES`].
    pub fn validate(&self) -> Option<MentionIntent> {
        let requester_type = self.requester_code.parse().ok()?;
        let mentioned_type = self.mentioned_code.parse().ok()?;
        Some(MentionIntent {
            requester_type,
            mentioned_user: self.mentioned_user.clone(),
            mentioned_type,
        })
    }
}

/// Find `<code> ... <@USER> ... <code>` in a mention text.
pub fn match_mention(text: &str) -> Option<MentionMatch> {
    let caps = MENTION_PATTERN.captures(text)?;
    Some(MentionMatch {
        requester_code: caps.get(1)?.as_str().to_string(),
        mentioned_user: caps.get(2)?.as_str().to_string(),
        mentioned_code: caps.get(3)?.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_mentioned_user() {
        let m = match_mention("ENFP you are great <@U123> ESTJ").unwrap();
        assert_eq!(m.requester_code, "ENFP");
        assert_eq!(m.mentioned_user, "U123");
        assert_eq!(m.mentioned_code, "ESTJ");

        let intent = m.validate().unwrap();
        assert_eq!(intent.requester_type.as_str(), "ENFP");
        assert_eq!(intent.mentioned_type.as_str(), "ESTJ");
    }

    #[test]
    fn bot_mention_prefix_is_ignored() {
        let m = match_mention("<@UBOT42> INTJ and <@U0ALICE> INFP").unwrap();
        assert_eq!(m.requester_code, "INTJ");
        assert_eq!(m.mentioned_user, "U0ALICE");
        assert_eq!(m.mentioned_code, "INFP");
    }

    #[test]
    fn invalid_code_matches_but_does_not_validate() {
        let m = match_mention("ENFX you are great <@U123> ESTJ").unwrap();
        assert_eq!(m.requester_code, "ENFX");
        assert!(m.validate().is_none());
    }

    #[test]
    fn no_match_without_mention() {
        assert!(match_mention("ENFP and ESTJ").is_none());
        assert!(match_mention("hello <@U123> there").is_none());
    }

    #[test]
    fn all_sixteen_codes_parse() {
        for code in MBTI_TYPES {
            assert_eq!(code.parse::<TypeCode>().unwrap().to_string(), code);
        }
        assert!("enfp".parse::<TypeCode>().is_err());
    }
}
