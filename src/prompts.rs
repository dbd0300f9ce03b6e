//! Prompts and fixed user-facing messages.
//!
//! Every string the model or a Slack user sees lives here, so wording changes
//! touch exactly one file and tests can assert on the constants directly.

/// System prompt for the type-pair comparison triggered by a mention.
pub const COMPARISON_SYSTEM_PROMPT: &str = "You are an expert on MBTI couple dynamics.";

/// System prompt for analysing an uploaded MBTI report.
pub const INSIGHT_SYSTEM_PROMPT: &str = "You are an MBTI expert. Analyze the following official MBTI report. \
Summarize key strengths, blind spots, communication styles, and give actionable advice. \
Write as if addressing the report's subject personally. give 2-3 paragraphs maximum.";

/// Fixed lead-in sent before the optional free text and the page images.
pub const INSIGHT_LEAD_IN: &str = "Analyze this MBTI report.";

/// Reply when a mention carries codes outside the 16 valid types.
pub const USAGE_MESSAGE: &str =
    "Invalid MBTI types provided. Please use format: `@SlackBot [Your MBTI] @user [Their MBTI]`";

/// Reply to `/insight` without a PDF attachment.
pub const MISSING_PDF_MESSAGE: &str = "Please attach a PDF MBTI report to the command.";

/// Prefix of the posted insight message.
pub const INSIGHT_HEADER: &str = "Your MBTI report insight:";

/// Upload metadata for the generated insight document.
pub const INSIGHT_FILENAME: &str = "mbti_insight.pdf";
pub const INSIGHT_TITLE: &str = "MBTI Insight Report";
pub const INSIGHT_UPLOAD_COMMENT: &str = "Download the detailed insight as PDF:";

/// Build the user prompt comparing two type codes.
pub fn comparison_prompt(first: &str, second: &str) -> String {
    format!(
        "Compare a romantic couple with MBTI types {first} and {second}. \
Give a detailed compatibility analysis in 2 paragraphs: one about their strengths and one about their challenges."
    )
}

/// Build the mention reply shown above the comparison text.
pub fn comparison_reply(
    requester: &str,
    requester_type: &str,
    mentioned: &str,
    mentioned_type: &str,
    completion: &str,
) -> String {
    format!("<@{requester}> ({requester_type}) + <@{mentioned}> ({mentioned_type})\n\n{completion}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_prompt_names_both_types() {
        let p = comparison_prompt("ENFP", "ESTJ");
        assert!(p.starts_with("Compare a romantic couple with MBTI types ENFP and ESTJ."));
        assert!(p.contains("2 paragraphs"));
    }

    #[test]
    fn comparison_reply_layout() {
        let r = comparison_reply("U1", "ENFP", "U123", "ESTJ", "They get along.");
        assert_eq!(r, "<@U1> (ENFP) + <@U123> (ESTJ)\n\nThey get along.");
    }

    #[test]
    fn insight_prompt_limits_length() {
        assert!(INSIGHT_SYSTEM_PROMPT.contains("2-3 paragraphs"));
        assert!(INSIGHT_SYSTEM_PROMPT.contains("personally"));
    }
}
