//! Plain text → Slack mrkdwn.
//!
//! The model answers in loose prose with the occasional bullet list and
//! "Heading:" line. Slack renders that poorly as-is, so each line is mapped on
//! its own: headings become bold, everything else is block-quoted. A line's
//! output never depends on its neighbours.

/// Bullet glyph accepted in addition to `-`.
const BULLET: char = '•';

/// Convert generated text into Slack markup, line by line.
pub fn slack_format(text: &str) -> String {
    text.lines().map(format_line).collect::<Vec<_>>().join("\n")
}

fn format_line(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.starts_with('-') || trimmed.starts_with(BULLET) {
        format!("> {line}")
    } else if trimmed.is_empty() {
        ">".to_string()
    } else if line.ends_with(':') {
        format!("*{line}*")
    } else {
        format!("> {line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_is_quoted() {
        assert_eq!(slack_format("- item"), "> - item");
        assert_eq!(slack_format("• item"), "> • item");
        assert_eq!(slack_format("  - nested"), ">   - nested");
    }

    #[test]
    fn header_is_bold() {
        assert_eq!(slack_format("Summary:"), "*Summary:*");
    }

    #[test]
    fn blank_line_is_empty_quote() {
        assert_eq!(slack_format("a\n\nb"), "> a\n>\n> b");
        assert_eq!(slack_format("a\n   \nb"), "> a\n>\n> b");
    }

    #[test]
    fn plain_line_is_quoted() {
        assert_eq!(slack_format("plain"), "> plain");
    }

    #[test]
    fn bullet_ending_in_colon_stays_a_bullet() {
        assert_eq!(slack_format("- Strengths:"), "> - Strengths:");
    }

    #[test]
    fn full_answer() {
        let input = "Strengths:\n- warm\n- curious\n\nYou shine in groups.";
        let expected = "*Strengths:*\n> - warm\n> - curious\n>\n> You shine in groups.";
        assert_eq!(slack_format(input), expected);
    }
}
