//! Format-specific markup: mentions, links and escaping.

use crate::nicks::UsernameMap;
use serde::{Deserialize, Serialize};

/// Profile URL prefix for unmapped mentions.
const GITHUB_PROFILE_URL: &str = "https://github.com";

/// Markup flavour of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Plain text.
    #[default]
    Plain,
    /// Slack `mrkdwn`.
    Slack,
}

/// Mention of a GitHub login.
///
/// Slack output pings the mapped Slack id. Plain output always names the
/// GitHub login, since a bare Slack id neither reads well nor pings.
#[must_use]
pub fn mention(login: &str, nicks: &UsernameMap, format: OutputFormat) -> String {
    match (format, nicks.get(login)) {
        (OutputFormat::Slack, Some(slack_id)) => slack_mention(slack_id),
        _ => fallback_mention(login, format),
    }
}

fn slack_mention(slack_id: &str) -> String {
    format!("<@{slack_id}>")
}

fn fallback_mention(login: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => format!("@{login}"),
        OutputFormat::Slack => format!("<{GITHUB_PROFILE_URL}/{login}|@{login}>"),
    }
}

/// Replaces Slack id mentions with GitHub login mentions.
///
/// Used before printing a message to CI logs, which are often public.
/// Plain messages carry no Slack ids and come back unchanged.
#[must_use]
pub fn mask_mentions(message: &str, nicks: &UsernameMap, format: OutputFormat) -> String {
    if format == OutputFormat::Plain {
        return message.to_string();
    }

    let mut entries: Vec<(&str, &str)> = nicks.entries().collect();
    // Longer ids first, so no id is replaced inside a longer one.
    entries.sort_by_key(|(_, slack_id)| std::cmp::Reverse(slack_id.len()));

    entries
        .into_iter()
        .fold(message.to_string(), |masked, (login, slack_id)| {
            masked.replace(&slack_mention(slack_id), &fallback_mention(login, format))
        })
}

/// Escapes the characters Slack treats as control sequences.
#[must_use]
pub fn escape_slack(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Linked title of a pull request.
///
/// With a Jira browse URL, a leading issue key such as `ABC-123: ` links to
/// the Jira issue.
#[must_use]
pub fn title_link(title: &str, url: &str, jira_base_url: Option<&str>, format: OutputFormat) -> String {
    let jira = jira_base_url.and_then(|base| {
        split_jira_key(title).map(|parts| (format!("{}/{}", base.trim_end_matches('/'), parts.0), parts))
    });

    match (format, jira) {
        (OutputFormat::Plain, None) => format!("{title} <{url}>"),
        (OutputFormat::Plain, Some((jira_url, _))) => format!("{title} <{url}> [{jira_url}]"),
        (OutputFormat::Slack, None) => format!("<{url}|{}>", escape_slack(title)),
        (OutputFormat::Slack, Some((jira_url, (key, separator, remainder)))) => format!(
            "<{jira_url}|{key}>{separator}<{url}|{}>",
            escape_slack(remainder)
        ),
    }
}

/// Splits `KEY-123: rest` into key, separator and rest.
fn split_jira_key(title: &str) -> Option<(&str, &str, &str)> {
    let letters = title.bytes().take_while(u8::is_ascii_uppercase).count();
    if letters == 0 {
        return None;
    }
    let digits_start = letters + 1;
    if title.as_bytes().get(letters) != Some(&b'-') {
        return None;
    }
    let digits = title[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }

    let key_end = digits_start + digits;
    let after_key = &title[key_end..];
    let separator_len = after_key
        .bytes()
        .take_while(|b| matches!(b, b':' | b' ' | b'-'))
        .count();
    let remainder = &after_key[separator_len..];
    if separator_len == 0 || remainder.is_empty() {
        return None;
    }

    Some((&title[..key_end], &after_key[..separator_len], remainder))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JIRA: &str = "https://issues.example.com/browse/";

    fn nicks() -> UsernameMap {
        UsernameMap::from_entries([("alice", "U01ALICE"), ("al", "U9")])
    }

    #[test]
    fn mapped_and_unmapped_mentions() {
        assert_eq!(mention("alice", &nicks(), OutputFormat::Slack), "<@U01ALICE>");
        assert_eq!(mention("alice", &nicks(), OutputFormat::Plain), "@alice");
        assert_eq!(
            mention("bob", &nicks(), OutputFormat::Slack),
            "<https://github.com/bob|@bob>"
        );
        assert_eq!(mention("bob", &nicks(), OutputFormat::Plain), "@bob");
    }

    #[test]
    fn mask_restores_github_mentions() {
        let message = "needs changes by <@U01ALICE> and <@U9>";

        let masked = mask_mentions(message, &nicks(), OutputFormat::Slack);

        assert_eq!(
            masked,
            "needs changes by <https://github.com/alice|@alice> and <https://github.com/al|@al>"
        );
    }

    #[test]
    fn plain_messages_never_carry_slack_ids() {
        let plain = mention("alice", &nicks(), OutputFormat::Plain);

        assert!(!plain.contains("U01ALICE"));
        assert_eq!(mask_mentions(&plain, &nicks(), OutputFormat::Plain), "@alice");
    }

    #[test]
    fn slack_titles_are_escaped() {
        assert_eq!(
            title_link("Use <T> & co", "https://x/1", None, OutputFormat::Slack),
            "<https://x/1|Use &lt;T&gt; &amp; co>"
        );
    }

    #[test]
    fn jira_key_links_to_issue() {
        assert_eq!(
            title_link("HMS-42: Fix boot", "https://x/1", Some(JIRA), OutputFormat::Slack),
            "<https://issues.example.com/browse/HMS-42|HMS-42>: <https://x/1|Fix boot>"
        );
        assert_eq!(
            title_link("HMS-42: Fix boot", "https://x/1", Some(JIRA), OutputFormat::Plain),
            "HMS-42: Fix boot <https://x/1> [https://issues.example.com/browse/HMS-42]"
        );
    }

    #[test]
    fn titles_without_key_are_plain_links() {
        assert_eq!(
            title_link("Fix boot", "https://x/1", Some(JIRA), OutputFormat::Slack),
            "<https://x/1|Fix boot>"
        );
        assert_eq!(
            title_link("HMS-42: Fix boot", "https://x/1", None, OutputFormat::Slack),
            "<https://x/1|HMS-42: Fix boot>"
        );
    }

    #[test]
    fn jira_key_parsing() {
        assert_eq!(split_jira_key("AB-1 - Thing"), Some(("AB-1", " - ", "Thing")));
        assert_eq!(split_jira_key("AB-1"), None);
        assert_eq!(split_jira_key("ab-1: lower"), None);
        assert_eq!(split_jira_key("AB-x: no digits"), None);
        assert_eq!(split_jira_key("AB-12fix"), None);
    }
}
