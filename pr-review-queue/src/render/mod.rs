//! Report rendering.
//!
//! Turns a [`Queue`] into a text report, one section per non-empty category.
//! Section headers and entry lines are Handlebars templates shared by both
//! output formats; format-specific markup comes from [`markup`].

mod error;
mod markup;

pub use error::RenderError;
pub use markup::{escape_slack, mask_mentions, mention, title_link, OutputFormat};

use crate::classify::{Category, ClassifiedPullRequest};
use crate::nicks::UsernameMap;
use crate::pull_requests::CiStatus;
use crate::queue::Queue;
use chrono::{DateTime, Utc};
use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde_json::{json, Value};
use tracing::debug;

const HEADER_TEMPLATE: &str = "header";
const ENTRY_TEMPLATE: &str = "entry";

const HEADER: &str = r#"{{#if (eq format "slack")}}{{emoji}} *{{title}}*{{else}}{{title}}{{/if}}"#;

const ENTRY: &str = concat!(
    r#"{{#if (eq format "slack")}}  • *{{repository}}*{{else}}  - {{repository}}{{/if}}"#,
    r#": {{link}} (+{{additions}}/-{{deletions}}){{#if ci}} {{ci}}{{/if}} (updated {{updated_days}}d ago)"#,
    r#"{{#if stale}}{{#if (eq format "slack")}} :hourglass_flowing_sand: _stale_{{else}} [stale]{{/if}}{{/if}}"#,
    r#"{{#if needs_update}}{{#if (eq format "slack")}} :warning: _update required_{{else}} [update required]{{/if}}{{/if}}"#,
    r#"{{#if mentions}} {{phrase}} {{mentions}}{{/if}}"#,
);

handlebars_helper!(str_eq: |a: str, b: str| a == b);

/// Renders review queues as text.
pub struct ReportRenderer {
    handlebars: Handlebars<'static>,
    now: DateTime<Utc>,
    jira_base_url: Option<String>,
}

impl std::fmt::Debug for ReportRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportRenderer")
            .field("now", &self.now)
            .field("jira_base_url", &self.jira_base_url)
            .finish_non_exhaustive()
    }
}

impl ReportRenderer {
    /// Creates a renderer that measures "updated N days ago" against `now`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Registration`] if a built-in template fails to
    /// compile.
    pub fn new(now: DateTime<Utc>) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars.set_strict_mode(true);
        handlebars.register_helper("eq", Box::new(str_eq));
        handlebars.register_template_string(HEADER_TEMPLATE, HEADER)?;
        handlebars.register_template_string(ENTRY_TEMPLATE, ENTRY)?;

        Ok(Self {
            handlebars,
            now,
            jira_base_url: None,
        })
    }

    /// Links leading Jira keys in titles to issues under `base_url`.
    #[must_use]
    pub fn with_jira_base_url(mut self, base_url: Option<String>) -> Self {
        self.jira_base_url = base_url;
        self
    }

    /// Renders a queue.
    ///
    /// Sections appear in category order and empty sections are omitted, so
    /// an empty queue renders as an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingSection`] if the queue lacks a category,
    /// or [`RenderError::Template`] if a template fails to render.
    pub fn render(
        &self,
        queue: &Queue,
        nicks: &UsernameMap,
        format: OutputFormat,
    ) -> Result<String, RenderError> {
        let mut sections = Vec::new();

        for category in Category::ALL {
            let entries = queue
                .section(category)
                .ok_or(RenderError::MissingSection(category))?;
            if entries.is_empty() {
                continue;
            }

            let mut lines = Vec::with_capacity(entries.len() + 1);
            lines.push(self.render_header(category, format)?);
            for entry in entries {
                lines.push(self.render_entry(entry, nicks, format)?);
            }
            sections.push(lines.join("\n"));
        }

        debug!(sections = sections.len(), entries = queue.len(), ?format, "Rendered report");
        Ok(sections.join("\n\n"))
    }

    fn render_header(&self, category: Category, format: OutputFormat) -> Result<String, RenderError> {
        let data = json!({
            "format": format_name(format),
            "title": category.title(),
            "emoji": category.emoji(),
        });
        self.render_template(HEADER_TEMPLATE, &data)
    }

    fn render_entry(
        &self,
        entry: &ClassifiedPullRequest,
        nicks: &UsernameMap,
        format: OutputFormat,
    ) -> Result<String, RenderError> {
        let pull_request = &entry.pull_request;
        let mentions: Vec<String> = entry
            .addressees
            .iter()
            .map(|login| mention(login, nicks, format))
            .collect();

        let data = json!({
            "format": format_name(format),
            "repository": pull_request.repository,
            "link": title_link(
                &pull_request.title,
                &pull_request.url,
                self.jira_base_url.as_deref(),
                format,
            ),
            "additions": pull_request.additions,
            "deletions": pull_request.deletions,
            "ci": pull_request.ci_status.map(CiStatus::emoji).unwrap_or_default(),
            "updated_days": pull_request.days_since_update(self.now),
            "stale": entry.stale,
            "needs_update": pull_request.needs_update,
            "phrase": entry.category.addressee_phrase(),
            "mentions": mentions.join(", "),
        });
        self.render_template(ENTRY_TEMPLATE, &data)
    }

    fn render_template(&self, name: &str, data: &Value) -> Result<String, RenderError> {
        Ok(self.handlebars.render(name, data)?)
    }
}

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Plain => "plain",
        OutputFormat::Slack => "slack",
    }
}
