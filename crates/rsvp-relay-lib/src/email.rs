//! Notification email composed from a submission.

use serde::Serialize;

use crate::config::RelayConfig;
use crate::escape::escape_html;
use crate::submission::RsvpSubmission;

/// Shown in place of an empty wish.
const EMPTY_WISH: &str = "—";

/// Provider request body for a single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl NotificationEmail {
    /// Compose the notification for `submission`.
    ///
    /// `source_url` is the reconstructed guest link from
    /// [`RsvpSubmission::source_url`].
    pub fn compose(config: &RelayConfig, submission: &RsvpSubmission, source_url: &str) -> Self {
        Self {
            from: config.sender.clone(),
            to: vec![config.recipient.clone()],
            subject: subject_for(submission),
            html: render_html(submission, source_url),
        }
    }
}

/// Subject line: the greeting, else the couple's names, else the slug.
pub fn subject_for(submission: &RsvpSubmission) -> String {
    let topic = [
        submission.greeting.as_str(),
        submission.couple_names.as_str(),
    ]
    .into_iter()
    .find(|candidate| !candidate.is_empty())
    .unwrap_or(submission.slug.as_str());

    format!("RSVP: {}", topic)
}

/// Render the HTML body. Every interpolated value goes through [`escape_html`].
pub fn render_html(submission: &RsvpSubmission, source_url: &str) -> String {
    let wish = if submission.wish.is_empty() {
        EMPTY_WISH
    } else {
        submission.wish.as_str()
    };

    format!(
        concat!(
            "<h2>Новый RSVP-ответ</h2>\n",
            "<p><b>Slug:</b> {slug}</p>\n",
            "<p><b>Ссылка гостя:</b> {source_url}</p>\n",
            "<p><b>Страница:</b> {title}</p>\n",
            "<p><b>Пара:</b> {couple}</p>\n",
            "<p><b>Приветствие:</b> {greeting}</p>\n",
            "<hr />\n",
            "<p><b>Присутствие:</b> {attendance}</p>\n",
            "<p><b>Пожелание:</b><br/>{wish}</p>\n",
        ),
        slug = escape_html(&submission.slug),
        source_url = escape_html(source_url),
        title = escape_html(&submission.invitation_title),
        couple = escape_html(&submission.couple_names),
        greeting = escape_html(&submission.greeting),
        attendance = escape_html(&submission.attendance),
        wish = escape_html(wish),
    )
}
