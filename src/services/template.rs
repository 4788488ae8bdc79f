use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::models::submission::FormSubmission;

const SUBMITTED_AT_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:short] [day], [year] [hour]:[minute]:[second] UTC");

/// Escapes text for interpolation into HTML, mapping `&`, `<`, `>`, `"` and
/// `'` to entity references.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Renders the notification email body for a form submission. All
/// user-supplied text is escaped; newlines in the message become `<br>`.
/// The phone paragraph is emitted only when a phone number was provided.
pub fn render_submission_email(submission: &FormSubmission) -> String {
    let phone_block = submission
        .phone
        .as_deref()
        .map(|phone| format!("<p><strong>Phone:</strong> {}</p>\n", escape_html(phone)))
        .unwrap_or_default();

    let message = escape_html(&submission.message).replace('\n', "<br>");
    let submitted_at = submission
        .submitted_at
        .format(SUBMITTED_AT_FORMAT)
        .unwrap_or_default();

    format!(
        "<html>\n<body>\n\
         <p><strong>Name:</strong> {name}</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         {phone_block}\
         <p><strong>Message:</strong></p>\n\
         <p>{message}</p>\n\
         <hr>\n\
         <p><em>Submitted at: {submitted_at}</em></p>\n\
         </body>\n</html>",
        name = escape_html(&submission.name),
        email = escape_html(&submission.email),
    )
}
