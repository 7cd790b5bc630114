//! Media picker to editor hand-off.
//!
//! A media picker never calls into the editor directly. It is given a
//! [`MediaSender`] for one edit session and posts selections; the session
//! applies them to its selected block when it drains the channel.

use tokio::sync::mpsc;

/// An asset chosen in the media library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSelection {
    pub url: String,
    pub alt: Option<String>,
}

impl MediaSelection {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: None,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// `<img>` markup for insertion into rich text
    pub fn to_html(&self) -> String {
        format!(
            r#"<img src="{}" alt="{}">"#,
            escape_attr(&self.url),
            escape_attr(self.alt.as_deref().unwrap_or_default())
        )
    }
}

/// Sending half of a session's media channel
#[derive(Debug, Clone)]
pub struct MediaSender {
    tx: mpsc::UnboundedSender<MediaSelection>,
}

impl MediaSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<MediaSelection>) -> Self {
        Self { tx }
    }

    /// Post a selection. Returns false once the session is gone.
    pub fn send(&self, selection: MediaSelection) -> bool {
        self.tx.send(selection).is_ok()
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}
