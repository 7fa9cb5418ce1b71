/// A mail message reduced to what the analysis pipeline consumes.
/// Immutable once fetched; dropped after the pipeline has processed it.
#[derive(Debug, Clone, Default)]
pub struct FetchedMessage {
    pub subject: String,
    /// `YYYY-MM-DD`, empty when the Date header is missing or unparseable.
    pub date: String,
    /// Plain-text body. None when absent or blank.
    pub body_text: Option<String>,
    /// HTML body source. None when absent or blank.
    pub body_html: Option<String>,
    pub attachments: Vec<MailAttachment>,
}

/// A raw attachment as pulled off the wire. Owned by its message.
#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub payload: Vec<u8>,
}
