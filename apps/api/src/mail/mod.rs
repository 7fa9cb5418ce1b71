//! Mail scanner — fetches the most recent messages from a labeled IMAP folder.
//!
//! One invocation = one authenticated TLS session, logged out on every exit
//! path. Fetches use `BODY.PEEK[]` so scanning never flips `\Seen` flags.
//! Raw RFC822 payloads are parsed with mail-parser; a message that cannot be
//! parsed degrades to an empty subject-less message rather than failing the
//! whole scan.

use mail_parser::{MessageParser, MimeHeaders};
use native_tls::TlsConnector;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::message::{FetchedMessage, MailAttachment};

type TlsSession = imap::Session<native_tls::TlsStream<std::net::TcpStream>>;

/// Inputs for one folder scan.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub host: String,
    pub port: u16,
    pub account: String,
    pub credential: String,
    pub folder: String,
    pub limit: u32,
    pub newest_first: bool,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("could not reach mail server: {0}")]
    Connect(String),

    #[error("mail server rejected the credentials")]
    Authentication,

    #[error("folder '{0}' not found on the account")]
    FolderNotFound(String),

    #[error("mail protocol error: {0}")]
    Protocol(String),
}

/// Opens a session, selects the folder, and fetches the `limit` most recent
/// messages (newest first when `newest_first` is set).
///
/// Blocking I/O — callers on the async runtime wrap this in `spawn_blocking`.
pub fn fetch_folder(request: &FetchRequest) -> Result<Vec<FetchedMessage>, MailError> {
    let tls = TlsConnector::builder()
        .build()
        .map_err(|e| MailError::Connect(e.to_string()))?;

    let client = imap::connect(
        (request.host.as_str(), request.port),
        request.host.as_str(),
        &tls,
    )
    .map_err(|e| MailError::Connect(e.to_string()))?;

    let mut session = client
        .login(&request.account, &request.credential)
        .map_err(|(err, _client)| {
            debug!(error = %err, "imap login rejected");
            MailError::Authentication
        })?;

    // The session must be released on every path, so the fetch itself runs in
    // a helper and the logout happens unconditionally afterwards.
    let result = fetch_messages(&mut session, request);
    if let Err(err) = session.logout() {
        debug!(error = %err, "imap logout failed");
    }
    result
}

fn fetch_messages(
    session: &mut TlsSession,
    request: &FetchRequest,
) -> Result<Vec<FetchedMessage>, MailError> {
    let mailbox = session.select(&request.folder).map_err(|err| {
        debug!(error = %err, "folder select failed");
        MailError::FolderNotFound(request.folder.clone())
    })?;

    let Some(range) = fetch_window(mailbox.exists, request.limit) else {
        info!(folder = %request.folder, "folder is empty");
        return Ok(Vec::new());
    };
    debug!(%range, total = mailbox.exists, "fetching message window");

    let fetches = session
        .fetch(&range, "BODY.PEEK[]")
        .map_err(|e| MailError::Protocol(e.to_string()))?;

    let mut messages: Vec<FetchedMessage> = fetches
        .iter()
        .filter_map(|fetch| fetch.body())
        .map(parse_rfc822)
        .collect();

    if request.newest_first {
        messages.reverse();
    }

    info!(count = messages.len(), folder = %request.folder, "fetched messages");
    Ok(messages)
}

/// Sequence-set window covering the `limit` most recent messages, oldest
/// first (IMAP sequence numbers ascend with arrival). None when the folder
/// is empty.
fn fetch_window(total: u32, limit: u32) -> Option<String> {
    if total == 0 {
        return None;
    }
    let first = total.saturating_sub(limit.saturating_sub(1)).max(1);
    Some(format!("{first}:{total}"))
}

fn parse_rfc822(raw: &[u8]) -> FetchedMessage {
    let Some(parsed) = MessageParser::default().parse(raw) else {
        return FetchedMessage::default();
    };

    let subject = parsed.subject().unwrap_or_default().to_string();
    let date = parsed.date().map(format_date).unwrap_or_default();

    let body_text = parsed
        .body_text(0)
        .map(|body| body.into_owned())
        .filter(|body| !body.trim().is_empty());
    let body_html = parsed
        .body_html(0)
        .map(|body| body.into_owned())
        .filter(|body| !body.trim().is_empty());

    let attachments = parsed
        .attachments()
        .map(|part| MailAttachment {
            filename: part.attachment_name().unwrap_or_default().to_string(),
            payload: part.contents().to_vec(),
        })
        .collect();

    FetchedMessage {
        subject,
        date,
        body_text,
        body_html,
        attachments,
    }
}

fn format_date(date: &mail_parser::DateTime) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp(date.to_timestamp(), 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN_MAIL: &[u8] = b"From: jane@example.com\r\n\
To: hiring@example.com\r\n\
Subject: Application for the LSA role\r\n\
Date: Tue, 1 Jul 2025 10:00:00 +0000\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Hello, I am applying for the learning support position.\r\n";

    const MAIL_WITH_ATTACHMENT: &[u8] = b"From: jane@example.com\r\n\
To: hiring@example.com\r\n\
Subject: CV attached\r\n\
Date: Wed, 2 Jul 2025 09:30:00 +0000\r\n\
Content-Type: multipart/mixed; boundary=\"b\"\r\n\
\r\n\
--b\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Please find my CV attached.\r\n\
--b\r\n\
Content-Type: application/pdf; name=\"cv.pdf\"\r\n\
Content-Disposition: attachment; filename=\"cv.pdf\"\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
aGVsbG8=\r\n\
--b--\r\n";

    #[test]
    fn test_fetch_window_empty_folder() {
        assert_eq!(fetch_window(0, 10), None);
    }

    #[test]
    fn test_fetch_window_smaller_than_limit() {
        assert_eq!(fetch_window(3, 10), Some("1:3".to_string()));
    }

    #[test]
    fn test_fetch_window_takes_most_recent() {
        assert_eq!(fetch_window(100, 10), Some("91:100".to_string()));
        assert_eq!(fetch_window(10, 10), Some("1:10".to_string()));
    }

    #[test]
    fn test_parse_plain_mail() {
        let message = parse_rfc822(PLAIN_MAIL);

        assert_eq!(message.subject, "Application for the LSA role");
        assert_eq!(message.date, "2025-07-01");
        assert!(message
            .body_text
            .as_deref()
            .unwrap()
            .contains("learning support position"));
        assert!(message.attachments.is_empty());
    }

    #[test]
    fn test_parse_mail_with_attachment() {
        let message = parse_rfc822(MAIL_WITH_ATTACHMENT);

        assert_eq!(message.subject, "CV attached");
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].filename, "cv.pdf");
        assert_eq!(message.attachments[0].payload, b"hello");
    }

    #[test]
    fn test_unparseable_payload_degrades_to_empty_message() {
        let message = parse_rfc822(b"");

        assert!(message.subject.is_empty());
        assert!(message.attachments.is_empty());
    }
}
