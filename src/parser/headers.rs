//! Header section parsing and value normalization.
//!
//! Turns the raw header block into a validated [`Headers`] map: names are
//! checked against the token character class and lower-cased, values are
//! trimmed and (for most headers) split into comma-separated lists, and
//! repeated occurrences are merged or rejected per header.

use tokio::io::AsyncRead;
use tracing::debug;

use super::{ByteStream, ParseError};
use crate::http::Headers;

/// Headers for which a second occurrence in one message is a hard parse error
/// rather than a merge. A repeated framing or identity header is a smuggling
/// vector, not a list.
pub const NON_REPEATABLE_HEADERS: &[&str] = &[
    "date",
    "transfer-encoding",
    "content-length",
    "content-type",
    "expires",
    "host",
    "user-agent",
    "from",
    "authorization",
    "referer",
    "if-match",
    "if-none-match",
    "if-modified-since",
    "if-unmodified-since",
    "if-range",
];

/// Headers whose textual value legitimately contains commas and therefore is
/// never split into a comma-separated list.
pub const COMMA_LIST_EXEMPT_HEADERS: &[&str] = &["date", "user-agent"];

/// Where a header name sits in the HTTP/1.1 message grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCategory {
    /// Applies to the message as a whole (`Connection`, `Date`, ...).
    General,
    /// Qualifies the request or its client (`Host`, `Accept`, ...).
    Request,
    /// Describes the enclosed body (`Content-Length`, `Content-Type`, ...).
    Entity,
}

/// The defined HTTP/1.1 headers by grammar category. Anything not listed is
/// an extension header.
const KNOWN_HEADERS: &[(&str, HeaderCategory)] = &[
    ("cache-control", HeaderCategory::General),
    ("connection", HeaderCategory::General),
    ("date", HeaderCategory::General),
    ("pragma", HeaderCategory::General),
    ("trailer", HeaderCategory::General),
    ("transfer-encoding", HeaderCategory::General),
    ("upgrade", HeaderCategory::General),
    ("via", HeaderCategory::General),
    ("warning", HeaderCategory::General),
    ("accept", HeaderCategory::Request),
    ("accept-charset", HeaderCategory::Request),
    ("accept-encoding", HeaderCategory::Request),
    ("accept-language", HeaderCategory::Request),
    ("authorization", HeaderCategory::Request),
    ("expect", HeaderCategory::Request),
    ("from", HeaderCategory::Request),
    ("host", HeaderCategory::Request),
    ("if-match", HeaderCategory::Request),
    ("if-modified-since", HeaderCategory::Request),
    ("if-none-match", HeaderCategory::Request),
    ("if-range", HeaderCategory::Request),
    ("if-unmodified-since", HeaderCategory::Request),
    ("max-forwards", HeaderCategory::Request),
    ("proxy-authorization", HeaderCategory::Request),
    ("range", HeaderCategory::Request),
    ("referer", HeaderCategory::Request),
    ("te", HeaderCategory::Request),
    ("user-agent", HeaderCategory::Request),
    ("allow", HeaderCategory::Entity),
    ("content-encoding", HeaderCategory::Entity),
    ("content-language", HeaderCategory::Entity),
    ("content-length", HeaderCategory::Entity),
    ("content-location", HeaderCategory::Entity),
    ("content-md5", HeaderCategory::Entity),
    ("content-range", HeaderCategory::Entity),
    ("content-type", HeaderCategory::Entity),
    ("expires", HeaderCategory::Entity),
    ("last-modified", HeaderCategory::Entity),
];

/// Looks up the grammar category of a header name (case-insensitive).
/// Returns `None` for extension headers.
pub fn header_category(name: &str) -> Option<HeaderCategory> {
    let name = name.to_ascii_lowercase();
    KNOWN_HEADERS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, category)| *category)
}

/// Reads the header section off the stream and returns the finished map.
///
/// The map is only returned once every line has been validated — an error at
/// any point discards all intermediate state, so the caller never sees a
/// partially built header set. The empty line ends the section; the only
/// other way out is an error.
// TODO: cap the number of header fields one message may carry.
pub(crate) async fn parse_headers<R: AsyncRead + Unpin>(
    stream: &mut ByteStream<R>,
) -> Result<Headers, ParseError> {
    let mut headers = Headers::new();
    loop {
        let line = stream.read_header_line().await?;
        if line.is_empty() {
            break;
        }
        let line = String::from_utf8_lossy(&line);

        let (name, value) = split_header_line(&line)?;
        let values = normalize_value(&name, &value);

        if headers.contains(&name) && NON_REPEATABLE_HEADERS.contains(&name.as_str()) {
            return Err(ParseError::DuplicateHeader { name });
        }
        headers.append(name, values);
    }

    debug!(header_count = headers.len(), "header section parsed");
    Ok(headers)
}

/// Splits a raw header line on the first colon, validating and lower-casing
/// the name and trimming the value.
fn split_header_line(line: &str) -> Result<(String, String), ParseError> {
    let Some((name, value)) = line.split_once(':') else {
        return Err(ParseError::MissingColon {
            line: line.to_owned(),
        });
    };

    let name = name.trim().to_ascii_lowercase();
    if !is_valid_header_name(&name) {
        return Err(ParseError::InvalidHeaderName { name });
    }

    Ok((name, value.trim().to_owned()))
}

/// The HTTP token character class for header names.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '.' | '^' | '_' | '`' | '|' | '~' | '-'
        )
}

fn is_valid_header_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_token_char)
}

/// Normalizes a trimmed header value into its list of strings.
///
/// Comma-list-exempt headers keep the whole value as one string. Everything
/// else is split on commas with each piece trimmed; a wholly empty value
/// yields zero strings, while interior empty pieces are kept as empty strings.
fn normalize_value(name: &str, value: &str) -> Vec<String> {
    if COMMA_LIST_EXEMPT_HEADERS.contains(&name) {
        return vec![value.to_owned()];
    }
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(|piece| piece.trim().to_owned()).collect()
}
