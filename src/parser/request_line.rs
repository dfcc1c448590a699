//! Request-line parsing: method, request-target, and protocol version.

use super::ParseError;
use crate::http::{Method, Version};

/// Parses `Method SP Request-Target SP HTTP-Version` and gates on the
/// supported version.
///
/// The line must split on single spaces into exactly three tokens. The
/// request-target token is accepted syntactically but not decomposed — it is
/// dropped at this hook point until a URI parser exists.
// TODO: decompose the request-target into scheme/authority/path/query and
// carry it on the Request instead of discarding it here.
pub(crate) fn parse(line: &str) -> Result<(Method, Version), ParseError> {
    let tokens: Vec<&str> = line.split(' ').collect();
    if tokens.len() != 3 {
        return Err(ParseError::MalformedRequestLine {
            line: line.to_owned(),
        });
    }

    let method = Method::from_token(tokens[0]).ok_or_else(|| ParseError::UnknownMethod {
        method: tokens[0].to_owned(),
    })?;

    let version = parse_version(tokens[2])?;
    if version != Version::HTTP_1_1 {
        return Err(ParseError::UnsupportedVersion {
            version: version.number(),
        });
    }

    Ok((method, version))
}

/// Parses an `HTTP/<decimal>` version token.
///
/// The token must be at least 8 characters, start with the literal `HTTP/`,
/// and the remainder must parse as a decimal number. Whether the number is a
/// version this crate supports is the caller's decision.
fn parse_version(token: &str) -> Result<Version, ParseError> {
    let malformed = || ParseError::MalformedVersion {
        version: token.to_owned(),
    };

    if token.len() < 8 || !token.starts_with("HTTP/") {
        return Err(malformed());
    }

    let number: f32 = token[5..].parse().map_err(|_| malformed())?;
    Ok(Version::new(number))
}
