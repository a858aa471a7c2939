//! Just enough HTTP/1.1 for one JSON POST per connection.

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const MAX_HEADER_BYTES: usize = 8 * 1024;
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("connection closed before the request was complete")]
    Closed,

    #[error("malformed request: {0}")]
    Malformed(&'static str),

    #[error("request header too large")]
    HeaderTooLarge,

    #[error("request body of {0} bytes is too large")]
    BodyTooLarge(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HttpError {
    /// Status to answer with, if the peer is still worth answering
    pub fn status_code(&self) -> Option<u16> {
        match self {
            HttpError::Malformed(_) => Some(400),
            HttpError::BodyTooLarge(_) => Some(413),
            HttpError::HeaderTooLarge => Some(431),
            HttpError::Closed | HttpError::Io(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

/// Read one request: request line, headers, then `Content-Length` bytes of body.
pub async fn read_request<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Request, HttpError> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
        if buf.len() > MAX_HEADER_BYTES {
            return Err(HttpError::HeaderTooLarge);
        }
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(HttpError::Closed);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    if header_end > MAX_HEADER_BYTES {
        return Err(HttpError::HeaderTooLarge);
    }

    let header = std::str::from_utf8(&buf[..header_end])
        .map_err(|_| HttpError::Malformed("header is not UTF-8"))?;
    let (method, target) =
        parse_request_line(header).ok_or(HttpError::Malformed("bad request line"))?;
    let method = method.to_string();
    let path = target_path(target).to_string();

    let content_length = parse_content_length(header)?.unwrap_or(0);
    if content_length > MAX_BODY_BYTES {
        return Err(HttpError::BodyTooLarge(content_length));
    }

    let mut body = buf.split_off(header_end + 4);
    while body.len() < content_length {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(HttpError::Closed);
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);

    Ok(Request { method, path, body })
}

pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    status: u16,
    body: &[u8],
) -> std::io::Result<()> {
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason_phrase(status),
        body.len()
    );
    writer.write_all(head.as_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        _ => "",
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

fn parse_request_line(header: &str) -> Option<(&str, &str)> {
    let first_line = header.lines().next()?;
    let mut parts = first_line.split_ascii_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    let version = parts.next()?;
    if !version.starts_with("HTTP/1.") {
        return None;
    }
    Some((method, target))
}

fn parse_content_length(header: &str) -> Result<Option<usize>, HttpError> {
    let mut content_length = None;

    for line in header.lines().skip(1) {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };

        if name.trim().eq_ignore_ascii_case("transfer-encoding") {
            return Err(HttpError::Malformed("transfer-encoding is not supported"));
        }

        if !name.trim().eq_ignore_ascii_case("content-length") {
            continue;
        }

        let parsed = value
            .trim()
            .parse::<usize>()
            .map_err(|_| HttpError::Malformed("invalid content-length"))?;

        if content_length.is_some() {
            return Err(HttpError::Malformed("duplicate content-length"));
        }

        content_length = Some(parsed);
    }

    Ok(content_length)
}

fn target_path(target: &str) -> &str {
    target.split('?').next().unwrap_or(target)
}
