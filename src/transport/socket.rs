//! Transport speaking HTTP/1.1 directly over TCP, with rustls for HTTPS.
//!
//! One connection per request (`Connection: close`), read until the framed
//! body is complete or the peer closes. Redirects are returned as-is.

use async_trait::async_trait;
use rustls::pki_types::ServerName;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::instrument;
use url::Url;

use super::{build_url, merge_headers, tls, HttpMethod, HttpRequest, HttpTransport};
use crate::errors::{SumUpError, SumUpResult};
use crate::observability::{log_request, log_response};
use crate::response::{Response, ResponseBody};

const READ_CHUNK: usize = 8 * 1024;

/// Headers computed by the transport itself.
const MANAGED_HEADERS: [&str; 4] = ["host", "content-length", "connection", "transfer-encoding"];

/// HTTP/1.1 transport over raw sockets.
pub struct SocketTransport {
    base_url: String,
    custom_headers: Vec<(String, String)>,
    tls: Arc<rustls::ClientConfig>,
}

impl SocketTransport {
    /// Creates a new transport.
    pub fn new(
        base_url: impl Into<String>,
        custom_headers: Vec<(String, String)>,
        ca_bundle_path: Option<&Path>,
    ) -> SumUpResult<Self> {
        Ok(Self {
            base_url: base_url.into(),
            custom_headers,
            tls: tls::client_config(ca_bundle_path)?,
        })
    }

    async fn exchange(&self, url: &Url, request: &[u8]) -> SumUpResult<Vec<u8>> {
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(SumUpError::configuration(format!(
                "Unsupported URL scheme: {}",
                scheme
            )));
        }

        let host = url
            .host_str()
            .ok_or_else(|| SumUpError::configuration(format!("URL has no host: {}", url)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| SumUpError::configuration(format!("URL has no port: {}", url)))?;
        let connect_host = host.trim_start_matches('[').trim_end_matches(']');

        let stream = TcpStream::connect((connect_host, port))
            .await
            .map_err(|e| {
                SumUpError::connection(format!("Failed to connect to {}:{}: {}", host, port, e))
            })?;

        if scheme == "https" {
            let server_name = ServerName::try_from(connect_host.to_string())
                .map_err(|_| SumUpError::configuration(format!("Invalid server name: {}", host)))?;
            let mut stream = TlsConnector::from(self.tls.clone())
                .connect(server_name, stream)
                .await
                .map_err(|e| SumUpError::connection(format!("TLS handshake failed: {}", e)))?;
            round_trip(&mut stream, request).await
        } else {
            let mut stream = stream;
            round_trip(&mut stream, request).await
        }
    }
}

impl std::fmt::Debug for SocketTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketTransport")
            .field("base_url", &self.base_url)
            .field("custom_headers", &self.custom_headers.len())
            .finish()
    }
}

#[async_trait]
impl HttpTransport for SocketTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: HttpRequest) -> SumUpResult<Response> {
        let url = Url::parse(&build_url(&self.base_url, &request.path))?;
        let payload = request.payload()?;
        let headers = merge_headers(&request.headers, &self.custom_headers);
        let raw_request = encode_request(request.method, &url, &headers, payload.as_deref())?;

        log_request(request.method.as_str(), url.as_str(), &headers, request.body.as_ref());

        let started = Instant::now();
        let raw_response = self.exchange(&url, &raw_request).await?;
        let parsed = parse_response(&raw_response)?;

        log_response(parsed.status, parsed.body.len(), started.elapsed());

        Response::new(parsed.status, ResponseBody::from_bytes(parsed.body))
    }
}

async fn round_trip<S>(stream: &mut S, request: &[u8]) -> SumUpResult<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream
        .write_all(request)
        .await
        .map_err(|e| SumUpError::connection(format!("Failed to send request: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| SumUpError::connection(format!("Failed to send request: {}", e)))?;

    let mut raw = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                raw.extend_from_slice(&chunk[..n]);
                if response_complete(&raw) {
                    break;
                }
            }
            // Peers that close without close_notify.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && !raw.is_empty() => break,
            Err(e) => {
                return Err(SumUpError::connection(format!(
                    "Failed to read response: {}",
                    e
                )))
            }
        }
    }

    if raw.is_empty() {
        return Err(SumUpError::connection("Connection closed without response"));
    }

    Ok(raw)
}

/// Serializes a request head and body.
fn encode_request(
    method: HttpMethod,
    url: &Url,
    headers: &[(String, String)],
    payload: Option<&[u8]>,
) -> SumUpResult<Vec<u8>> {
    let host = url
        .host_str()
        .ok_or_else(|| SumUpError::configuration(format!("URL has no host: {}", url)))?;
    let host = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut head = format!("{} {} HTTP/1.1\r\nHost: {}\r\n", method, target, host);

    for (name, value) in headers {
        if MANAGED_HEADERS
            .iter()
            .any(|managed| name.eq_ignore_ascii_case(managed))
        {
            continue;
        }
        if name.is_empty() || has_line_break(name) || has_line_break(value) {
            return Err(SumUpError::argument(format!("Invalid header: {}", name)));
        }
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }

    let body = payload.unwrap_or_default();
    if payload.is_some() || matches!(method, HttpMethod::Post | HttpMethod::Put) {
        head.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    head.push_str("Connection: close\r\n\r\n");

    let mut bytes = head.into_bytes();
    bytes.extend_from_slice(body);
    Ok(bytes)
}

fn has_line_break(s: &str) -> bool {
    s.contains('\r') || s.contains('\n')
}

#[derive(Debug)]
struct RawResponse {
    status: u16,
    body: Vec<u8>,
}

fn malformed(detail: &str) -> SumUpError {
    SumUpError::sdk(format!("Malformed HTTP response: {}", detail), None)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// How the body of a response is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    Chunked,
    Length(usize),
    UntilClose,
}

struct Head<'a> {
    status: u16,
    framing: Framing,
    rest: &'a [u8],
}

/// Parses a status line and headers. `None` until the head is fully buffered.
fn parse_head(raw: &[u8]) -> SumUpResult<Option<Head<'_>>> {
    let Some(head_end) = find(raw, b"\r\n\r\n") else {
        return Ok(None);
    };
    let head = std::str::from_utf8(&raw[..head_end]).map_err(|_| malformed("non UTF-8 header"))?;
    let rest = &raw[head_end + 4..];

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(malformed("invalid status line"));
    }
    let status: u16 = parts
        .next()
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| malformed("invalid status code"))?;

    let mut framing = Framing::UntilClose;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("transfer-encoding") {
            if value.to_ascii_lowercase().contains("chunked") {
                framing = Framing::Chunked;
            }
        } else if name.eq_ignore_ascii_case("content-length") && framing != Framing::Chunked {
            let length = value.parse().map_err(|_| malformed("invalid content length"))?;
            framing = Framing::Length(length);
        }
    }

    Ok(Some(Head {
        status,
        framing,
        rest,
    }))
}

/// Whether the buffered bytes already hold a whole final response.
fn response_complete(raw: &[u8]) -> bool {
    match parse_head(raw) {
        Ok(Some(head)) if (100..200).contains(&head.status) => response_complete(head.rest),
        Ok(Some(head)) if head.status == 204 || head.status == 304 => true,
        Ok(Some(head)) => match head.framing {
            Framing::Chunked => decode_chunked(head.rest).is_ok(),
            Framing::Length(length) => head.rest.len() >= length,
            Framing::UntilClose => false,
        },
        // Malformed heads are reported by `parse_response` once the peer closes.
        Ok(None) | Err(_) => false,
    }
}

/// Parses a complete HTTP/1.x response.
fn parse_response(raw: &[u8]) -> SumUpResult<RawResponse> {
    let head = parse_head(raw)?.ok_or_else(|| malformed("missing header terminator"))?;

    // Interim responses precede the final one.
    if (100..200).contains(&head.status) {
        return parse_response(head.rest);
    }

    let body = match head.framing {
        Framing::Chunked => decode_chunked(head.rest)?,
        Framing::Length(length) => {
            if head.rest.len() < length {
                return Err(malformed("truncated body"));
            }
            head.rest[..length].to_vec()
        }
        Framing::UntilClose => head.rest.to_vec(),
    };

    Ok(RawResponse {
        status: head.status,
        body,
    })
}

fn decode_chunked(mut data: &[u8]) -> SumUpResult<Vec<u8>> {
    let mut body = Vec::new();

    loop {
        let line_end = find(data, b"\r\n").ok_or_else(|| malformed("missing chunk size"))?;
        let size_line =
            std::str::from_utf8(&data[..line_end]).map_err(|_| malformed("invalid chunk size"))?;
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size =
            usize::from_str_radix(size_hex, 16).map_err(|_| malformed("invalid chunk size"))?;
        data = &data[line_end + 2..];

        if size == 0 {
            break;
        }
        if data.len() < size {
            return Err(malformed("truncated chunk"));
        }
        body.extend_from_slice(&data[..size]);
        data = data[size..]
            .strip_prefix(&b"\r\n"[..])
            .ok_or_else(|| malformed("missing chunk terminator"))?;
    }

    Ok(body)
}
