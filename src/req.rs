use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::error::CustomError;

const MAX_HEAD_LINES: usize = 100;
const MAX_LINE_BYTES: usize = 8 * 1024;
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum Method {
    GET,
    POST,
    OPTIONS,
}

impl TryFrom<&str> for Method {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, anyhow::Error> {
        match value {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "OPTIONS" => Ok(Method::OPTIONS),
            _ => Err(anyhow::anyhow!("Method not supported")),
        }
    }
}

#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub headers: HashMap<String, String>,
    /// Framing errors fail `Request::new`; a bad body only fails here.
    pub body: Result<String, CustomError>,
}

impl Request {
    pub async fn new<Reader>(reader: Reader) -> Result<Self>
    where
        Reader: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);

        // Method and path
        let mut first = String::new();
        read_head_line(&mut reader, &mut first)
            .await
            .context("Failed to read request line")?;
        let mut request_parts = first.split_whitespace();
        let method: Method = request_parts
            .next()
            .ok_or(anyhow::anyhow!("missing method"))
            .and_then(TryInto::try_into)
            .context("Missing Method")?;
        let target = request_parts.next().context("No Path")?;
        let path = target.split('?').next().unwrap_or(target);

        // Headers
        let mut headers = HashMap::new();
        let mut line = String::new();
        for _ in 0..MAX_HEAD_LINES {
            line.clear();
            if read_head_line(&mut reader, &mut line).await? == 0 {
                break;
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                break;
            }
            if let Some((k, v)) = line.split_once(':') {
                headers.insert(k.trim().to_lowercase(), v.trim().to_string());
            }
        }

        let body = read_body(&mut reader, headers.get("content-length")).await;

        Ok(Request {
            method,
            path: path.into(),
            headers,
            body,
        })
    }
}

/// Reads one line, refusing to buffer more than `MAX_LINE_BYTES`.
async fn read_head_line<Reader>(reader: &mut Reader, line: &mut String) -> Result<usize>
where
    Reader: AsyncBufRead + Unpin,
{
    let read = (&mut *reader)
        .take(MAX_LINE_BYTES as u64)
        .read_line(line)
        .await?;
    if read == MAX_LINE_BYTES && !line.ends_with('\n') {
        bail!("Header line too long");
    }
    Ok(read)
}

async fn read_body<Reader>(
    reader: &mut Reader,
    content_length: Option<&String>,
) -> Result<String, CustomError>
where
    Reader: AsyncRead + Unpin,
{
    let length = match content_length {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| CustomError::BodyError(format!("invalid Content-Length '{value}'")))?,
        None => 0,
    };
    if length > MAX_BODY_BYTES {
        return Err(CustomError::BodyError(format!("too large: {length} bytes")));
    }
    let mut body = vec![0; length];
    reader
        .read_exact(&mut body)
        .await
        .map_err(|_| CustomError::BodyError("truncated".to_string()))?;
    String::from_utf8(body).map_err(|_| CustomError::BodyError("not UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_post_with_body() {
        let raw = concat!(
            "POST /exec HTTP/1.1\r\n",
            "Host: localhost\r\n",
            "Content-Type: text/plain;charset=UTF-8\r\n",
            "Content-Length: 14\r\n\r\n",
            "{\"action\":\"x\"}"
        );
        let request = Request::new(raw.as_bytes()).await.unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/exec");
        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some("text/plain;charset=UTF-8")
        );
        assert_eq!(request.body.unwrap(), "{\"action\":\"x\"}");
    }

    #[tokio::test]
    async fn strips_query_string() {
        let raw = "GET /exec?ping=1 HTTP/1.1\r\n\r\n";
        let request = Request::new(raw.as_bytes()).await.unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/exec");
        assert!(request.body.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_method() {
        let raw = "DELETE /exec HTTP/1.1\r\n\r\n";
        assert!(Request::new(raw.as_bytes()).await.is_err());
    }

    #[tokio::test]
    async fn truncated_body_is_a_body_error() {
        let raw = "POST /exec HTTP/1.1\r\nContent-Length: 50\r\n\r\n{}";
        let request = Request::new(raw.as_bytes()).await.unwrap();
        assert!(matches!(request.body, Err(CustomError::BodyError(_))));
    }

    #[tokio::test]
    async fn oversized_body_is_a_body_error() {
        let raw = format!(
            "POST /exec HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_BYTES + 1
        );
        let request = Request::new(raw.as_bytes()).await.unwrap();
        assert!(matches!(request.body, Err(CustomError::BodyError(_))));
    }

    #[tokio::test]
    async fn non_utf8_body_is_a_body_error() {
        let mut raw = b"POST /exec HTTP/1.1\r\nContent-Length: 3\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0xff, 0xfe, b'{']);
        let request = Request::new(raw.as_slice()).await.unwrap();
        let error = request.body.unwrap_err();
        assert_eq!(format!("{:?}", error), "Invalid request body: not UTF-8");
    }

    #[tokio::test]
    async fn rejects_endless_request_line() {
        let raw = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(MAX_LINE_BYTES));
        assert!(Request::new(raw.as_bytes()).await.is_err());
    }

    #[tokio::test]
    async fn rejects_endless_header_line() {
        let raw = format!(
            "GET /exec HTTP/1.1\r\nX-Filler: {}\r\n\r\n",
            "b".repeat(MAX_LINE_BYTES)
        );
        assert!(Request::new(raw.as_bytes()).await.is_err());
    }
}
