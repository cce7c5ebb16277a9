//! Buffered HTTP response and header-line parsing.

use super::FetchError;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Final response of a GET: status, headers of the last hop, full body.
#[derive(Debug, Clone)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header with this name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `Retry-After` given as delta-seconds. HTTP-date values are ignored.
    pub fn retry_after(&self) -> Option<Duration> {
        self.header("retry-after")?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }

    /// Turn a non-2xx response into `FetchError::Http`.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Http {
                url: self.url,
                status: self.status,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|source| FetchError::Json {
            url: self.url.clone(),
            source,
        })
    }
}

/// Parse raw header lines collected by curl. With redirects curl reports every
/// hop, so only the block after the last status line is kept.
pub(crate) fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, headers: &[(&str, &str)], body: &str) -> Response {
        Response {
            url: "http://feed.test/x.json".to_string(),
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn parse_keeps_last_hop_only() {
        let lines = [
            "HTTP/1.1 301 Moved Permanently".to_string(),
            "Location: /other".to_string(),
            "".to_string(),
            "HTTP/1.1 200 OK".to_string(),
            "Content-Type: application/json".to_string(),
            "Retry-After: 3".to_string(),
        ];
        let h = parse_header_lines(&lines);
        assert_eq!(h.len(), 2);
        assert_eq!(h[0], ("Content-Type".to_string(), "application/json".to_string()));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let r = response(200, &[("Content-Type", "application/json")], "{}");
        assert_eq!(r.header("content-type"), Some("application/json"));
        assert_eq!(r.header("etag"), None);
    }

    #[test]
    fn retry_after_seconds_only() {
        assert_eq!(
            response(503, &[("Retry-After", "7")], "").retry_after(),
            Some(Duration::from_secs(7))
        );
        assert_eq!(
            response(503, &[("Retry-After", "Wed, 21 Oct 2015 07:28:00 GMT")], "").retry_after(),
            None
        );
    }

    #[test]
    fn error_for_status_rejects_non_2xx() {
        assert!(response(200, &[], "{}").error_for_status().is_ok());
        match response(404, &[], "").error_for_status() {
            Err(FetchError::Http { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn json_decode_failure_is_reported() {
        let r = response(200, &[], "{not json");
        let err = r.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, FetchError::Json { .. }));
        assert!(err.to_string().contains("invalid JSON"));
    }
}
