//! Fetched feed documents and the snapshot file names derived from them.

use crate::transport::{FetchError, Response};
use anyhow::{bail, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const STATIONS_SUFFIX: &str = "_stations.json";
pub const STATUS_SUFFIX: &str = "_status.json";

/// A decoded JSON feed. Treated as opaque apart from `last_updated`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    source: String,
    value: Value,
}

impl FeedDocument {
    /// Require a 2xx status, then decode the body. Decode failures are fatal.
    pub fn from_response(resp: Response) -> Result<Self, FetchError> {
        let resp = resp.error_for_status()?;
        let value = resp.json::<Value>()?;
        Ok(Self {
            source: resp.url,
            value,
        })
    }

    pub fn from_value(source: impl Into<String>, value: Value) -> Self {
        Self {
            source: source.into(),
            value,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The `last_updated` field rendered as a file-name key.
    ///
    /// Integers and strings are used verbatim; anything else, a missing field,
    /// or a value that is empty or contains a path separator is an error.
    pub fn last_updated(&self) -> Result<String> {
        let key = match self.value.get("last_updated") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => bail!(
                "last_updated in {} has unsupported type: {}",
                self.source,
                other
            ),
            None => bail!("{} has no last_updated field", self.source),
        };
        if key.is_empty() || key.contains(&['/', '\\'][..]) || key == "." || key == ".." {
            bail!("last_updated {:?} from {} is not usable in a file name", key, self.source);
        }
        Ok(key)
    }
}

/// Output paths for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub stations: PathBuf,
    pub status: PathBuf,
}

/// `{dir}/{timestamp}_stations.json` and `{dir}/{timestamp}_status.json`.
pub fn snapshot_paths(dir: &Path, timestamp: &str) -> SnapshotPaths {
    SnapshotPaths {
        stations: dir.join(format!("{}{}", timestamp, STATIONS_SUFFIX)),
        status: dir.join(format!("{}{}", timestamp, STATUS_SUFFIX)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> FeedDocument {
        FeedDocument::from_value("http://feed.test/station_status.json", value)
    }

    #[test]
    fn integer_timestamp() {
        let d = doc(json!({"last_updated": 1700000000, "data": {}}));
        assert_eq!(d.last_updated().unwrap(), "1700000000");
    }

    #[test]
    fn string_timestamp() {
        let d = doc(json!({"last_updated": "2024-01-01T00:00:00"}));
        assert_eq!(d.last_updated().unwrap(), "2024-01-01T00:00:00");
    }

    #[test]
    fn missing_or_unusable_timestamp() {
        assert!(doc(json!({"stations": []})).last_updated().is_err());
        assert!(doc(json!({"last_updated": null})).last_updated().is_err());
        assert!(doc(json!({"last_updated": "../etc"})).last_updated().is_err());
        assert!(doc(json!({"last_updated": ""})).last_updated().is_err());
    }

    #[test]
    fn snapshot_names() {
        let p = snapshot_paths(Path::new("data"), "1700000000");
        assert_eq!(p.stations, Path::new("data/1700000000_stations.json"));
        assert_eq!(p.status, Path::new("data/1700000000_status.json"));
    }

    #[test]
    fn from_response_checks_status_then_decodes() {
        let ok = Response {
            url: "http://feed.test/a.json".to_string(),
            status: 200,
            headers: Vec::new(),
            body: br#"{"last_updated": 42}"#.to_vec(),
        };
        let d = FeedDocument::from_response(ok).unwrap();
        assert_eq!(d.value(), &json!({"last_updated": 42}));
        assert_eq!(d.source(), "http://feed.test/a.json");

        let not_found = Response {
            url: "http://feed.test/a.json".to_string(),
            status: 404,
            headers: Vec::new(),
            body: b"not found".to_vec(),
        };
        assert!(matches!(
            FeedDocument::from_response(not_found),
            Err(FetchError::Http { status: 404, .. })
        ));
    }
}
