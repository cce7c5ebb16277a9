//! SharePoint REST upload (`Files/add`) over libcurl.

use super::{Destination, UploadError, Uploader};
use std::path::Path;
use std::time::Duration;

/// Longest response body kept in `UploadError::Http`.
const ERROR_BODY_LIMIT: usize = 512;

/// Uploads files into a SharePoint document library folder, overwriting any
/// file of the same name. Authenticates with a bearer token.
#[derive(Clone)]
pub struct SharePointUploader {
    token: String,
    connect_timeout: Duration,
    timeout: Duration,
}

impl std::fmt::Debug for SharePointUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharePointUploader")
            .field("token", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SharePointUploader {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
        }
    }

    /// Read the bearer token from environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self, UploadError> {
        match std::env::var(var) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(token.trim())),
            _ => Err(UploadError::MissingToken(var.to_string())),
        }
    }

    /// REST endpoint that adds `file_name` to the destination folder.
    ///
    /// The folder is addressed by its server-relative URL: the site's path,
    /// then the library, then the folder.
    pub fn endpoint(dest: &Destination, file_name: &str) -> Result<String, UploadError> {
        let site = url::Url::parse(&dest.site_url)
            .map_err(|e| UploadError::InvalidDestination(format!("{}: {}", dest.site_url, e)))?;
        if !matches!(site.scheme(), "http" | "https") {
            return Err(UploadError::InvalidDestination(format!(
                "unsupported scheme in {}",
                dest.site_url
            )));
        }
        let library = dest.library.trim_matches('/');
        if library.is_empty() {
            return Err(UploadError::InvalidDestination("empty library".to_string()));
        }

        let mut relative = format!("{}/{}", site.path().trim_end_matches('/'), library);
        let folder = dest.folder.trim_matches('/');
        if !folder.is_empty() {
            relative.push('/');
            relative.push_str(folder);
        }

        let raw = format!(
            "{}/_api/web/GetFolderByServerRelativeUrl('{}')/Files/add(url='{}',overwrite=true)",
            dest.site_url.trim_end_matches('/'),
            odata_quote(&relative),
            odata_quote(file_name),
        );
        // Re-parse so spaces and other unsafe characters are percent-encoded.
        let url = url::Url::parse(&raw)
            .map_err(|e| UploadError::InvalidDestination(format!("{}: {}", raw, e)))?;
        Ok(url.to_string())
    }
}

/// Escape a value for use inside a single-quoted OData string literal.
fn odata_quote(s: &str) -> String {
    s.replace('\'', "''").replace('#', "%23")
}

impl Uploader for SharePointUploader {
    fn name(&self) -> &str {
        "sharepoint_upload"
    }

    fn upload(&self, dest: &Destination, path: &Path) -> Result<(), UploadError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| UploadError::InvalidDestination(format!("bad file name: {}", path.display())))?;
        let endpoint = Self::endpoint(dest, file_name)?;
        let bytes = std::fs::read(path).map_err(|source| UploadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut response: Vec<u8> = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(&endpoint)?;
        easy.post(true)?;
        easy.post_fields_copy(&bytes)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        let mut list = curl::easy::List::new();
        list.append(&format!("Authorization: Bearer {}", self.token))?;
        list.append("Accept: application/json;odata=verbose")?;
        list.append("Content-Type: application/octet-stream")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()? as u16;
        if !(200..300).contains(&status) {
            let mut body = String::from_utf8_lossy(&response).into_owned();
            if body.len() > ERROR_BODY_LIMIT {
                let mut cut = ERROR_BODY_LIMIT;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(UploadError::Http { status, body });
        }

        tracing::debug!(
            file = file_name,
            bytes = bytes.len(),
            status,
            "uploaded to SharePoint"
        );
        Ok(())
    }
}
