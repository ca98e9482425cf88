use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{GhdlError, Result};

/// Host serving the repository browser UI
pub const GITHUB_HOST: &str = "github.com";

/// Host serving unprocessed file bytes
pub const RAW_CONTENT_HOST: &str = "raw.githubusercontent.com";

/// Where a browser URL points inside a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    pub owner: String,
    pub repo: String,
    /// Branch, tag or commit taken from the URL
    pub reference: Option<String>,
    /// Path inside the repository, empty for the root
    pub path: String,
}

/// Parse a browser URL of the form
/// `https://github.com/<owner>/<repo>/(tree|blob)/<ref>/<path...>`
///
/// Everything after the ref segment is the in-repo path, joined with `/`.
pub fn parse_repo_url(raw: &str) -> Result<RepoLocation> {
    let url = parse_https(raw)?;

    if url.host_str() != Some(GITHUB_HOST) {
        return Err(GhdlError::invalid_url(raw, "must be a github.com URL"));
    }

    let parts = decoded_segments(raw, &url)?;
    if parts.len() < 4 || parts[..4].iter().any(|part| part.is_empty()) {
        return Err(GhdlError::invalid_url(
            raw,
            "expected github.com/<owner>/<repo>/(tree|blob)/<ref>/<path>",
        ));
    }

    let path = parts[4..]
        .iter()
        .filter(|segment| !segment.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("/");

    let mut parts = parts.into_iter();
    let owner = parts.next().unwrap_or_default();
    let repo = parts.next().unwrap_or_default();
    let reference = parts.nth(1);

    Ok(RepoLocation {
        owner,
        repo,
        reference,
        path,
    })
}

/// Path segments with percent-escapes decoded, outer slashes dropped
fn decoded_segments(raw: &str, url: &Url) -> Result<Vec<String>> {
    let segments = url
        .path_segments()
        .ok_or_else(|| GhdlError::invalid_url(raw, "URL has no path"))?;

    let mut parts = segments
        .map(|segment| {
            percent_decode_str(segment)
                .decode_utf8()
                .map(|decoded| decoded.into_owned())
                .map_err(|e| GhdlError::invalid_url(raw, e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    Ok(parts)
}

/// Validate a raw-content URL
pub fn parse_raw_url(raw: &str) -> Result<Url> {
    let url = parse_https(raw)?;

    match url.host_str() {
        Some(host) if host.starts_with(RAW_CONTENT_HOST) => Ok(url),
        _ => Err(GhdlError::invalid_url(
            raw,
            "must be a raw.githubusercontent.com URL",
        )),
    }
}

fn parse_https(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| GhdlError::invalid_url(raw, e.to_string()))?;

    if url.scheme() != "https" {
        return Err(GhdlError::invalid_url(raw, "scheme must be https"));
    }

    Ok(url)
}
