use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::GitProvider;
use super::types::*;
use crate::config::{Config, ReactionKind};
use crate::error::GptMyPrError;

const USER_AGENT: &str = "gptmypr-rs";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

/// GitHub provider implementation using raw reqwest for full API control.
pub struct GithubProvider {
    client: Client,
    /// Base URL for the GitHub API (supports Enterprise).
    base_url: String,
    token: String,
    /// Full repo name "owner/repo".
    repo_full: String,
}

impl GithubProvider {
    /// Create a provider bound to `repo_full` ("owner/repo").
    pub fn new(config: &Config, repo_full: &str) -> Result<Self, GptMyPrError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GptMyPrError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.github_api_base.clone(),
            token: config.github_token.clone(),
            repo_full: repo_full.to_string(),
        })
    }

    /// Send an authenticated request to an absolute URL.
    async fn api_request_url(
        &self,
        method: reqwest::Method,
        url: &str,
        accept: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, GptMyPrError> {
        let mut req = self
            .client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", accept)
            .header("User-Agent", USER_AGENT);

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(GptMyPrError::Http)?;
        Self::check_response(resp).await
    }

    /// Send an authenticated request to a path relative to the API base.
    async fn api_request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, GptMyPrError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        self.api_request_url(method, &url, JSON_MEDIA_TYPE, body)
            .await
    }

    /// Map a non-success status to the matching error kind.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, GptMyPrError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }

    /// Make an authenticated GET request to the GitHub API.
    async fn api_get(&self, path: &str) -> Result<serde_json::Value, GptMyPrError> {
        let resp = self.api_request(reqwest::Method::GET, path, None).await?;
        resp.json().await.map_err(GptMyPrError::Http)
    }

    /// Make a paginated GET request, collecting all pages of JSON arrays.
    ///
    /// Follows the `Link: <url>; rel="next"` header until no more pages.
    async fn api_get_all_pages(&self, path: &str) -> Result<Vec<serde_json::Value>, GptMyPrError> {
        let mut all_items = Vec::new();

        let resp = self.api_request(reqwest::Method::GET, path, None).await?;
        let mut next_url = parse_next_link(resp.headers());
        let page: serde_json::Value = resp.json().await.map_err(GptMyPrError::Http)?;
        if let Some(arr) = page.as_array() {
            all_items.extend(arr.iter().cloned());
        }

        while let Some(url) = next_url.take() {
            let resp = self
                .api_request_url(reqwest::Method::GET, &url, JSON_MEDIA_TYPE, None)
                .await?;
            next_url = parse_next_link(resp.headers());
            let page: serde_json::Value = resp.json().await.map_err(GptMyPrError::Http)?;
            if let Some(arr) = page.as_array() {
                all_items.extend(arr.iter().cloned());
            }
        }

        Ok(all_items)
    }

    /// Make an authenticated POST request to the GitHub API.
    async fn api_post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, GptMyPrError> {
        let resp = self
            .api_request(reqwest::Method::POST, path, Some(body))
            .await?;
        resp.json().await.map_err(GptMyPrError::Http)
    }

    /// `repos/{owner}/{repo}/contents/{path}?ref={git_ref}` with every path
    /// segment percent-encoded.
    fn contents_url(&self, path: &str, git_ref: &str) -> Result<Url, GptMyPrError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GptMyPrError::Other(format!("invalid GitHub API base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| GptMyPrError::Other("GitHub API base URL cannot be a base".into()))?
            .pop_if_empty()
            .push("repos")
            .extend(self.repo_full.split('/'))
            .push("contents")
            .extend(path.split('/').filter(|s| !s.is_empty()));
        url.query_pairs_mut().append_pair("ref", git_ref);
        Ok(url)
    }
}

#[async_trait]
impl GitProvider for GithubProvider {
    fn repo_full_name(&self) -> &str {
        &self.repo_full
    }

    async fn get_user_login(&self) -> Result<String, GptMyPrError> {
        let data = self.api_get("user").await?;
        Ok(data["login"].as_str().unwrap_or_default().to_string())
    }

    async fn get_repository(&self) -> Result<(), GptMyPrError> {
        let path = format!("repos/{}", self.repo_full);
        self.api_get(&path).await?;
        Ok(())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, GptMyPrError> {
        let path = format!("repos/{}/pulls/{}", self.repo_full, number);
        let data = self.api_get(&path).await?;
        parse_pull_request(&data)
    }

    async fn get_review_comments(&self, number: u64) -> Result<Vec<ReviewComment>, GptMyPrError> {
        let path = format!(
            "repos/{}/pulls/{}/comments?per_page=100",
            self.repo_full, number
        );
        let items = self.api_get_all_pages(&path).await?;
        Ok(items.iter().filter_map(parse_review_comment).collect())
    }

    async fn get_comment_reactions(
        &self,
        comment_id: u64,
    ) -> Result<Vec<CommentReaction>, GptMyPrError> {
        let path = format!(
            "repos/{}/pulls/comments/{}/reactions?per_page=100",
            self.repo_full, comment_id
        );
        let items = self.api_get_all_pages(&path).await?;
        Ok(items.iter().filter_map(parse_reaction).collect())
    }

    async fn create_comment_reaction(
        &self,
        comment_id: u64,
        reaction: ReactionKind,
    ) -> Result<(), GptMyPrError> {
        let path = format!(
            "repos/{}/pulls/comments/{}/reactions",
            self.repo_full, comment_id
        );
        self.api_post(&path, &json!({"content": reaction.as_str()}))
            .await?;
        Ok(())
    }

    async fn get_file_content(&self, path: &str, git_ref: &str) -> Result<String, GptMyPrError> {
        let url = self.contents_url(path, git_ref)?;
        let resp = self
            .api_request_url(reqwest::Method::GET, url.as_str(), JSON_MEDIA_TYPE, None)
            .await?;
        let data: serde_json::Value = resp.json().await.map_err(GptMyPrError::Http)?;

        match decode_content(&data)? {
            Some(content) => Ok(content),
            None => {
                // Files above 1 MB come back with `encoding: none`; ask for the raw body.
                tracing::debug!(path, "file too large for contents JSON, fetching raw");
                let resp = self
                    .api_request_url(reqwest::Method::GET, url.as_str(), RAW_MEDIA_TYPE, None)
                    .await?;
                let bytes = resp.bytes().await.map_err(GptMyPrError::Http)?;
                into_utf8(path, bytes.to_vec())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Status → error kind. 401 is a credentials problem, 404 a lookup miss.
fn status_error(status: StatusCode, body: &str) -> GptMyPrError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED => GptMyPrError::GithubAuth(message),
        StatusCode::NOT_FOUND => GptMyPrError::NotFound(format!("{status}: {message}")),
        _ => GptMyPrError::GitProvider(format!("GitHub API {status}: {message}")),
    }
}

fn parse_pull_request(data: &serde_json::Value) -> Result<PullRequest, GptMyPrError> {
    let number = data["number"]
        .as_u64()
        .ok_or_else(|| GptMyPrError::GitProvider("pull request response has no number".into()))?;
    let head_sha = data["head"]["sha"]
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GptMyPrError::GitProvider(format!("pull request {number} has no head SHA")))?
        .to_string();

    Ok(PullRequest {
        number,
        title: data["title"].as_str().unwrap_or_default().to_string(),
        head_sha,
        review_comments: data["review_comments"].as_u64().unwrap_or_default(),
    })
}

fn parse_review_comment(c: &serde_json::Value) -> Option<ReviewComment> {
    Some(ReviewComment {
        id: c["id"].as_u64()?,
        path: c["path"].as_str()?.to_string(),
        diff_hunk: c["diff_hunk"].as_str().unwrap_or_default().to_string(),
        body: c["body"].as_str().unwrap_or_default().to_string(),
    })
}

fn parse_reaction(r: &serde_json::Value) -> Option<CommentReaction> {
    Some(CommentReaction {
        user: r["user"]["login"].as_str()?.to_string(),
        content: r["content"].as_str()?.to_string(),
    })
}

/// Decode a contents API payload. `Ok(None)` means the body must be fetched raw.
fn decode_content(data: &serde_json::Value) -> Result<Option<String>, GptMyPrError> {
    let path = data["path"].as_str().unwrap_or_default();
    if data["type"].as_str().is_some_and(|t| t != "file") {
        return Err(GptMyPrError::GitProvider(format!("{path} is not a file")));
    }

    let content = data["content"]
        .as_str()
        .unwrap_or_default()
        .replace('\n', "");
    match data["encoding"].as_str().unwrap_or("") {
        "base64" => {
            let decoded = base64::engine::general_purpose::STANDARD
                .decode(&content)
                .map_err(|e| GptMyPrError::GitProvider(format!("invalid base64 for {path}: {e}")))?;
            into_utf8(path, decoded).map(Some)
        }
        "none" => Ok(None),
        _ => Ok(Some(content)),
    }
}

fn into_utf8(path: &str, bytes: Vec<u8>) -> Result<String, GptMyPrError> {
    String::from_utf8(bytes)
        .map_err(|_| GptMyPrError::GitProvider(format!("{path} is not valid UTF-8 text")))
}

/// Parse the `Link` header to find the `rel="next"` URL.
fn parse_next_link(headers: &reqwest::header::HeaderMap) -> Option<String> {
    let link = headers.get("link")?.to_str().ok()?;
    for part in link.split(',') {
        let part = part.trim();
        if part.contains(r#"rel="next""#) {
            let (_, rest) = part.split_once('<')?;
            let (url, _) = rest.split_once('>')?;
            return Some(url.to_string());
        }
    }
    None
}
