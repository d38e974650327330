//! GitHub REST backend: list repository tags, create tag refs.

use crate::error::{Result, TaggerError};
use crate::git::{TagCollector, TagListing, TagRepository, TagWindow};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(30);
const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Serialize)]
struct CreateRefPayload<'a> {
    #[serde(rename = "ref")]
    reference: String,
    sha: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Tags of one GitHub repository (`OWNER/REPO`)
pub struct GitHubRepository {
    agent: ureq::Agent,
    api_url: String,
    slug: String,
    token: String,
}

impl GitHubRepository {
    /// Connect to `repo` on github.com
    pub fn new(repo: &str, token: &str) -> Result<Self> {
        Self::with_api_url(DEFAULT_API_URL, repo, token)
    }

    /// Connect through a specific API base URL (GitHub Enterprise, test servers).
    ///
    /// Fails before any request is made when the token is empty or the
    /// repository is not an `OWNER/REPO` slug.
    pub fn with_api_url(api_url: &str, repo: &str, token: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(TaggerError::authentication(
                "GitHub token not provided (set the github_token input)",
            ));
        }
        let valid_slug = matches!(
            repo.split_once('/'),
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
        );
        if !valid_slug {
            return Err(TaggerError::config(format!(
                "invalid repository '{}' (expected OWNER/REPO)",
                repo
            )));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .timeout_write(WRITE_TIMEOUT)
            .user_agent(concat!("release-tagger/", env!("CARGO_PKG_VERSION")))
            .build();

        Ok(GitHubRepository {
            agent,
            api_url: api_url.trim_end_matches('/').to_string(),
            slug: repo.to_string(),
            token: token.trim().to_string(),
        })
    }

    fn authorize(&self, request: ureq::Request) -> ureq::Request {
        request
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", API_VERSION)
            .set("Authorization", &format!("Bearer {}", self.token))
    }
}

impl TagRepository for GitHubRepository {
    fn list_tags(&self, window: Option<&TagWindow>) -> Result<TagListing> {
        let mut next = Some(format!(
            "{}/repos/{}/tags?per_page={}",
            self.api_url, self.slug, PER_PAGE
        ));
        let mut collector = TagCollector::new(window);
        let mut page = 0usize;

        while let Some(url) = next.take() {
            page += 1;
            let response = self
                .authorize(self.agent.get(&url))
                .call()
                .map_err(|err| match describe(err) {
                    (Some(401 | 403), message) => TaggerError::authentication(message),
                    (_, message) => {
                        TaggerError::remote(format!("listing tags of {}: {}", self.slug, message))
                    }
                })?;

            let link = response.header("Link").map(str::to_string);
            let entries: Vec<TagEntry> = response.into_json().map_err(|e| {
                TaggerError::remote(format!("unexpected tag listing from {}: {}", url, e))
            })?;
            tracing::debug!(page, count = entries.len(), "fetched tag page");

            for entry in entries {
                if !collector.push(entry.name) {
                    return Ok(collector.finish(true));
                }
            }
            next = link.as_deref().and_then(next_page_link);
            if collector.is_full() {
                return Ok(collector.finish(next.is_some()));
            }
        }

        Ok(collector.finish(false))
    }

    fn create_tag(&self, name: &str, target: &str) -> Result<()> {
        let url = format!("{}/repos/{}/git/refs", self.api_url, self.slug);
        let payload = CreateRefPayload {
            reference: format!("refs/tags/{}", name),
            sha: target,
        };

        self.authorize(self.agent.post(&url))
            .send_json(&payload)
            .map_err(|err| match describe(err) {
                (Some(401 | 403), message) => TaggerError::authentication(message),
                (_, message) => TaggerError::remote_create(name, message),
            })?;

        tracing::debug!(tag = name, sha = target, repo = %self.slug, "created tag ref");
        Ok(())
    }
}

/// Split a ureq error into the HTTP status (if any) and a readable message
/// that keeps GitHub's own wording.
fn describe(err: ureq::Error) -> (Option<u16>, String) {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = serde_json::from_str::<ApiMessage>(&body)
                .map(|api| api.message)
                .unwrap_or(body);
            (Some(code), format!("HTTP {}: {}", code, message.trim()))
        }
        ureq::Error::Transport(transport) => (None, transport.to_string()),
    }
}

/// Extract the `rel="next"` URL from a `Link` header.
pub fn next_page_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let url = pieces.next()?.trim();
        let is_next = pieces.any(|param| param.trim() == r#"rel="next""#);
        if is_next {
            url.strip_prefix('<')
                .and_then(|u| u.strip_suffix('>'))
                .map(str::to_string)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TagFormat;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc::{self, Receiver};
    use std::thread;

    fn read_request(stream: &mut TcpStream) -> String {
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).unwrap_or(0);
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data).into_owned();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (key, value) = line.split_once(':')?;
                        if key.trim().eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    /// Serve the responses in order, one per connection, reporting each request.
    fn serve<F>(build: F) -> (String, Receiver<String>)
    where
        F: FnOnce(&str) -> Vec<String>,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let responses = build(&base);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for response in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let request = read_request(&mut stream);
                let _ = tx.send(request);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        (base, rx)
    }

    fn http(status: &str, extra_headers: &[String], body: &str) -> String {
        let mut response = format!("HTTP/1.1 {}\r\nConnection: close\r\n", status);
        response.push_str("Content-Type: application/json\r\n");
        for header in extra_headers {
            response.push_str(header);
            response.push_str("\r\n");
        }
        response.push_str(&format!("Content-Length: {}\r\n\r\n{}", body.len(), body));
        response
    }

    #[test]
    fn test_next_page_link() {
        let header = r#"<https://api.github.com/repositories/1/tags?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/tags?per_page=100&page=5>; rel="last""#;
        assert_eq!(
            next_page_link(header).as_deref(),
            Some("https://api.github.com/repositories/1/tags?per_page=100&page=2")
        );
    }

    #[test]
    fn test_next_page_link_on_last_page() {
        let header = r#"<https://api.github.com/repositories/1/tags?page=1>; rel="prev", <https://api.github.com/repositories/1/tags?page=1>; rel="first""#;
        assert_eq!(next_page_link(header), None);
    }

    #[test]
    fn test_rejects_missing_token() {
        let err = GitHubRepository::new("octo/demo", "  ").err().unwrap();
        assert!(matches!(err, TaggerError::Authentication(_)));
    }

    #[test]
    fn test_rejects_bad_slug() {
        for slug in ["octo", "/demo", "octo/", "a/b/c"] {
            let err = GitHubRepository::new(slug, "token").err().unwrap();
            assert!(matches!(err, TaggerError::Config(_)), "slug {:?}", slug);
        }
    }

    #[test]
    fn test_list_tags_follows_pagination() {
        let (base, requests) = serve(|base| {
            vec![
                http(
                    "200 OK",
                    &[format!("Link: <{}/page-two>; rel=\"next\"", base)],
                    r#"[{"name":"v1.0.0","commit":{"sha":"a"}},{"name":"v1.1.0"}]"#,
                ),
                http("200 OK", &[], r#"[{"name":"v2.0.0"}]"#),
            ]
        });
        let repo = GitHubRepository::with_api_url(&base, "octo/demo", "secret").unwrap();

        let listing = repo.list_tags(None).unwrap();
        assert_eq!(listing.names, vec!["v1.0.0", "v1.1.0", "v2.0.0"]);
        assert!(!listing.truncated);

        let first = requests.recv().unwrap();
        assert!(first.starts_with("GET /repos/octo/demo/tags?per_page=100 "));
        assert!(first.contains("Bearer secret"));
        let second = requests.recv().unwrap();
        assert!(second.starts_with("GET /page-two "));
    }

    #[test]
    fn test_highest_tag_on_later_page_is_selected() {
        use crate::bump::{BumpRequest, PrereleaseSetting};
        use crate::domain::BumpKind;
        use crate::resolver::{ResolveRequest, TagResolver};

        let (base, _requests) = serve(|base| {
            vec![
                http(
                    "200 OK",
                    &[format!("Link: <{}/page-two>; rel=\"next\"", base)],
                    r#"[{"name":"v1.9.0"},{"name":"v1.8.0"}]"#,
                ),
                http("200 OK", &[], r#"[{"name":"v1.10.0"},{"name":"v0.1.0"}]"#),
            ]
        });
        let repo = GitHubRepository::with_api_url(&base, "octo/demo", "secret").unwrap();
        let request = ResolveRequest {
            bump: BumpRequest::new(
                BumpKind::Minor,
                PrereleaseSetting::disabled(),
                TagFormat::default(),
            ),
            dry_run: true,
            target: String::new(),
            window: None,
        };

        let resolution = TagResolver::new(&repo).resolve(&request).unwrap();
        assert_eq!(resolution.name(), "v1.11.0");
    }

    #[test]
    fn test_list_tags_stops_once_window_is_full() {
        let (base, requests) = serve(|base| {
            vec![http(
                "200 OK",
                &[format!("Link: <{}/page-two>; rel=\"next\"", base)],
                r#"[{"name":"v3.0.0"},{"name":"v2.0.0"},{"name":"v1.0.0"}]"#,
            )]
        });
        let repo = GitHubRepository::with_api_url(&base, "octo/demo", "secret").unwrap();
        let window = TagWindow::new(TagFormat::default(), 2);

        let listing = repo.list_tags(Some(&window)).unwrap();
        assert_eq!(listing.names, vec!["v3.0.0", "v2.0.0"]);
        assert!(listing.truncated);
        requests.recv().unwrap();
        assert!(requests.try_recv().is_err());
    }

    #[test]
    fn test_list_tags_window_skips_other_schemes() {
        let (base, _requests) = serve(|base| {
            let nightlies: Vec<String> = (0..100)
                .map(|i| format!(r#"{{"name":"nightly-{}"}}"#, i))
                .collect();
            vec![
                http(
                    "200 OK",
                    &[format!("Link: <{}/page-two>; rel=\"next\"", base)],
                    &format!("[{}]", nightlies.join(",")),
                ),
                http("200 OK", &[], r#"[{"name":"rel-1.4.0"},{"name":"rel-1.3.0"}]"#),
            ]
        });
        let repo = GitHubRepository::with_api_url(&base, "octo/demo", "secret").unwrap();
        let window = TagWindow::new(TagFormat::new("rel-", "", false), 100);

        let listing = repo.list_tags(Some(&window)).unwrap();
        assert_eq!(listing.names.len(), 102);
        assert!(listing.names.contains(&"rel-1.4.0".to_string()));
        assert!(!listing.truncated);
    }

    #[test]
    fn test_list_tags_exactly_full_last_page_is_not_truncated() {
        let (base, _requests) = serve(|_| {
            vec![http("200 OK", &[], r#"[{"name":"v2.0.0"},{"name":"v1.0.0"}]"#)]
        });
        let repo = GitHubRepository::with_api_url(&base, "octo/demo", "secret").unwrap();
        let window = TagWindow::new(TagFormat::default(), 2);

        let listing = repo.list_tags(Some(&window)).unwrap();
        assert_eq!(listing.names.len(), 2);
        assert!(!listing.truncated);
    }

    #[test]
    fn test_list_tags_unauthorized() {
        let (base, _requests) = serve(|_| {
            vec![http(
                "401 Unauthorized",
                &[],
                r#"{"message":"Bad credentials"}"#,
            )]
        });
        let repo = GitHubRepository::with_api_url(&base, "octo/demo", "wrong").unwrap();

        let err = repo.list_tags(None).unwrap_err();
        assert!(matches!(err, TaggerError::Authentication(_)));
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[test]
    fn test_create_tag_posts_ref() {
        let (base, requests) = serve(|_| {
            vec![http(
                "201 Created",
                &[],
                r#"{"ref":"refs/tags/v1.0.0","object":{"sha":"abc123"}}"#,
            )]
        });
        let repo = GitHubRepository::with_api_url(&base, "octo/demo", "secret").unwrap();

        repo.create_tag("v1.0.0", "abc123").unwrap();

        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST /repos/octo/demo/git/refs "));
        assert!(request.contains(r#""ref":"refs/tags/v1.0.0""#));
        assert!(request.contains(r#""sha":"abc123""#));
    }

    #[test]
    fn test_create_tag_conflict_is_surfaced_verbatim() {
        let (base, _requests) = serve(|_| {
            vec![http(
                "422 Unprocessable Entity",
                &[],
                r#"{"message":"Reference already exists","documentation_url":"https://docs.github.com"}"#,
            )]
        });
        let repo = GitHubRepository::with_api_url(&base, "octo/demo", "secret").unwrap();

        let err = repo.create_tag("v1.0.0", "abc123").unwrap_err();
        match err {
            TaggerError::RemoteCreate { tag, message } => {
                assert_eq!(tag, "v1.0.0");
                assert_eq!(message, "HTTP 422: Reference already exists");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
