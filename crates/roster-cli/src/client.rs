//! Async HTTP client for the paginated contact feed.

use std::{num::NonZeroU32, time::Duration};

use reqwest::{Client, StatusCode};
use roster_core::{contact::Contact, store::PageFetcher};
use thiserror::Error;
use tracing::debug;

/// Connection settings for the feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
  /// Page URL with a `{page}` placeholder, e.g. `https://host/generated-0{page}.json`.
  pub url_template: String,
  pub timeout:      Duration,
}

#[derive(Debug, Error)]
pub enum FeedError {
  /// Transport or body decoding failure; reqwest's message is shown as is.
  #[error("{0}")]
  Request(#[from] reqwest::Error),

  #[error("GET {url} → {status}")]
  Status { url: String, status: StatusCode },
}

/// Fetches one page of contacts per request.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FeedClient {
  client: Client,
  config: FeedConfig,
}

impl FeedClient {
  pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn page_url(&self, page: NonZeroU32) -> String {
    self.config.url_template.replace("{page}", &page.to_string())
  }
}

impl PageFetcher for FeedClient {
  type Error = FeedError;

  /// `GET <url_template with page>` → JSON array of contacts.
  async fn fetch(&self, page: NonZeroU32) -> Result<Vec<Contact>, FeedError> {
    let url = self.page_url(page);
    debug!(%url, "requesting page");

    let resp = self.client.get(&url).send().await?;
    let status = resp.status();
    if !status.is_success() {
      return Err(FeedError::Status { url, status });
    }
    Ok(resp.json().await?)
  }
}

#[cfg(test)]
mod tests {
  use roster_core::contact::Temperament;
  use tokio::{
    io::{AsyncReadExt as _, AsyncWriteExt as _},
    net::TcpListener,
  };

  use super::*;

  fn client(template: &str) -> FeedClient {
    FeedClient::new(FeedConfig {
      url_template: template.into(),
      timeout:      Duration::from_secs(5),
    })
    .unwrap()
  }

  #[test]
  fn page_number_fills_the_template() {
    let c = client("https://example.com/json/generated-0{page}.json");
    assert_eq!(
      c.page_url(NonZeroU32::new(2).unwrap()),
      "https://example.com/json/generated-02.json"
    );
  }

  #[test]
  fn template_without_placeholder_is_used_verbatim() {
    let c = client("https://example.com/all.json");
    assert_eq!(c.page_url(NonZeroU32::MIN), "https://example.com/all.json");
  }

  #[test]
  fn status_error_names_url_and_code() {
    let err = FeedError::Status {
      url:    "https://example.com/p1".into(),
      status: StatusCode::NOT_FOUND,
    };
    assert_eq!(err.to_string(), "GET https://example.com/p1 → 404 Not Found");
  }

  // ── Against a local HTTP listener ─────────────────────────────────────────

  /// Answer one request with `status` and `body`; returns the URL template.
  async fn serve_once(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      let (mut sock, _) = listener.accept().await.unwrap();
      let mut buf = [0u8; 4096];
      let _ = sock.read(&mut buf).await.unwrap();
      let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
      );
      sock.write_all(response.as_bytes()).await.unwrap();
      let _ = sock.shutdown().await;
    });
    format!("http://{addr}/generated-0{{page}}.json")
  }

  /// Same as [`client`] but never routed through an environment proxy.
  fn local_client(template: String) -> FeedClient {
    FeedClient {
      client: Client::builder().no_proxy().build().unwrap(),
      config: FeedConfig { url_template: template, timeout: Duration::from_secs(5) },
    }
  }

  #[tokio::test]
  async fn non_success_status_is_a_failure() {
    let template = serve_once("404 Not Found", "").await;
    let c = local_client(template);

    let err = c.fetch(NonZeroU32::MIN).await.unwrap_err();
    assert!(matches!(err, FeedError::Status { status: StatusCode::NOT_FOUND, .. }));
    assert!(err.to_string().contains(&c.page_url(NonZeroU32::MIN)));
  }

  #[tokio::test]
  async fn body_that_is_not_an_array_is_a_failure() {
    let template = serve_once("200 OK", "{}").await;
    let err = local_client(template).fetch(NonZeroU32::MIN).await.unwrap_err();
    assert!(matches!(err, FeedError::Request(_)));
  }

  #[tokio::test]
  async fn array_body_decodes_to_contacts() {
    let template = serve_once(
      "200 OK",
      r#"[{"id":"5f1d","name":"Rosa Mccall","phone":"+7 (918) 402-3422","height":184.2,"biography":"Ea laboris.","temperament":"melancholic","educationPeriod":{"start":"2003-01-31T10:47:56+00:00","end":"2012-07-25T06:09:17+00:00"}}]"#,
    )
    .await;

    let page = local_client(template)
      .fetch(NonZeroU32::new(2).unwrap())
      .await
      .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, "5f1d");
    assert_eq!(page[0].temperament, Temperament::Melancholic);
    assert!(page[0].education_period.end.is_some());
  }
}
