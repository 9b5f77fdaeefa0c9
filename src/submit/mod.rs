//! Pull request submission to the Azure DevOps REST API

use crate::error::{Error, Result};
use crate::types::PrDraft;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// API version pinned for the pull request endpoint.
const API_VERSION: &str = "7.1-preview.1";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePrRequest<'a> {
    source_ref_name: String,
    target_ref_name: String,
    title: &'a str,
    description: &'a str,
    repository_id: &'a str,
}

#[derive(Deserialize)]
struct CreatePrResponse {
    #[serde(rename = "_links")]
    links: Option<Links>,
    url: Option<String>,
}

#[derive(Deserialize)]
struct Links {
    web: Option<Link>,
}

#[derive(Deserialize)]
struct Link {
    href: Option<String>,
}

/// Basic auth header for a personal access token (empty username).
fn pat_auth_header(pat: &str) -> String {
    format!("Basic {}", BASE64.encode(format!(":{pat}")))
}

/// Build the pull request creation URL for a draft.
fn pull_request_url(draft: &PrDraft) -> String {
    format!(
        "{}/{}/_apis/git/repositories/{}/pullrequests?api-version={API_VERSION}",
        draft.organization_url.trim_end_matches('/'),
        draft.project,
        draft.repository_id
    )
}

/// Create the pull request described by a draft.
///
/// A non-2xx response is terminal and carries the status and body. On
/// success, returns the web link if the API provided one, else the
/// canonical API URL of the created pull request.
pub async fn submit_pull_request(client: &Client, pat: &str, draft: &PrDraft) -> Result<String> {
    let url = pull_request_url(draft);
    debug!(%url, source = %draft.source_branch, target = %draft.target_branch, "creating pull request");

    let request = CreatePrRequest {
        source_ref_name: format!("refs/heads/{}", draft.source_branch),
        target_ref_name: format!("refs/heads/{}", draft.target_branch),
        title: &draft.title,
        description: &draft.body,
        repository_id: &draft.repository_id,
    };

    let response = client
        .post(&url)
        .header("Authorization", pat_auth_header(pat))
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Submit {
            status: status.as_u16(),
            body,
        });
    }

    let created: CreatePrResponse = response.json().await?;
    let link = created
        .links
        .and_then(|links| links.web)
        .and_then(|web| web.href)
        .or(created.url)
        .unwrap_or(url);

    debug!(%link, "created pull request");
    Ok(link)
}
