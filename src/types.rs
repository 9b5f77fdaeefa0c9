//! Core types for adopr

use serde::{Deserialize, Serialize};

/// The {Title, Body} pair produced by the language model
///
/// Field names match the JSON contract the model is instructed to follow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Draft {
    /// Pull request title
    #[serde(rename = "Title")]
    pub title: String,
    /// Pull request description body
    #[serde(rename = "Body")]
    pub body: String,
}

/// The full structured record carried through review to submission
///
/// Serialized as camelCase JSON when handed to the user for editing.
/// Every field is required; a document missing any of them fails to
/// deserialize, which is what keeps a half-edited draft out of submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrDraft {
    /// Pull request title
    pub title: String,
    /// Pull request description body
    pub body: String,
    /// Branch the changes live on (current working branch)
    pub source_branch: String,
    /// Branch the pull request will merge into
    pub target_branch: String,
    /// Azure DevOps organization URL (e.g. `https://dev.azure.com/myorg`)
    pub organization_url: String,
    /// Project name within the organization
    pub project: String,
    /// Repository name or ID within the project
    pub repository_id: String,
}

/// Git repository metadata resolved from the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitMetadata {
    /// Project name parsed from the origin remote URL
    pub project: String,
    /// Repository name parsed from the origin remote URL
    pub repository_id: String,
    /// Current branch name
    pub source_branch: String,
    /// Resolved target branch (config override, remote default, or fallback)
    pub target_branch: String,
}
