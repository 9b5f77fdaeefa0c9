//! Git metadata and diff collection
//!
//! Shells out to `git` for read-only queries: current branch, origin remote
//! URL, remote default branch, and the diff against the target branch.

use crate::error::{Error, Result};
use crate::types::GitMetadata;
use regex::Regex;
use std::process::Command;
use std::sync::LazyLock;
use tracing::debug;

/// Placeholder used when the diff against the target branch is empty.
pub const EMPTY_DIFF_PLACEHOLDER: &str = "No changes detected.";

/// Fallback target branch when neither config nor the remote names one.
const FALLBACK_TARGET_BRANCH: &str = "development";

/// Azure DevOps remote URL pattern: `.../<org>/<project>/_git/<repo>`.
static REMOTE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"dev\.azure\.com/[^/]+/([^/]+)/_git/([^/]+)").expect("valid regex")
});

/// Run a git query and return trimmed stdout.
fn run_git(args: &[&str]) -> Result<String> {
    debug!(?args, "running git");
    let output = Command::new("git")
        .args(args)
        .output()
        .map_err(|e| Error::Git(format!("failed to run git {}: {e}", args.join(" "))))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Git(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Get the current branch name.
pub fn current_branch() -> Result<String> {
    let branch = run_git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
    if branch.is_empty() {
        return Err(Error::Git(
            "could not detect current branch; is this a git repository?".to_string(),
        ));
    }
    Ok(branch)
}

/// Get the origin remote URL.
pub fn remote_url() -> Result<String> {
    run_git(&["remote", "get-url", "origin"])
}

/// Get the default branch reported by the origin remote, if any.
pub fn remote_default_branch() -> Result<Option<String>> {
    let info = run_git(&["remote", "show", "origin"])?;
    Ok(parse_head_branch(&info))
}

/// Extract the `HEAD branch:` line from `git remote show` output.
fn parse_head_branch(remote_info: &str) -> Option<String> {
    remote_info
        .lines()
        .find_map(|line| line.trim().strip_prefix("HEAD branch: "))
        .map(|branch| branch.trim().to_string())
        .filter(|branch| !branch.is_empty() && branch != "(unknown)")
}

/// Parse project and repository from an Azure DevOps remote URL.
///
/// A URL that doesn't match the `dev.azure.com/<org>/<project>/_git/<repo>`
/// pattern is a hard failure; there is no fallback.
pub fn parse_remote_url(url: &str) -> Result<(String, String)> {
    let captures = REMOTE_URL_RE.captures(url).ok_or_else(|| {
        Error::Git(format!(
            "could not parse project and repository from remote URL: {url}"
        ))
    })?;

    let project = captures[1].to_string();
    let repository = captures[2].trim_end_matches(".git").to_string();
    Ok((project, repository))
}

/// Resolve repository metadata from the working directory.
///
/// Target branch resolution order: saved config value, else the remote's
/// default branch, else a literal fallback.
pub fn collect_metadata(saved_target: Option<&str>) -> Result<GitMetadata> {
    let url = remote_url()?;
    let (project, repository_id) = parse_remote_url(&url)?;
    let source_branch = current_branch()?;

    let target_branch = match saved_target {
        Some(branch) => branch.to_string(),
        None => remote_default_branch()?
            .unwrap_or_else(|| FALLBACK_TARGET_BRANCH.to_string()),
    };

    debug!(
        project,
        repository_id, source_branch, target_branch, "resolved git metadata"
    );

    Ok(GitMetadata {
        project,
        repository_id,
        source_branch,
        target_branch,
    })
}

/// Get the unified diff between `origin/<target>` and the current head.
///
/// An empty diff is not an error; it normalizes to a placeholder so the
/// generator still has something to describe.
pub fn diff_against(target_branch: &str) -> Result<String> {
    let range = format!("origin/{target_branch}...HEAD");
    match run_git(&["diff", &range]) {
        Ok(diff) => Ok(normalize_diff(diff)),
        Err(Error::Git(message))
            if message.contains("bad object") || message.contains("unknown revision") =>
        {
            Err(Error::Git(format!(
                "the target branch 'origin/{target_branch}' does not exist or is not reachable"
            )))
        }
        Err(e) => Err(e),
    }
}

/// Normalize an empty diff to the placeholder text.
fn normalize_diff(diff: String) -> String {
    if diff.is_empty() {
        EMPTY_DIFF_PLACEHOLDER.to_string()
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_url() {
        let (project, repo) =
            parse_remote_url("https://dev.azure.com/orgname/myproj/_git/myrepo").unwrap();
        assert_eq!(project, "myproj");
        assert_eq!(repo, "myrepo");
    }

    #[test]
    fn test_parse_remote_url_strips_git_suffix() {
        let (project, repo) =
            parse_remote_url("https://dev.azure.com/orgname/myproj/_git/myrepo.git").unwrap();
        assert_eq!(project, "myproj");
        assert_eq!(repo, "myrepo");
    }

    #[test]
    fn test_parse_remote_url_with_user_prefix() {
        let (project, repo) =
            parse_remote_url("https://user@dev.azure.com/orgname/proj/_git/repo").unwrap();
        assert_eq!(project, "proj");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn test_parse_remote_url_rejects_other_hosts() {
        let result = parse_remote_url("https://github.com/owner/repo.git");
        assert!(matches!(result, Err(Error::Git(_))));
    }

    #[test]
    fn test_parse_head_branch() {
        let info = "* remote origin\n  Fetch URL: https://dev.azure.com/o/p/_git/r\n  HEAD branch: main\n";
        assert_eq!(parse_head_branch(info), Some("main".to_string()));
    }

    #[test]
    fn test_parse_head_branch_unknown() {
        let info = "* remote origin\n  HEAD branch: (unknown)\n";
        assert_eq!(parse_head_branch(info), None);
    }

    #[test]
    fn test_normalize_empty_diff() {
        assert_eq!(normalize_diff(String::new()), EMPTY_DIFF_PLACEHOLDER);
    }

    #[test]
    fn test_normalize_nonempty_diff_unchanged() {
        let diff = "diff --git a/foo b/foo\n".to_string();
        assert_eq!(normalize_diff(diff.clone()), diff);
    }
}
