//! Run command - generate, review, and submit a pull request

use crate::cli::style::{Stylize, check, spinner_style};
use adopr::config::{Config, ConfigKey};
use adopr::draft::DraftGenerator;
use adopr::error::Result;
use adopr::repo;
use adopr::review::{confirm_edit, confirm_submit, edit_draft};
use adopr::submit::submit_pull_request;
use adopr::types::PrDraft;
use anstream::println;
use indicatif::ProgressBar;
use reqwest::Client;
use std::time::Duration;

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Target branch override (takes precedence over config)
    pub target: Option<String>,
    /// Free-text instruction passed to the draft generator
    pub prompt: Option<String>,
}

/// Run the full pipeline: metadata, diff, generation, review, submission.
#[allow(clippy::future_not_send)]
pub async fn run(config: &Config, options: RunOptions) -> Result<()> {
    // Fail on missing credentials before any network or git activity
    let (api_key, pat, org_url) = config.require()?;

    let saved_target = options
        .target
        .as_deref()
        .or_else(|| config.get(ConfigKey::TargetBranch));

    let metadata = repo::collect_metadata(saved_target)?;
    let diff = repo::diff_against(&metadata.target_branch)?;
    let user_input = options.prompt.as_deref().unwrap_or("Generate PR");

    let client = Client::new();
    let generator = DraftGenerator::new(client.clone(), api_key);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message("Generating draft...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let generated = generator
        .generate(&metadata.source_branch, &diff, user_input)
        .await;

    spinner.finish_and_clear();
    let generated = generated?;

    println!("{} {}", check(), "Pull request generated".emphasis());
    println!();
    println!("  Title: {}", generated.title.accent());
    println!("  Body:");
    for line in generated.body.lines() {
        println!("    {line}");
    }
    println!();
    println!("  Source branch: {}", metadata.source_branch.accent());
    println!("  Target branch: {}", metadata.target_branch.accent());
    println!("  Organization:  {}", org_url.muted());
    println!("  Project:       {}", metadata.project.muted());
    println!("  Repository:    {}", metadata.repository_id.muted());
    println!();

    let mut pr_draft = PrDraft {
        title: generated.title,
        body: generated.body,
        source_branch: metadata.source_branch,
        target_branch: metadata.target_branch,
        organization_url: org_url.to_string(),
        project: metadata.project,
        repository_id: metadata.repository_id,
    };

    if confirm_edit()? {
        println!("{}", "Opening editor for PR details...".muted());
        match edit_draft(&pr_draft) {
            Ok(edited) => {
                pr_draft = edited;
                println!("{} PR details updated", check());
            }
            Err(fallback) => {
                println!(
                    "{}",
                    format!("⚠️  {fallback}; keeping original draft").warn()
                );
            }
        }
        println!();
    }

    if !confirm_submit()? {
        println!("{}", "PR submission cancelled.".muted());
        return Ok(());
    }

    println!("{}", "Submitting pull request...".muted());
    let link = submit_pull_request(&client, pat, &pr_draft).await?;

    println!("{} Pull request created!", check());
    println!("  {}", link.accent());

    Ok(())
}
