//! adopr - AI-assisted pull request creation for Azure DevOps
//!
//! Inspects local git state, asks a language model to draft a pull request
//! title and body from the diff, optionally opens the draft in an editor,
//! and submits it to the Azure DevOps REST API.

pub mod config;
pub mod draft;
pub mod error;
pub mod repo;
pub mod review;
pub mod submit;
pub mod types;
