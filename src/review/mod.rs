//! Interactive review of a generated draft
//!
//! Two yes/no gates ("edit before submit" and "submit now", both defaulting
//! to No) plus an edit session that round-trips the draft through a temp
//! file and the user's editor. Edit failures never abort the run; the
//! caller keeps the last known-good draft.

use crate::error::{Error, Result};
use crate::types::PrDraft;
use std::env;
use std::fs;
use std::io::Write;
use std::process::Command;
use tempfile::Builder;
use tracing::{debug, warn};

/// Required fields of the editable draft document, in wire order.
const REQUIRED_FIELDS: [&str; 7] = [
    "title",
    "body",
    "sourceBranch",
    "targetBranch",
    "organizationUrl",
    "project",
    "repositoryId",
];

/// Why an edited document was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftInvalid {
    /// The document is not valid JSON
    Json(String),
    /// The document is valid JSON but lacks required string fields
    MissingFields(Vec<String>),
}

impl std::fmt::Display for DraftInvalid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(message) => write!(f, "invalid JSON: {message}"),
            Self::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
        }
    }
}

/// Why an edit session fell back to the original draft
#[derive(Debug)]
pub enum EditFallback {
    /// The editor could not be launched
    Spawn(String),
    /// The editor exited with a non-zero status
    EditorExit(Option<i32>),
    /// The edited document failed validation
    Invalid(DraftInvalid),
    /// The temp file could not be written or read back
    Io(String),
}

impl std::fmt::Display for EditFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(message) => write!(f, "failed to launch editor: {message}"),
            Self::EditorExit(code) => match code {
                Some(code) => write!(f, "editor exited with code {code}"),
                None => write!(f, "editor terminated by signal"),
            },
            Self::Invalid(invalid) => write!(f, "{invalid}"),
            Self::Io(message) => write!(f, "edit session I/O error: {message}"),
        }
    }
}

/// Ask whether to edit the draft before submitting. Defaults to No.
pub fn confirm_edit() -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Edit PR details before submitting?")
        .default(false)
        .interact()
        .map_err(|e| Error::Internal(format!("failed to read confirmation: {e}")))
}

/// Ask whether to submit the pull request. Defaults to No.
pub fn confirm_submit() -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Submit pull request?")
        .default(false)
        .interact()
        .map_err(|e| Error::Internal(format!("failed to read confirmation: {e}")))
}

/// Validate an edited document against the draft schema.
///
/// Returns the parsed draft, or a typed rejection naming either the JSON
/// failure or every missing/non-string field.
pub fn validate_document(content: &str) -> std::result::Result<PrDraft, DraftInvalid> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| DraftInvalid::Json(e.to_string()))?;

    let Some(object) = value.as_object() else {
        return Err(DraftInvalid::MissingFields(
            REQUIRED_FIELDS.iter().map(ToString::to_string).collect(),
        ));
    };

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !object.get(**field).is_some_and(serde_json::Value::is_string))
        .map(ToString::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(DraftInvalid::MissingFields(missing));
    }

    serde_json::from_value(value).map_err(|e| DraftInvalid::Json(e.to_string()))
}

/// Open the draft in the user's editor and return the edited version.
///
/// `Err` means the session failed and the caller should keep the original
/// draft; the reason has already been logged. The temp file is removed on
/// every exit path by the `NamedTempFile` guard.
pub fn edit_draft(draft: &PrDraft) -> std::result::Result<PrDraft, EditFallback> {
    edit_draft_with(draft, &resolve_editor())
}

/// Edit session with an explicit editor command (used by tests).
pub fn edit_draft_with(
    draft: &PrDraft,
    editor: &str,
) -> std::result::Result<PrDraft, EditFallback> {
    let result = run_edit_session(draft, editor);
    if let Err(ref fallback) = result {
        warn!(%fallback, "edit session failed, keeping original draft");
    }
    result
}

fn run_edit_session(draft: &PrDraft, editor: &str) -> std::result::Result<PrDraft, EditFallback> {
    let mut file = Builder::new()
        .prefix("pr-edit-")
        .suffix(".json")
        .tempfile()
        .map_err(|e| EditFallback::Io(e.to_string()))?;

    let document =
        serde_json::to_string_pretty(draft).map_err(|e| EditFallback::Io(e.to_string()))?;
    file.write_all(document.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| EditFallback::Io(e.to_string()))?;

    let path = file.path().to_path_buf();
    debug!(editor, path = %path.display(), "opening draft in editor");

    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| EditFallback::Spawn("empty editor command".to_string()))?;

    let status = Command::new(program)
        .args(parts)
        .arg(&path)
        .status()
        .map_err(|e| EditFallback::Spawn(e.to_string()))?;

    if !status.success() {
        return Err(EditFallback::EditorExit(status.code()));
    }

    let edited = fs::read_to_string(&path).map_err(|e| EditFallback::Io(e.to_string()))?;
    validate_document(&edited).map_err(EditFallback::Invalid)
}

/// Resolve the editor command: `$EDITOR`, else a platform default.
fn resolve_editor() -> String {
    if let Ok(editor) = env::var("EDITOR")
        && !editor.trim().is_empty()
    {
        return editor;
    }

    if cfg!(windows) {
        "notepad".to_string()
    } else if cfg!(target_os = "macos") {
        // -W waits for the app to close, -e opens TextEdit
        "open -W -n -e".to_string()
    } else {
        "nano".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn sample_draft() -> PrDraft {
        PrDraft {
            title: "Add login".to_string(),
            body: "Adds the login flow.".to_string(),
            source_branch: "feature/login".to_string(),
            target_branch: "main".to_string(),
            organization_url: "https://dev.azure.com/orgname".to_string(),
            project: "myproj".to_string(),
            repository_id: "myrepo".to_string(),
        }
    }

    #[test]
    fn test_validate_roundtrip() {
        let draft = sample_draft();
        let document = serde_json::to_string_pretty(&draft).unwrap();
        assert_eq!(validate_document(&document).unwrap(), draft);
    }

    #[test]
    fn test_validate_rejects_invalid_json() {
        assert!(matches!(
            validate_document("not json at all"),
            Err(DraftInvalid::Json(_))
        ));
    }

    #[test]
    fn test_validate_names_missing_fields() {
        let document = r#"{"title": "T", "body": "B", "project": "p"}"#;
        match validate_document(document) {
            Err(DraftInvalid::MissingFields(fields)) => {
                assert_eq!(
                    fields,
                    vec![
                        "sourceBranch",
                        "targetBranch",
                        "organizationUrl",
                        "repositoryId"
                    ]
                );
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_non_string_field() {
        let draft = sample_draft();
        let mut value = serde_json::to_value(&draft).unwrap();
        value["title"] = serde_json::json!(42);
        match validate_document(&value.to_string()) {
            Err(DraftInvalid::MissingFields(fields)) => assert_eq!(fields, vec!["title"]),
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_non_object() {
        assert!(matches!(
            validate_document("[1, 2, 3]"),
            Err(DraftInvalid::MissingFields(_))
        ));
    }

    #[test]
    #[serial]
    fn test_edit_with_noop_editor_roundtrips() {
        // `true` exits 0 without touching the file
        let draft = sample_draft();
        let edited = edit_draft_with(&draft, "true").unwrap();
        assert_eq!(edited, draft);
    }

    #[test]
    #[serial]
    fn test_edit_with_failing_editor_falls_back() {
        let draft = sample_draft();
        let result = edit_draft_with(&draft, "false");
        assert!(matches!(result, Err(EditFallback::EditorExit(Some(1)))));
    }

    #[test]
    #[serial]
    fn test_edit_with_missing_editor_falls_back() {
        let draft = sample_draft();
        let result = edit_draft_with(&draft, "definitely-not-an-editor-binary");
        assert!(matches!(result, Err(EditFallback::Spawn(_))));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use serial_test::serial;
        use std::os::unix::fs::PermissionsExt;

        /// Write an executable script that acts as the "editor".
        fn fake_editor(dir: &tempfile::TempDir, script_body: &str) -> String {
            let path = dir.path().join("editor.sh");
            fs::write(&path, format!("#!/bin/sh\n{script_body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().into_owned()
        }

        /// Find leftover pr-edit temp files so tests can assert cleanup.
        fn leftover_temp_files() -> Vec<std::path::PathBuf> {
            fs::read_dir(env::temp_dir())
                .unwrap()
                .filter_map(std::result::Result::ok)
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| {
                            name.starts_with("pr-edit-") && name.ends_with(".json")
                        })
                })
                .collect()
        }

        #[test]
        #[serial]
        fn test_edit_applies_changes() {
            let dir = tempfile::TempDir::new().unwrap();
            // Rewrite the title in place with a full valid document
            let editor = fake_editor(
                &dir,
                r#"cat > "$1" <<'EOF'
{
  "title": "Edited title",
  "body": "Edited body",
  "sourceBranch": "feature/login",
  "targetBranch": "main",
  "organizationUrl": "https://dev.azure.com/orgname",
  "project": "myproj",
  "repositoryId": "myrepo"
}
EOF"#,
            );

            let edited = edit_draft_with(&sample_draft(), &editor).unwrap();
            assert_eq!(edited.title, "Edited title");
            assert_eq!(edited.body, "Edited body");
        }

        #[test]
        #[serial]
        fn test_edit_rejects_document_with_missing_field() {
            let dir = tempfile::TempDir::new().unwrap();
            let editor = fake_editor(&dir, r#"printf '{"title": "only"}' > "$1""#);

            let result = edit_draft_with(&sample_draft(), &editor);
            assert!(matches!(
                result,
                Err(EditFallback::Invalid(DraftInvalid::MissingFields(_)))
            ));
        }

        #[test]
        #[serial]
        fn test_edit_rejects_invalid_json() {
            let dir = tempfile::TempDir::new().unwrap();
            let editor = fake_editor(&dir, r#"printf 'not json' > "$1""#);

            let result = edit_draft_with(&sample_draft(), &editor);
            assert!(matches!(
                result,
                Err(EditFallback::Invalid(DraftInvalid::Json(_)))
            ));
        }

        #[test]
        #[serial]
        fn test_temp_file_removed_on_every_path() {
            let draft = sample_draft();
            let dir = tempfile::TempDir::new().unwrap();

            // Success path
            assert!(edit_draft_with(&draft, "true").is_ok());
            assert!(leftover_temp_files().is_empty());

            // Validation-failure path
            let bad_editor = fake_editor(&dir, r#"printf 'not json' > "$1""#);
            assert!(edit_draft_with(&draft, &bad_editor).is_err());
            assert!(leftover_temp_files().is_empty());

            // Editor-error path
            assert!(edit_draft_with(&draft, "false").is_err());
            assert!(leftover_temp_files().is_empty());
        }
    }
}
