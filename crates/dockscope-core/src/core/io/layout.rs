use serde::{Deserialize, Serialize};

/// How poses are delimited in a structure file.
///
/// Decided once per parse from the whole text, so the record scanner never
/// has to re-check for model tags while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelLayout {
    /// The file contains at least one `MODEL` line.
    Explicit,
    /// No `MODEL` line: the whole file is a single pose.
    Implicit,
}

impl ModelLayout {
    pub fn detect(text: &str) -> Self {
        if text.lines().any(is_model_line) {
            ModelLayout::Explicit
        } else {
            ModelLayout::Implicit
        }
    }

    pub fn is_explicit(self) -> bool {
        self == ModelLayout::Explicit
    }
}

pub(crate) fn is_model_line(line: &str) -> bool {
    line.trim_start().starts_with("MODEL")
}

pub(crate) fn is_endmdl_line(line: &str) -> bool {
    line.trim_start().starts_with("ENDMDL")
}

/// Matches `^MODEL\s+\d+`.
fn is_numbered_model_tag(line: &str) -> bool {
    let Some(rest) = line.strip_prefix("MODEL") else {
        return false;
    };
    let digits = rest.trim_start();
    digits.len() < rest.len() && digits.starts_with(|c: char| c.is_ascii_digit())
}

/// Returns `true` if the text holds models that should be extracted one at a time.
///
/// Two or more numbered `MODEL` tags qualify, and so does a single numbered
/// `MODEL` tag closed by an `ENDMDL`; a wrapped single model is handled like
/// any multi-model file downstream.
pub fn has_multiple_models(text: &str) -> bool {
    let (models, endmdls) = text.lines().fold((0usize, 0usize), |(m, e), line| {
        if is_numbered_model_tag(line) {
            (m + 1, e)
        } else if line.starts_with("ENDMDL") {
            (m, e + 1)
        } else {
            (m, e)
        }
    });
    models >= 2 || (models == 1 && endmdls > 0)
}
