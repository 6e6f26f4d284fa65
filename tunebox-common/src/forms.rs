//! Form validation
//!
//! One validation function per input shape. Each returns either the
//! validated input or a [`FormErrors`] map keyed by field name, so handlers
//! can surface messages next to the offending field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 80;

const REQUIRED_MSG: &str = "This field is required.";

/// Field name -> messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    pub errors: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Required, then 3..=80 characters. Whitespace-only counts as missing.
fn check_text(errors: &mut FormErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED_MSG);
        return;
    }

    let len = value.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        errors.add(
            field,
            format!(
                "Field must be between {} and {} characters long.",
                NAME_MIN_LEN, NAME_MAX_LEN
            ),
        );
    }
}

/// Login and registration body: `name`, `password`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

impl CompanyForm {
    pub fn validate(self) -> Result<Self, FormErrors> {
        let mut errors = FormErrors::default();
        check_text(&mut errors, "name", &self.name);
        check_text(&mut errors, "password", &self.password);
        errors.into_result(self)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistForm {
    #[serde(default)]
    pub name: String,
}

impl PlaylistForm {
    pub fn validate(self) -> Result<Self, FormErrors> {
        let mut errors = FormErrors::default();
        check_text(&mut errors, "name", &self.name);
        errors.into_result(self)
    }
}

/// Multipart upload: only the submitted filename of the `music` field is
/// validated; the payload itself is accepted as-is.
#[derive(Debug, Clone, Default)]
pub struct MusicForm {
    pub filename: Option<String>,
}

impl MusicForm {
    pub const FIELD: &'static str = "music";

    /// Returns the validated filename
    pub fn validate(self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::default();

        match self.filename.as_deref() {
            None | Some("") => errors.add(Self::FIELD, REQUIRED_MSG),
            Some(name) if !is_plain_file_name(name) => {
                errors.add(Self::FIELD, "Invalid file name.")
            }
            Some(name) if name.chars().count() > NAME_MAX_LEN => errors.add(
                Self::FIELD,
                format!("File name must be at most {} characters long.", NAME_MAX_LEN),
            ),
            Some(_) => {}
        }

        let filename = self.filename.unwrap_or_default();
        errors.into_result(filename)
    }
}

/// A name that can only ever address a file directly inside one directory:
/// no separators, not hidden (which also excludes `.` and `..`), no NUL.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
}
