use crate::config::IntakeConfig;
use crate::models::{RawFile, RejectReason};
use mime::Mime;

/// One entry of an accepted-types list, parsed once at configuration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptPattern {
    /// `.pdf`, stored lowercase without the leading dot
    Extension(String),
    /// `image/*`, stored as the top-level type
    Wildcard(String),
    /// `application/pdf`, stored lowercase
    Exact(String),
}

impl AcceptPattern {
    /// Parses a single pattern. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let pattern = raw.trim().to_lowercase();
        if pattern.is_empty() {
            return None;
        }

        if let Some(ext) = pattern.strip_prefix('.') {
            return Some(AcceptPattern::Extension(ext.to_string()));
        }

        if pattern.contains("/*") {
            let top_level = pattern.split('/').next().unwrap_or("");
            return Some(AcceptPattern::Wildcard(top_level.to_string()));
        }

        Some(AcceptPattern::Exact(pattern))
    }

    pub fn matches(&self, extension: Option<&str>, mime: Option<&Mime>) -> bool {
        match self {
            AcceptPattern::Extension(ext) => extension == Some(ext.as_str()),
            AcceptPattern::Wildcard(top_level) => mime.is_some_and(|m| {
                top_level == "*" || m.type_().as_str() == top_level.as_str()
            }),
            AcceptPattern::Exact(essence) => mime.is_some_and(|m| m.essence_str() == essence),
        }
    }

    /// Renders the pattern in the form a file picker `accept` list uses
    pub fn as_accept_token(&self) -> String {
        match self {
            AcceptPattern::Extension(ext) => format!(".{}", ext),
            AcceptPattern::Wildcard(top_level) => format!("{}/*", top_level),
            AcceptPattern::Exact(essence) => essence.clone(),
        }
    }
}

/// Normalizes a platform-reported content type (`IMAGE/PNG; q=1` -> `image/png`)
pub fn parse_mime(content_type: &str) -> Option<Mime> {
    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    if normalized.is_empty() {
        return None;
    }
    normalized.parse().ok()
}

/// Lowercase text after the last `.` of the name. A bare `.pdf` has
/// extension `pdf`; a trailing dot has none.
pub fn file_extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_lowercase())
}

/// Validates file size against the configured ceiling
pub fn validate_file_size(size: u64, max_size: u64) -> Result<(), RejectReason> {
    if size > max_size {
        return Err(RejectReason::TooLarge { size, max_size });
    }
    Ok(())
}

/// Validates a file's extension and MIME type against the accepted patterns
pub fn validate_file_type(file: &RawFile, patterns: &[AcceptPattern]) -> Result<(), RejectReason> {
    if patterns.is_empty() {
        return Ok(());
    }

    let extension = file_extension(&file.name);
    let mime = parse_mime(&file.mime_type);

    if patterns
        .iter()
        .any(|p| p.matches(extension.as_deref(), mime.as_ref()))
    {
        return Ok(());
    }

    Err(RejectReason::InvalidType {
        mime_type: file.mime_type.clone(),
    })
}

/// Full validation pipeline for one candidate file.
///
/// Size is checked before type and only the first failure is reported, so a
/// file that is both oversized and of the wrong type yields `TooLarge`.
pub fn validate(file: &RawFile, config: &IntakeConfig) -> Result<(), RejectReason> {
    // 1. Size check
    validate_file_size(file.size, config.max_size)?;

    // 2. Type check
    validate_file_type(file, &config.accepted_types)?;

    Ok(())
}

/// Comma separated `accept` list for the platform picker
pub fn accept_attribute(config: &IntakeConfig) -> String {
    config
        .accepted_types
        .iter()
        .map(AcceptPattern::as_accept_token)
        .collect::<Vec<_>>()
        .join(",")
}
