//! Package description models and the describe-output parser.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Manifest file name, resolved relative to the project root.
pub const MANIFEST_FILE: &str = "Package.swift";

/// Kind of a build target declared in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Executable,
    Test,
    Library,
    Other,
}

impl TargetType {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Executable => "executable",
            TargetType::Test => "test",
            TargetType::Library => "library",
            TargetType::Other => "other",
        }
    }
}

impl From<&str> for TargetType {
    /// Exact, case-sensitive match; unrecognized strings become `Other`.
    fn from(s: &str) -> Self {
        match s {
            "executable" => TargetType::Executable,
            "test" => TargetType::Test,
            "library" => TargetType::Library,
            _ => TargetType::Other,
        }
    }
}

/// A named build unit declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub target_type: TargetType,
}

/// Parsed result of `swift package describe --type json`.
///
/// Targets keep the order the tool emitted them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageDescription {
    pub name: Option<String>,
    pub targets: Vec<TargetDescriptor>,
}

impl PackageDescription {
    pub fn executables(&self) -> impl Iterator<Item = &TargetDescriptor> {
        self.targets
            .iter()
            .filter(|t| t.target_type == TargetType::Executable)
    }

    pub fn has_tests(&self) -> bool {
        self.targets
            .iter()
            .any(|t| t.target_type == TargetType::Test)
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("target at index {index} has an empty name")]
    EmptyTargetName { index: usize },
}

#[derive(Deserialize)]
struct RawDescription {
    #[serde(default)]
    name: Option<String>,
    targets: Vec<RawTarget>,
}

#[derive(Deserialize)]
struct RawTarget {
    name: String,
    #[serde(rename = "type")]
    target_type: String,
}

/// Parses describe output into a [`PackageDescription`].
///
/// Extra fields are ignored. Any schema violation fails the whole parse.
pub fn parse(json: &str) -> Result<PackageDescription, ParseError> {
    let raw: RawDescription = serde_json::from_str(json)?;

    let targets = raw
        .targets
        .into_iter()
        .enumerate()
        .map(|(index, target)| {
            if target.name.is_empty() {
                return Err(ParseError::EmptyTargetName { index });
            }
            Ok(TargetDescriptor {
                target_type: TargetType::from(target.target_type.as_str()),
                name: target.name,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PackageDescription {
        name: raw.name,
        targets,
    })
}
