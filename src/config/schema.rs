use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Contents of an `astrav.toml` file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub load: LoadConfig,
    /// JSON file with one symbol table per package name.
    pub symbols: Option<PathBuf>,
}

/// How directories are turned into packages.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Load `_test.go` files too.
    pub include_tests: bool,
    /// File extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Descend into subdirectories.
    pub recursive: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            include_tests: false,
            extensions: vec!["go".to_string()],
            recursive: false,
        }
    }
}

impl LoadConfig {
    /// Whether a file name passes the extension and test-file filters.
    pub fn accepts(&self, file_name: &str) -> bool {
        let Some((stem, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        if !self.extensions.iter().any(|e| e == ext) {
            return false;
        }
        self.include_tests || !stem.ends_with("_test")
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.load.extensions.is_empty() {
            issues.push(ValidationIssue::NoExtensions);
        }
        for ext in &self.load.extensions {
            if ext.trim().is_empty() {
                issues.push(ValidationIssue::InvalidExtension {
                    extension: ext.clone(),
                    message: "extension is empty".to_string(),
                });
            } else if ext.starts_with('.') {
                issues.push(ValidationIssue::InvalidExtension {
                    extension: ext.clone(),
                    message: "leave out the leading dot".to_string(),
                });
            }
        }
        if let Some(path) = &self.symbols {
            if path.as_os_str().is_empty() {
                issues.push(ValidationIssue::EmptySymbolsPath);
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    NoExtensions,
    InvalidExtension { extension: String, message: String },
    EmptySymbolsPath,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NoExtensions => write!(f, "load.extensions must not be empty"),
            ValidationIssue::InvalidExtension { extension, message } => {
                write!(f, "invalid extension '{extension}': {message}")
            }
            ValidationIssue::EmptySymbolsPath => write!(f, "symbols path is empty"),
        }
    }
}
