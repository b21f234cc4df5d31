//! Pinning import paths to exact dependency versions.
//!
//! Output meant to be compiled outside the originating project needs
//! reproducible dependencies, so vendor import prefixes are rewritten to their
//! versioned form (`@openzeppelin/contracts` becomes
//! `@openzeppelin/contracts@5.4.0`). Local and unrecognized paths pass through
//! untouched.

use crate::helpers::ImportTransform;

/// OpenZeppelin Contracts release the emitted sources compile against.
pub const CONTRACTS_VERSION: &str = "5.4.0";

/// Semver range shown in the compatibility banner.
pub const COMPATIBLE_CONTRACTS_SEMVER: &str = "^5.4.0";

/// Ordered prefix-to-version substitutions for import paths.
#[derive(Debug, Clone, Default)]
pub struct ImportPins {
    pins: Vec<(String, String)>,
}

impl ImportPins {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock OpenZeppelin pin set, covering both the plain and the
    /// upgradeable contracts packages.
    pub fn openzeppelin() -> Self {
        Self::new()
            .pin("@openzeppelin/contracts", CONTRACTS_VERSION)
            .pin("@openzeppelin/contracts-upgradeable", CONTRACTS_VERSION)
    }

    pub fn pin(mut self, prefix: impl Into<String>, version: impl Into<String>) -> Self {
        self.pins.push((prefix.into(), version.into()));
        self
    }

    /// Applies the first matching pin. Prefixes only match on a whole path
    /// segment, so `@openzeppelin/contracts` leaves
    /// `@openzeppelin/contracts-upgradeable/...` alone.
    pub fn rewrite(&self, path: &str) -> String {
        for (prefix, version) in &self.pins {
            if let Some(rest) = path.strip_prefix(prefix.as_str()) {
                if rest.is_empty() || rest.starts_with('/') {
                    return format!("{prefix}@{version}{rest}");
                }
            }
        }
        path.to_string()
    }

    pub fn into_transform(self) -> ImportTransform {
        Box::new(move |mut import| {
            import.path = self.rewrite(&import.path);
            import
        })
    }
}
