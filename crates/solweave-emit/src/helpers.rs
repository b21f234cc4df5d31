//! Per-render name and import transforms.
//!
//! A render derives one [`Helpers`] value from the contract and options. When
//! the contract is upgradeable, concrete base contracts are rewritten to their
//! `Upgradeable` variants, both in name and in import path; interfaces and the
//! `Initializable` base are left alone.

use solweave_core::{Contract, ImportContract, Referenced};

use crate::transpiled::infer_transpiled;

/// An extra entry for the compatibility banner at the top of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibleLibrary {
    pub name: String,
    pub version: String,
}

pub type ImportTransform = Box<dyn Fn(ImportContract) -> ImportContract>;

/// Render options. All fields are optional; defaults render the contract
/// against unpinned OpenZeppelin import paths.
#[derive(Default)]
pub struct Options {
    /// Final substitution applied to every import path, after any
    /// upgradeable-variant rewriting.
    pub transform_import: Option<ImportTransform>,
    pub additional_compatible_libraries: Vec<CompatibleLibrary>,
}

pub struct Helpers<'a> {
    upgradeable: bool,
    opts: &'a Options,
}

impl<'a> Helpers<'a> {
    pub fn new(contract: &Contract, opts: &'a Options) -> Self {
        Self {
            upgradeable: contract.upgradeable,
            opts,
        }
    }

    pub fn upgradeable(&self) -> bool {
        self.upgradeable
    }

    pub fn transform_name<R: Referenced>(&self, reference: &R) -> String {
        if self.upgradeable && infer_transpiled(reference) {
            upgradeable_name(reference.name())
        } else {
            reference.name().to_string()
        }
    }

    pub fn transform_import(&self, import: &ImportContract) -> ImportContract {
        let base = if self.upgradeable && infer_transpiled(import) {
            upgradeable_import(import)
        } else {
            import.clone()
        };
        match &self.opts.transform_import {
            Some(transform) => transform(base),
            None => base,
        }
    }

    pub fn additional_compatible_libraries(&self) -> &[CompatibleLibrary] {
        &self.opts.additional_compatible_libraries
    }
}

pub fn upgradeable_name(name: &str) -> String {
    if name == "Initializable" || name.ends_with("Upgradeable") {
        name.to_string()
    } else {
        format!("{name}Upgradeable")
    }
}

pub fn upgradeable_import(import: &ImportContract) -> ImportContract {
    let (dir, file) = match import.path.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => ("", import.path.as_str()),
    };
    let (stem, ext) = match file.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (file, None),
    };

    let mut path = format!("{}/{}", upgradeable_dir(dir), upgradeable_name(stem));
    if let Some(ext) = ext {
        path.push('.');
        path.push_str(ext);
    }

    ImportContract {
        name: upgradeable_name(&import.name),
        path,
        transpiled: import.transpiled,
    }
}

fn upgradeable_dir(dir: &str) -> String {
    const VENDOR_ROOT: &str = "@openzeppelin/contracts";
    match dir.strip_prefix(VENDOR_ROOT) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            format!("@openzeppelin/contracts-upgradeable{rest}")
        }
        _ => dir.to_string(),
    }
}
