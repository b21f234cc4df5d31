/*!
Solidity source emission for solweave contract models.

Rendering is deterministic: imports are grouped and sorted, functions keep
their registration order within fixed groups, and the same model with the
same options always yields the same text. Upgradeable contracts get their
concrete OpenZeppelin bases rewritten to the `-upgradeable` package
automatically; [`versioned::ImportPins`] can additionally pin import paths
to exact release versions.
*/

pub mod helpers;
pub mod lines;
pub mod printer;
pub mod transpiled;
pub mod versioned;

pub use helpers::{CompatibleLibrary, Helpers, ImportTransform, Options};
pub use lines::{format_lines, format_lines_with_spaces, space_between, Lines};
pub use printer::{print_contract, print_value, SOLIDITY_VERSION};
pub use transpiled::infer_transpiled;
pub use versioned::{ImportPins, COMPATIBLE_CONTRACTS_SEMVER, CONTRACTS_VERSION};
