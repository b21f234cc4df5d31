/*! Unified interface for contract model building and source emission.
 *
 * Single import for everything you need: building a contract model, applying
 * the upgradeability and namespaced-storage transforms, and printing
 * deterministic Solidity source. Batteries-included entry point for codegen
 * workflows.
 */

pub use solweave_core as core;
pub use solweave_emit as emit;
pub use solweave_transform as transform;

pub use solweave_core::{
    Contract, ContractFunction, ContractReference, ContractStruct, FunctionArgument,
    FunctionSignature, ImportContract, Mutability, OptionsError, Value, Visibility,
};

pub use solweave_emit::{print_contract, ImportPins, Options, SOLIDITY_VERSION};

pub use solweave_transform::{set_namespaced_storage, set_upgradeable, Upgradeable};
