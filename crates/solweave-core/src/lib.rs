/*! Contract model and builders for multi-target source generation.
 *
 * Generated contracts are assembled programmatically: feature modules add
 * parents, claim overrides, and contribute constructor wiring to one mutable
 * model, which a printer later linearizes into source text. This crate is the
 * model half — insertion-ordered, structurally deduplicated, and deterministic
 * so that repeated renders of the same input are byte-identical.
 */

pub mod contract;
pub mod error;
pub mod function;
pub mod identifier;
pub mod units;

pub use contract::{
    Contract, ContractReference, ContractStruct, ImportContract, Library, NatspecTag, Parent,
    Referenced, Value, VariableDefinition,
};
pub use error::OptionsError;
pub use function::{
    ArgumentType, ContractFunction, FunctionArgument, FunctionRegistry, FunctionSignature,
    Mutability, Visibility,
};
pub use identifier::{stringify_unicode_safe, to_identifier};
pub use units::{premint_amount, to_uint, uint_max, PremintAmount, TargetWidth, UINT256, UINT64};
