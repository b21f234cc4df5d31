//! ERC-7201 namespaced storage.
//!
//! Upgradeable contracts keep their state in a struct at a storage location
//! derived from a namespace string, so that unrelated upgrades cannot collide
//! with it. The derivation is published and externally checkable:
//! `keccak256(abi.encode(uint256(keccak256(id)) - 1)) & ~bytes32(uint256(0xff))`.

use std::fmt::Write;

use num_bigint::BigUint;
use num_traits::CheckedSub;
use tiny_keccak::{Hasher, Keccak};

use solweave_core::{
    Contract, ContractStruct, FunctionSignature, Mutability, OptionsError, Visibility,
};

/// Joins the optional prefix and the contract name into the namespace id.
/// Whitespace in the prefix would silently change the derived slot, so it is
/// rejected up front.
pub fn namespace_id(prefix: &str, contract_name: &str) -> Result<String, OptionsError> {
    if prefix.chars().any(char::is_whitespace) {
        return Err(OptionsError::single(
            "namespacePrefix",
            "Namespace prefix should not contain whitespace characters",
        ));
    }
    if prefix.is_empty() {
        Ok(contract_name.to_string())
    } else {
        Ok(format!("{prefix}.{contract_name}"))
    }
}

/// Derives the storage slot for a namespace id, rendered as a `0x`-prefixed
/// 64-digit lower-case hex string. Bit-exact per ERC-7201.
pub fn namespaced_storage_slot(namespace_id: &str) -> String {
    let inner = BigUint::from_bytes_be(&keccak256(namespace_id.as_bytes()));
    let adjusted = inner
        .checked_sub(&BigUint::from(1u8))
        .unwrap_or_default();

    let bytes = adjusted.to_bytes_be();
    let mut buf = [0u8; 32];
    buf[32 - bytes.len()..].copy_from_slice(&bytes);

    let mut slot = keccak256(&buf);
    slot[31] = 0;

    let mut out = String::with_capacity(66);
    out.push_str("0x");
    for byte in slot {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Moves the given variables into the contract's namespaced storage struct
/// and wires the retrieval plumbing: the slot constant with its derivation
/// comment, the assembly getter, and a storage-struct binding at the top of
/// `function`.
pub fn set_namespaced_storage<I, S>(
    contract: &mut Contract,
    function: &FunctionSignature,
    struct_variables: I,
    namespace_prefix: &str,
) -> Result<(), OptionsError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let id = namespace_id(namespace_prefix, &contract.name)?;
    let name = contract.name.clone();

    let definition = ContractStruct::new(format!("{name}Storage"))
        .comment(format!("/// @custom:storage-location erc7201:{id}"));
    for variable in struct_variables {
        contract.add_struct_variable(&definition, variable.into());
    }

    let location = format!("{}_STORAGE_LOCATION", name.to_uppercase());
    contract.add_variable(format!(
        "// keccak256(abi.encode(uint256(keccak256(\"{id}\")) - 1)) & ~bytes32(uint256(0xff))"
    ));
    contract.add_variable(format!(
        "bytes32 private constant {location} = {};",
        namespaced_storage_slot(&id)
    ));

    let getter = storage_getter_signature(&name);
    contract.add_function_code(format!("assembly {{ $.slot := {location} }}"), &getter, None);
    contract.add_function_code(storage_struct_instantiation(&name), function, None);
    Ok(())
}

/// Signature of the generated `_get<Name>Storage` accessor.
pub fn storage_getter_signature(contract_name: &str) -> FunctionSignature {
    FunctionSignature::new(
        format!("_get{contract_name}Storage"),
        Visibility::Private,
    )
    .returns(format!("{contract_name}Storage storage $"))
    .mutability(Mutability::Pure)
}

/// The line binding the storage struct inside a function body.
pub fn storage_struct_instantiation(contract_name: &str) -> String {
    format!("{contract_name}Storage storage $ = _get{contract_name}Storage();")
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}
