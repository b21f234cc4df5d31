//! Rewrites a contract's construction plan for proxy deployment.
//!
//! An upgradeable contract cannot rely on its constructor, so the transform
//! flags the model and adds the `Initializable` base; the printer then turns
//! the constructor plan into a disabled-constructor stub plus an `initialize`
//! function. For UUPS the upgrade authorization hook is registered here as
//! well, with the authorization check supplied by the caller.

use solweave_core::{Contract, FunctionSignature, ImportContract, Visibility};
use tracing::debug;

/// Proxy pattern the contract is deployed behind. Selected once at build
/// time; the two patterns are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upgradeable {
    Transparent,
    Uups,
}

/// Marks the contract upgradeable and wires the required bases. With `None`
/// the contract is left as-is. For [`Upgradeable::Uups`] the
/// `authorize_upgrade` strategy runs against the `_authorizeUpgrade`
/// signature before its body is finalized empty, letting governance
/// contracts, accounts, and access-controlled contracts each install their
/// own authorization check.
pub fn set_upgradeable<G>(contract: &mut Contract, upgradeable: Option<Upgradeable>, authorize_upgrade: G)
where
    G: FnOnce(&mut Contract, &FunctionSignature),
{
    let Some(kind) = upgradeable else {
        return;
    };

    debug!(contract = %contract.name, ?kind, "applying upgradeability transform");

    contract.upgradeable = true;
    contract.add_parent(
        ImportContract::new(
            "Initializable",
            "@openzeppelin/contracts-upgradeable/proxy/utils/Initializable.sol",
        )
        .with_transpiled(false),
        vec![],
    );

    if kind == Upgradeable::Uups {
        let uups = ImportContract::new(
            "UUPSUpgradeable",
            "@openzeppelin/contracts-upgradeable/proxy/utils/UUPSUpgradeable.sol",
        )
        .with_transpiled(false);
        let parent = uups.reference();
        contract.add_parent(uups, vec![]);

        let signature = authorize_upgrade_signature();
        authorize_upgrade(contract, &signature);
        contract.add_override(parent, &signature, None);
        contract.set_function_body(Vec::<String>::new(), &signature, None);
    }
}

/// The UUPS upgrade authorization hook.
pub fn authorize_upgrade_signature() -> FunctionSignature {
    FunctionSignature::new("_authorizeUpgrade", Visibility::Internal)
        .arg("address", "newImplementation")
}

/// Guard strategy attaching a single modifier to the authorization hook.
pub fn modifier_guard(
    modifier: impl Into<String>,
) -> impl FnOnce(&mut Contract, &FunctionSignature) {
    let modifier = modifier.into();
    move |contract, signature| contract.add_modifier(modifier, signature)
}

/// Guard strategy for governance contracts: upgrades go through a proposal.
pub fn only_governance() -> impl FnOnce(&mut Contract, &FunctionSignature) {
    modifier_guard("onlyGovernance")
}

/// Guard strategy for account contracts: the entry point or the account
/// itself authorizes the upgrade.
pub fn only_entry_point_or_self() -> impl FnOnce(&mut Contract, &FunctionSignature) {
    modifier_guard("onlyEntryPointOrSelf")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_guard(_: &mut Contract, _: &FunctionSignature) {}

    #[test]
    fn test_none_leaves_contract_untouched() {
        let mut contract = Contract::new("Token").unwrap();
        set_upgradeable(&mut contract, None, noop_guard);
        assert!(!contract.upgradeable);
        assert!(contract.parents().is_empty());
    }

    #[test]
    fn test_transparent_adds_initializable() {
        let mut contract = Contract::new("Token").unwrap();
        set_upgradeable(&mut contract, Some(Upgradeable::Transparent), noop_guard);
        assert!(contract.upgradeable);
        let parents = contract.parents();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].contract.name, "Initializable");
        assert_eq!(parents[0].contract.transpiled, Some(false));
        assert!(contract.functions().next().is_none());
    }

    #[test]
    fn test_uups_finalizes_authorize_upgrade() {
        let mut contract = Contract::new("Token").unwrap();
        set_upgradeable(&mut contract, Some(Upgradeable::Uups), only_governance());

        let names: Vec<&str> = contract
            .parents()
            .iter()
            .map(|p| p.contract.name.as_str())
            .collect();
        assert_eq!(names, ["Initializable", "UUPSUpgradeable"]);

        let hook = contract
            .function(&authorize_upgrade_signature())
            .expect("hook registered");
        assert!(hook.finalized);
        assert!(hook.code.is_empty());
        assert_eq!(hook.modifiers, ["onlyGovernance"]);
        assert_eq!(hook.overrides.len(), 1);
        assert!(hook.overrides.contains_key("UUPSUpgradeable"));
    }

    #[test]
    fn test_guard_runs_before_finalization() {
        // A guard may contribute code through the normal mutators; the final
        // empty-body call must then panic, which proves the ordering.
        let mut contract = Contract::new("Token").unwrap();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            set_upgradeable(&mut contract, Some(Upgradeable::Uups), |c, sig| {
                c.add_function_code("revert();", sig, None);
            });
        }));
        assert!(result.is_err());
    }
}
