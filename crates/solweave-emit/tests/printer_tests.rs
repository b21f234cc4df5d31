use pretty_assertions::assert_eq;

use solweave_core::{
    Contract, ContractReference, FunctionArgument, FunctionSignature, ImportContract, Value,
    Visibility,
};
use solweave_emit::{print_contract, CompatibleLibrary, ImportPins, Options};

fn erc20_import() -> ImportContract {
    ImportContract::new("ERC20", "@openzeppelin/contracts/token/ERC20/ERC20.sol")
}

fn initializable_import() -> ImportContract {
    ImportContract::new(
        "Initializable",
        "@openzeppelin/contracts/proxy/utils/Initializable.sol",
    )
}

#[test]
fn test_empty_contract() {
    let contract = Contract::new("MyToken").unwrap();
    assert_eq!(
        print_contract(&contract, &Options::default()),
        "\
// SPDX-License-Identifier: MIT
// Compatible with OpenZeppelin Contracts ^5.4.0
pragma solidity ^0.8.27;

contract MyToken {
}
"
    );
}

#[test]
fn test_parents_and_chained_constructors() {
    let mut contract = Contract::new("MyToken").unwrap();
    contract.add_parent(
        erc20_import(),
        vec![Value::from("MyToken"), Value::from("MTK")],
    );
    contract.add_parent(
        ImportContract::new(
            "ERC20Permit",
            "@openzeppelin/contracts/token/ERC20/extensions/ERC20Permit.sol",
        ),
        vec![Value::from("MyToken")],
    );

    assert_eq!(
        print_contract(&contract, &Options::default()),
        "\
// SPDX-License-Identifier: MIT
// Compatible with OpenZeppelin Contracts ^5.4.0
pragma solidity ^0.8.27;

import {ERC20} from \"@openzeppelin/contracts/token/ERC20/ERC20.sol\";
import {ERC20Permit} from \"@openzeppelin/contracts/token/ERC20/extensions/ERC20Permit.sol\";

contract MyToken is ERC20, ERC20Permit {
    constructor() ERC20(\"MyToken\", \"MTK\") ERC20Permit(\"MyToken\") {}
}
"
    );
}

#[test]
fn test_override_function_wraps_and_delegates_to_super() {
    let mut contract = Contract::new("MyToken").unwrap();
    contract.add_parent(erc20_import(), vec![]);
    contract.add_parent(
        ImportContract::new(
            "ERC20Votes",
            "@openzeppelin/contracts/token/ERC20/extensions/ERC20Votes.sol",
        ),
        vec![],
    );

    let update = FunctionSignature::new("_update", Visibility::Internal)
        .arg("address", "from")
        .arg("address", "to")
        .arg("uint256", "value");
    contract.add_override(ContractReference::new("ERC20"), &update, None);
    contract.add_override(ContractReference::new("ERC20Votes"), &update, None);

    let output = print_contract(&contract, &Options::default());
    assert!(output.contains(
        "    // The following functions are overrides required by Solidity.

    function _update(address from, address to, uint256 value)
        internal
        override(ERC20, ERC20Votes)
    {
        super._update(from, to, value);
    }
"
    ));
}

#[test]
fn test_single_override_stays_on_one_line() {
    let mut contract = Contract::new("MyToken").unwrap();
    let nonces = FunctionSignature::new("nonces", Visibility::Public)
        .arg("address", "owner")
        .returns("uint256")
        .mutability(solweave_core::Mutability::View);
    contract.add_override(ContractReference::new("Nonces"), &nonces, None);

    let output = print_contract(&contract, &Options::default());
    assert!(output.contains(
        "    function nonces(address owner) public view override returns (uint256) {
        return super.nonces(owner);
    }
"
    ));
}

#[test]
fn test_upgradeable_rewrites_imports_and_emits_initializer() {
    let mut contract = Contract::new("MyToken").unwrap();
    contract.upgradeable = true;
    contract.add_parent(initializable_import(), vec![]);
    contract.add_parent(
        erc20_import(),
        vec![Value::from("MyToken"), Value::from("MTK")],
    );

    assert_eq!(
        print_contract(&contract, &Options::default()),
        "\
// SPDX-License-Identifier: MIT
// Compatible with OpenZeppelin Contracts ^5.4.0
pragma solidity ^0.8.27;

import {Initializable} from \"@openzeppelin/contracts-upgradeable/proxy/utils/Initializable.sol\";
import {ERC20Upgradeable} from \"@openzeppelin/contracts-upgradeable/token/ERC20/ERC20Upgradeable.sol\";

contract MyToken is Initializable, ERC20Upgradeable {
    /// @custom:oz-upgrades-unsafe-allow constructor
    constructor() {
        _disableInitializers();
    }

    function initialize() public initializer {
        __ERC20_init(\"MyToken\", \"MTK\");
    }
}
"
    );
}

#[test]
fn test_upgradeable_without_initializable_parents_keeps_only_the_stub() {
    let mut contract = Contract::new("MyToken").unwrap();
    contract.upgradeable = true;
    contract.add_parent(initializable_import(), vec![]);

    let output = print_contract(&contract, &Options::default());
    assert!(output.contains("_disableInitializers();"));
    assert!(!output.contains("function initialize"));
}

#[test]
fn test_constructor_with_args_code_and_comment() {
    let mut contract = Contract::new("MyToken").unwrap();
    contract.add_constructor_comment("/// Sets the initial owner.");
    contract.add_constructor_argument(FunctionArgument::new("address", "owner"));
    contract.add_constructor_code("_transferOwnership(owner);");

    let output = print_contract(&contract, &Options::default());
    assert!(output.contains(
        "    /// Sets the initial owner.
    constructor(address owner) {
        _transferOwnership(owner);
    }
"
    ));
}

#[test]
fn test_body_sections_in_order() {
    let mut contract = Contract::new("MyToken").unwrap();
    contract.add_natspec_tag("@custom:security-contact", "security@example.com");
    contract.add_library(
        ImportContract::new("SafeCast", "@openzeppelin/contracts/utils/math/SafeCast.sol"),
        ["uint256"],
    );
    contract.add_commented_variable(
        "error EmptyValue();",
        ["/// Raised when the value is missing."],
    );
    contract.add_variable("uint256 private _value;");

    assert_eq!(
        print_contract(&contract, &Options::default()),
        "\
// SPDX-License-Identifier: MIT
// Compatible with OpenZeppelin Contracts ^5.4.0
pragma solidity ^0.8.27;

import {SafeCast} from \"@openzeppelin/contracts/utils/math/SafeCast.sol\";

/// @custom:security-contact security@example.com
contract MyToken {
    using SafeCast for uint256;

    /// Raised when the value is missing.
    error EmptyValue();

    uint256 private _value;
}
"
    );
}

#[test]
fn test_import_only_parents_are_imported_but_not_inherited() {
    let mut contract = Contract::new("MyToken").unwrap();
    contract.add_import_only(ImportContract::new(
        "IERC20",
        "@openzeppelin/contracts/token/ERC20/IERC20.sol",
    ));

    let output = print_contract(&contract, &Options::default());
    assert!(output.contains("import {IERC20} from \"@openzeppelin/contracts/token/ERC20/IERC20.sol\";"));
    assert!(output.contains("contract MyToken {"));
}

#[test]
fn test_imports_grouped_by_path_and_sorted() {
    let mut contract = Contract::new("MyToken").unwrap();
    contract.add_import_only(ImportContract::new("B", "@vendor/pkg/Multi.sol"));
    contract.add_import_only(ImportContract::new("A", "@vendor/pkg/Multi.sol"));
    contract.add_import_only(ImportContract::new("C", "@vendor/aaa/C.sol"));

    let output = print_contract(&contract, &Options::default());
    let c_line = output.find("import {C} from \"@vendor/aaa/C.sol\";");
    let multi_line = output.find("import {A, B} from \"@vendor/pkg/Multi.sol\";");
    assert!(c_line.is_some());
    assert!(multi_line.is_some());
    assert!(c_line < multi_line);
}

#[test]
fn test_compatibility_banner_lists_additional_libraries() {
    let contract = Contract::new("MyToken").unwrap();

    let one_extra = Options {
        additional_compatible_libraries: vec![CompatibleLibrary {
            name: "OpenZeppelin Community Contracts".to_string(),
            version: "^0.0.1".to_string(),
        }],
        ..Options::default()
    };
    assert!(print_contract(&contract, &one_extra).contains(
        "// Compatible with OpenZeppelin Contracts ^5.4.0 and Community Contracts ^0.0.1"
    ));

    let two_extra = Options {
        additional_compatible_libraries: vec![
            CompatibleLibrary {
                name: "OpenZeppelin Community Contracts".to_string(),
                version: "^0.0.1".to_string(),
            },
            CompatibleLibrary {
                name: "Uniswap v4 Periphery".to_string(),
                version: "^1.0.0".to_string(),
            },
        ],
        ..Options::default()
    };
    assert!(print_contract(&contract, &two_extra).contains(
        "// Compatible with OpenZeppelin Contracts ^5.4.0, Community Contracts ^0.0.1 and Uniswap v4 Periphery ^1.0.0"
    ));
}

#[test]
fn test_import_pins_apply_after_upgradeable_rewrite() {
    let mut contract = Contract::new("MyToken").unwrap();
    contract.upgradeable = true;
    contract.add_parent(erc20_import(), vec![]);

    let opts = Options {
        transform_import: Some(ImportPins::openzeppelin().into_transform()),
        ..Options::default()
    };
    assert!(print_contract(&contract, &opts).contains(
        "import {ERC20Upgradeable} from \"@openzeppelin/contracts-upgradeable@5.4.0/token/ERC20/ERC20Upgradeable.sol\";"
    ));
}

#[test]
fn test_default_options_are_equivalent_to_empty_options() {
    let mut contract = Contract::new("MyToken").unwrap();
    contract.add_parent(erc20_import(), vec![Value::from("MyToken"), Value::from("MTK")]);

    let explicit = Options {
        transform_import: None,
        additional_compatible_libraries: Vec::new(),
    };
    assert_eq!(
        print_contract(&contract, &Options::default()),
        print_contract(&contract, &explicit)
    );
}

#[test]
fn test_output_is_deterministic() {
    let mut contract = Contract::new("MyToken").unwrap();
    contract.add_parent(
        erc20_import(),
        vec![Value::from("MyToken"), Value::from("MTK")],
    );
    contract.add_variable("uint256 private _value;");

    let opts = Options::default();
    assert_eq!(
        print_contract(&contract, &opts),
        print_contract(&contract, &opts)
    );
}
