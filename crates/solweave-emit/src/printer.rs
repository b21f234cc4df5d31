//! Linearizes a finished contract model into Solidity source text.
//!
//! Rendering is a pure function of the model and options: no global state, no
//! I/O, and identical input always produces byte-identical output. Downstream
//! snapshot tests depend on that.

use std::collections::BTreeMap;

use solweave_core::{
    stringify_unicode_safe, ArgumentType, Contract, ContractFunction, ContractStruct,
    FunctionArgument, Mutability, Parent, Value,
};

use crate::helpers::{Helpers, Options};
use crate::lines::{format_lines, indent, line, space_between, Lines};
use crate::transpiled::infer_transpiled;
use crate::versioned::COMPATIBLE_CONTRACTS_SEMVER;

/// Language version the pragma line targets.
pub const SOLIDITY_VERSION: &str = "0.8.27";

/// Headings longer than this wrap onto multiple lines.
const MAX_HEADING_LENGTH: usize = 72;

pub fn print_contract(contract: &Contract, opts: &Options) -> String {
    let helpers = Helpers::new(contract, opts);

    // Functions with code first, then those with modifiers, then the rest.
    let mut code_fns: Vec<Vec<Lines>> = Vec::new();
    let mut modifier_fns: Vec<Vec<Lines>> = Vec::new();
    let mut override_fns: Vec<Vec<Lines>> = Vec::new();
    for function in contract.functions() {
        let target = if !function.code.is_empty() {
            &mut code_fns
        } else if !function.modifiers.is_empty() {
            &mut modifier_fns
        } else {
            &mut override_fns
        };
        target.push(print_function(function, &helpers));
    }
    let has_overrides = override_fns.iter().any(|printed| !printed.is_empty());

    let mut sections: Vec<Vec<Lines>> = Vec::new();
    sections.push(print_using_for(contract, &helpers));
    for definition in contract.structs() {
        sections.push(print_struct(definition));
    }
    sections.push(print_commented_variables(contract));
    sections.push(print_plain_variables(contract));
    sections.push(print_constructor(contract, &helpers));
    sections.extend(code_fns);
    sections.extend(modifier_fns);
    if has_overrides {
        sections.push(vec![line(
            "// The following functions are overrides required by Solidity.",
        )]);
    }
    sections.extend(override_fns);

    let mut contract_block: Vec<Lines> = contract
        .natspec_tags
        .iter()
        .map(|tag| line(format!("/// {} {}", tag.key, tag.value)))
        .collect();
    contract_block.push(line(contract_heading(contract, &helpers)));
    contract_block.push(indent(space_between(sections)));
    contract_block.push(line("}"));

    format_lines(&space_between([
        vec![
            line(format!("// SPDX-License-Identifier: {}", contract.license)),
            line(print_compatibility_banner(&helpers)),
            line(format!("pragma solidity ^{SOLIDITY_VERSION};")),
        ],
        print_imports(contract, &helpers),
        contract_block,
    ]))
}

fn contract_heading(contract: &Contract, helpers: &Helpers) -> String {
    let names: Vec<String> = contract
        .parents()
        .iter()
        .map(|p| helpers.transform_name(&p.contract))
        .collect();
    let mut heading = format!("contract {}", contract.name);
    if !names.is_empty() {
        heading.push_str(" is ");
        heading.push_str(&names.join(", "));
    }
    heading.push_str(" {");
    heading
}

fn print_compatibility_banner(helpers: &Helpers) -> String {
    const VENDOR_PREFIX: &str = "OpenZeppelin ";

    let mut entries = vec![format!(
        "OpenZeppelin Contracts {COMPATIBLE_CONTRACTS_SEMVER}"
    )];
    for library in helpers.additional_compatible_libraries() {
        let entry = format!("{} {}", library.name, library.version);
        // Repeating the vendor prefix reads badly; later entries drop it.
        entries.push(
            entry
                .strip_prefix(VENDOR_PREFIX)
                .map(str::to_string)
                .unwrap_or(entry),
        );
    }

    let list = match entries.as_slice() {
        [only] => only.clone(),
        [head @ .., last] => format!("{} and {}", head.join(", "), last),
        [] => unreachable!("banner always has the base entry"),
    };
    format!("// Compatible with {list}")
}

/// One import statement per source path, with paths and the names within a
/// path both sorted alphabetically.
fn print_imports(contract: &Contract, helpers: &Helpers) -> Vec<Lines> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for import in contract.imports() {
        let transformed = helpers.transform_import(import);
        grouped.entry(transformed.path).or_default().push(transformed.name);
    }

    grouped
        .into_iter()
        .map(|(path, mut names)| {
            names.sort();
            names.dedup();
            line(format!("import {{{}}} from \"{path}\";", names.join(", ")))
        })
        .collect()
}

fn print_using_for(contract: &Contract, helpers: &Helpers) -> Vec<Lines> {
    let mut out = Vec::new();
    for library in contract.libraries() {
        let name = helpers.transform_name(&library.contract);
        for target in &library.using_for {
            out.push(line(format!("using {name} for {target};")));
        }
    }
    out
}

fn print_struct(definition: &ContractStruct) -> Vec<Lines> {
    let mut out: Vec<Lines> = definition.comments.iter().map(line).collect();
    if definition.variables.is_empty() {
        out.push(line(format!("struct {} {{}}", definition.name)));
    } else {
        out.push(line(format!("struct {} {{", definition.name)));
        out.push(indent(definition.variables.iter().map(line).collect()));
        out.push(line("}"));
    }
    out
}

/// Declarations that carry comments, with a blank line between each entry.
fn print_commented_variables(contract: &Contract) -> Vec<Lines> {
    space_between(
        contract
            .variables()
            .filter(|v| !v.comments.is_empty())
            .map(|v| {
                let mut entry: Vec<Lines> = v.comments.iter().map(line).collect();
                entry.push(line(&v.code));
                entry
            }),
    )
}

/// Declarations without comments, packed tightly.
fn print_plain_variables(contract: &Contract) -> Vec<Lines> {
    contract
        .variables()
        .filter(|v| v.comments.is_empty())
        .map(|v| line(&v.code))
        .collect()
}

fn print_constructor(contract: &Contract, helpers: &Helpers) -> Vec<Lines> {
    let parents = contract.parents();
    let has_parent_params = parents.iter().any(|p| !p.params.is_empty());
    let has_code = !contract.constructor_code.is_empty();
    let has_args = !contract.constructor_args.is_empty();
    let with_initializers: Vec<&Parent> = parents
        .iter()
        .copied()
        .filter(|p| has_initializer(p))
        .collect();

    let needed = has_parent_params
        || has_code
        || has_args
        || (helpers.upgradeable() && !with_initializers.is_empty());
    if !needed {
        return if helpers.upgradeable() {
            print_disabled_constructor(&[], helpers)
        } else {
            vec![]
        };
    }

    if helpers.upgradeable() {
        let transpiled_parents: Vec<&Parent> = with_initializers
            .iter()
            .copied()
            .filter(|p| infer_transpiled(&p.contract))
            .collect();
        // Initializable and the UUPS base have no explicit constructors.
        let plain_parents: Vec<&Parent> = parents
            .iter()
            .copied()
            .filter(|p| {
                !infer_transpiled(&p.contract)
                    && p.contract.name != "Initializable"
                    && p.contract.name != "UUPSUpgradeable"
            })
            .collect();

        let constructor = print_disabled_constructor(&plain_parents, helpers);

        if transpiled_parents.is_empty() && !has_args && !has_code {
            return constructor;
        }

        let init_calls: Vec<Lines> = transpiled_parents
            .iter()
            .filter_map(|p| print_parent_constructor(p, helpers))
            .map(|call| line(format!("{call};")))
            .collect();
        let args: Vec<String> = contract
            .constructor_args
            .iter()
            .map(|a| print_argument(a, helpers))
            .collect();
        let initializer = print_function_parts(
            &[],
            "function initialize",
            &args,
            &["public".to_string(), "initializer".to_string()],
            space_between([
                init_calls,
                contract.constructor_code.iter().map(line).collect(),
            ]),
        );
        space_between([constructor, initializer])
    } else {
        let chained: Vec<String> = parents
            .iter()
            .filter_map(|p| print_parent_constructor(p, helpers))
            .collect();
        let args: Vec<String> = contract
            .constructor_args
            .iter()
            .map(|a| print_argument(a, helpers))
            .collect();
        print_function_parts(
            &contract.constructor_comments,
            "constructor",
            &args,
            &chained,
            contract.constructor_code.iter().map(line).collect(),
        )
    }
}

fn print_disabled_constructor(plain_parents: &[&Parent], helpers: &Helpers) -> Vec<Lines> {
    let annotation = if plain_parents.is_empty() {
        "/// @custom:oz-upgrades-unsafe-allow constructor"
    } else {
        "/// @custom:oz-upgrades-unsafe-allow-reachable constructor"
    };
    let chained: Vec<String> = plain_parents
        .iter()
        .filter_map(|p| print_parent_constructor(p, helpers))
        .collect();
    print_function_parts(
        &[annotation.to_string()],
        "constructor",
        &[],
        &chained,
        vec![line("_disableInitializers();")],
    )
}

fn has_initializer(parent: &Parent) -> bool {
    !matches!(
        parent.contract.name.as_str(),
        "Initializable" | "UUPSUpgradeable"
    )
}

/// The call chaining a parent's construction: `Name(params)` for plain
/// parents, `__Name_init(params)` when the upgradeable variant is in play.
/// Plain parents without params need no call at all.
fn print_parent_constructor(parent: &Parent, helpers: &Helpers) -> Option<String> {
    let use_transpiled = helpers.upgradeable() && infer_transpiled(&parent.contract);
    let name = if use_transpiled {
        format!("__{}_init", parent.contract.name)
    } else {
        parent.contract.name.clone()
    };
    if use_transpiled || !parent.params.is_empty() {
        let params: Vec<String> = parent.params.iter().map(print_value).collect();
        Some(format!("{}({})", name, params.join(", ")))
    } else {
        None
    }
}

pub fn print_value(value: &Value) -> String {
    match value {
        Value::Lit(lit) => lit.clone(),
        Value::Number(n) => n.to_string(),
        Value::Str(s) => stringify_unicode_safe(s),
        Value::Note { note, value } => format!("{} /* {note} */", print_value(value)),
    }
}

fn print_function(function: &ContractFunction, helpers: &Helpers) -> Vec<Lines> {
    if function.overrides.is_empty()
        && function.modifiers.is_empty()
        && function.code.is_empty()
        && !function.finalized
    {
        return vec![];
    }

    let mut modifiers = vec![function.signature.kind.to_string()];
    if function.mutability != Mutability::NonPayable {
        modifiers.push(function.mutability.to_string());
    }
    match function.overrides.len() {
        0 => {}
        1 => modifiers.push("override".to_string()),
        _ => {
            let parents: Vec<String> = function
                .overrides
                .values()
                .map(|r| helpers.transform_name(r))
                .collect();
            modifiers.push(format!("override({})", parents.join(", ")));
        }
    }
    modifiers.extend(function.modifiers.iter().cloned());
    if !function.signature.returns.is_empty() {
        modifiers.push(format!(
            "returns ({})",
            function.signature.returns.join(", ")
        ));
    }

    let mut code: Vec<Lines> = function.code.iter().map(line).collect();
    if !function.overrides.is_empty() && !function.finalized {
        // Diamond pass-through: delegate to super unless a body was set.
        let arg_names: Vec<&str> = function
            .signature
            .args
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        let super_call = format!("super.{}({});", function.name(), arg_names.join(", "));
        code.push(line(if function.signature.returns.is_empty() {
            super_call
        } else {
            format!("return {super_call}")
        }));
    }

    if modifiers.len() + function.code.len() > 1 {
        let args: Vec<String> = function
            .signature
            .args
            .iter()
            .map(|a| print_argument(a, helpers))
            .collect();
        print_function_parts(
            &function.comments,
            &format!("function {}", function.name()),
            &args,
            &modifiers,
            code,
        )
    } else {
        vec![]
    }
}

// Shared by functions and constructors; `kinded_name` is `function foo` or
// `constructor`.
fn print_function_parts(
    comments: &[String],
    kinded_name: &str,
    args: &[String],
    modifiers: &[String],
    code: Vec<Lines>,
) -> Vec<Lines> {
    let heading_length = kinded_name.len()
        + args.iter().map(String::len).sum::<usize>()
        + modifiers.iter().map(String::len).sum::<usize>();
    let braces = if code.is_empty() { "{}" } else { "{" };

    let mut out: Vec<Lines> = comments.iter().map(line).collect();
    if heading_length <= MAX_HEADING_LENGTH {
        let mut heading = format!("{}({})", kinded_name, args.join(", "));
        for modifier in modifiers {
            heading.push(' ');
            heading.push_str(modifier);
        }
        heading.push(' ');
        heading.push_str(braces);
        out.push(line(heading));
    } else {
        out.push(line(format!("{}({})", kinded_name, args.join(", "))));
        out.push(indent(modifiers.iter().map(line).collect()));
        out.push(line(braces));
    }

    if !code.is_empty() {
        out.push(indent(code));
        out.push(line("}"));
    }
    out
}

fn print_argument(arg: &FunctionArgument, helpers: &Helpers) -> String {
    let arg_type = match &arg.arg_type {
        ArgumentType::Plain(name) => name.clone(),
        ArgumentType::Contract(reference) => helpers.transform_name(reference),
    };
    format!("{} {}", arg_type, arg.name)
}
