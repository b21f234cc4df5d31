use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::OptionsError;
use crate::function::{
    ContractFunction, FunctionArgument, FunctionRegistry, FunctionSignature, Mutability,
};
use crate::identifier::to_identifier;

/// Anything that can stand in for a base contract in overrides, argument
/// types, and import transforms. Name and the optional transpiled flag are
/// always present; only import entries carry a source path.
pub trait Referenced {
    fn name(&self) -> &str;

    fn path(&self) -> Option<&str> {
        None
    }

    fn transpiled(&self) -> Option<bool>;
}

/// A by-name reference to a base contract, without import information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractReference {
    pub name: String,
    pub transpiled: Option<bool>,
}

impl ContractReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transpiled: None,
        }
    }

    pub fn with_transpiled(mut self, transpiled: bool) -> Self {
        self.transpiled = Some(transpiled);
        self
    }
}

impl Referenced for ContractReference {
    fn name(&self) -> &str {
        &self.name
    }

    fn transpiled(&self) -> Option<bool> {
        self.transpiled
    }
}

/// A base contract together with the path it is imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportContract {
    pub name: String,
    pub path: String,
    pub transpiled: Option<bool>,
}

impl ImportContract {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            transpiled: None,
        }
    }

    pub fn with_transpiled(mut self, transpiled: bool) -> Self {
        self.transpiled = Some(transpiled);
        self
    }

    pub fn reference(&self) -> ContractReference {
        ContractReference {
            name: self.name.clone(),
            transpiled: self.transpiled,
        }
    }
}

impl Referenced for ImportContract {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn transpiled(&self) -> Option<bool> {
        self.transpiled
    }
}

/// A constructor argument value as it should appear in the emitted source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// A string literal, escaped and `unicode""`-wrapped on render.
    Str(String),
    Number(i64),
    /// Raw source text, emitted verbatim.
    Lit(String),
    /// A value followed by an inline `/* note */`.
    Note { note: String, value: Box<Value> },
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    pub contract: ImportContract,
    pub params: Vec<Value>,
    /// Present in the import list only; excluded from the inheritance clause
    /// and the constructor chain.
    pub import_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub contract: ImportContract,
    pub using_for: IndexSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatspecTag {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub code: String,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStruct {
    pub name: String,
    pub comments: Vec<String>,
    pub variables: Vec<String>,
}

impl ContractStruct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comments: Vec::new(),
            variables: Vec::new(),
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }
}

/// The mutable contract model. Feature wiring builds it up through the
/// mutators below, an optional transform rewrites the construction plan, and
/// the printer consumes it read-only.
///
/// Parent, library, variable and function identity is structural: re-adding
/// an already-present entry is a no-op that reports `false`, and the first
/// registration wins. That lets independent feature modules call the same
/// mutators without coordinating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub name: String,
    pub license: String,
    /// Set by the upgradeability transform; switches constructor rendering to
    /// the initializer strategy.
    pub upgradeable: bool,
    pub natspec_tags: Vec<NatspecTag>,
    pub constructor_args: Vec<FunctionArgument>,
    pub constructor_code: Vec<String>,
    pub constructor_comments: Vec<String>,
    parents: IndexMap<String, Parent>,
    libraries: IndexMap<String, Library>,
    variables: IndexMap<String, VariableDefinition>,
    structs: IndexMap<String, ContractStruct>,
    functions: FunctionRegistry,
}

impl Contract {
    pub fn new(name: &str) -> Result<Self, OptionsError> {
        Ok(Self {
            name: to_identifier(name, true)?,
            license: "MIT".to_string(),
            upgradeable: false,
            natspec_tags: Vec::new(),
            constructor_args: Vec::new(),
            constructor_code: Vec::new(),
            constructor_comments: Vec::new(),
            parents: IndexMap::new(),
            libraries: IndexMap::new(),
            variables: IndexMap::new(),
            structs: IndexMap::new(),
            functions: FunctionRegistry::new(),
        })
    }

    /// Adds an inheritance parent. Returns whether the parent was newly
    /// added; when it was already present the original construction params
    /// are kept, so later callers cannot silently change them.
    pub fn add_parent(&mut self, contract: ImportContract, params: Vec<Value>) -> bool {
        if self.parents.contains_key(&contract.name) {
            return false;
        }
        self.parents.insert(
            contract.name.clone(),
            Parent {
                contract,
                params,
                import_only: false,
            },
        );
        true
    }

    /// Registers a contract for import purposes only; it will not appear in
    /// the inheritance clause or the constructor chain.
    pub fn add_import_only(&mut self, contract: ImportContract) -> bool {
        if self.parents.contains_key(&contract.name) {
            return false;
        }
        self.parents.insert(
            contract.name.clone(),
            Parent {
                contract,
                params: Vec::new(),
                import_only: true,
            },
        );
        true
    }

    /// Registers a `using X for Y` library, unioning the type set into any
    /// existing entry. Returns whether the registration changed anything.
    pub fn add_library<I, S>(&mut self, contract: ImportContract, using_for: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.libraries.get_mut(&contract.name) {
            Some(existing) => {
                let initial = existing.using_for.len();
                existing.using_for.extend(using_for.into_iter().map(Into::into));
                existing.using_for.len() > initial
            }
            None => {
                self.libraries.insert(
                    contract.name.clone(),
                    Library {
                        contract,
                        using_for: using_for.into_iter().map(Into::into).collect(),
                    },
                );
                true
            }
        }
    }

    pub fn add_override(
        &mut self,
        parent: ContractReference,
        signature: &FunctionSignature,
        mutability: Option<Mutability>,
    ) {
        self.functions.add_override(parent, signature, mutability);
    }

    pub fn add_modifier(&mut self, modifier: impl Into<String>, signature: &FunctionSignature) {
        self.functions.add_modifier(modifier, signature);
    }

    /// Appends a statement to the function body. Panics once the body has
    /// been finalized with [`Contract::set_function_body`].
    pub fn add_function_code(
        &mut self,
        line: impl Into<String>,
        signature: &FunctionSignature,
        mutability: Option<Mutability>,
    ) {
        self.functions.add_code(line, signature, mutability);
    }

    /// Replaces the function body wholesale and marks it final, suppressing
    /// the default `super` pass-through. Panics if code was already appended.
    pub fn set_function_body<I, S>(
        &mut self,
        lines: I,
        signature: &FunctionSignature,
        mutability: Option<Mutability>,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions.set_body(lines, signature, mutability);
    }

    pub fn set_function_comments<I, S>(&mut self, comments: I, signature: &FunctionSignature)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions.set_comments(comments, signature);
    }

    pub fn add_natspec_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let body = key.strip_prefix("@custom:").unwrap_or(&key);
        let mut chars = body.chars();
        let valid = matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
            && chars.all(|c| c.is_ascii_lowercase() || c == '-');
        if !valid {
            panic!("invalid natspec key: {key}");
        }
        self.natspec_tags.push(NatspecTag {
            key,
            value: value.into(),
        });
    }

    pub fn add_constructor_argument(&mut self, arg: FunctionArgument) {
        self.constructor_args.push(arg);
    }

    pub fn add_constructor_code(&mut self, line: impl Into<String>) {
        self.constructor_code.push(line.into());
    }

    /// Panics when the contract is flagged upgradeable: the constructor is
    /// then rewritten into an initializer and the comment would be lost.
    pub fn add_constructor_comment(&mut self, comment: impl Into<String>) {
        if self.upgradeable {
            panic!("constructor comments are not supported on upgradeable contracts");
        }
        self.constructor_comments.push(comment.into());
    }

    /// Adds a variable or error declaration line. Set semantics on the exact
    /// code line; returns whether it was newly inserted.
    pub fn add_variable(&mut self, code: impl Into<String>) -> bool {
        self.insert_variable(code.into(), Vec::new())
    }

    pub fn add_commented_variable<I, S>(&mut self, code: impl Into<String>, comments: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert_variable(
            code.into(),
            comments.into_iter().map(Into::into).collect(),
        )
    }

    fn insert_variable(&mut self, code: String, comments: Vec<String>) -> bool {
        if self.variables.contains_key(&code) {
            return false;
        }
        self.variables
            .insert(code.clone(), VariableDefinition { code, comments });
        true
    }

    /// Appends a member to a struct definition, creating the struct on first
    /// use. The first registration of a struct name fixes its comments.
    pub fn add_struct_variable(&mut self, definition: &ContractStruct, variable: impl Into<String>) {
        let entry = self
            .structs
            .entry(definition.name.clone())
            .or_insert_with(|| ContractStruct {
                name: definition.name.clone(),
                comments: definition.comments.clone(),
                variables: Vec::new(),
            });
        entry.variables.push(variable.into());
    }

    /// Visible inheritance parents in registration order, except that
    /// `Initializable` always sorts first.
    pub fn parents(&self) -> Vec<&Parent> {
        let mut parents: Vec<&Parent> =
            self.parents.values().filter(|p| !p.import_only).collect();
        parents.sort_by_key(|p| p.contract.name != "Initializable");
        parents
    }

    /// Everything that needs an import statement: parents (including
    /// import-only entries) followed by libraries.
    pub fn imports(&self) -> Vec<&ImportContract> {
        self.parents
            .values()
            .map(|p| &p.contract)
            .chain(self.libraries.values().map(|l| &l.contract))
            .collect()
    }

    pub fn functions(&self) -> impl Iterator<Item = &ContractFunction> {
        self.functions.iter()
    }

    pub fn function(&self, signature: &FunctionSignature) -> Option<&ContractFunction> {
        self.functions.get(signature)
    }

    pub fn libraries(&self) -> impl Iterator<Item = &Library> {
        self.libraries.values()
    }

    pub fn variables(&self) -> impl Iterator<Item = &VariableDefinition> {
        self.variables.values()
    }

    pub fn structs(&self) -> impl Iterator<Item = &ContractStruct> {
        self.structs.values()
    }
}
