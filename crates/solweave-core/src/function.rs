use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contract::ContractReference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Private,
    Internal,
    Public,
    External,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Internal => "internal",
            Visibility::Public => "public",
            Visibility::External => "external",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Variant order is the merge lattice: combining call sites takes the max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

impl Mutability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mutability::Pure => "pure",
            Mutability::View => "view",
            Mutability::NonPayable => "nonpayable",
            Mutability::Payable => "payable",
        }
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgumentType {
    /// A primitive or otherwise literal type name, emitted as-is.
    Plain(String),
    /// A referenced contract type, subject to name transformation on render.
    Contract(ContractReference),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionArgument {
    pub arg_type: ArgumentType,
    pub name: String,
}

impl FunctionArgument {
    pub fn new(arg_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            arg_type: ArgumentType::Plain(arg_type.into()),
            name: name.into(),
        }
    }

    pub fn contract(reference: ContractReference, name: impl Into<String>) -> Self {
        Self {
            arg_type: ArgumentType::Contract(reference),
            name: name.into(),
        }
    }
}

/// The identity-bearing description of a function: what feature wiring hands
/// to the builder when it wants to contribute to a function, whether or not
/// that function exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub args: Vec<FunctionArgument>,
    pub returns: Vec<String>,
    pub kind: Visibility,
    pub mutability: Option<Mutability>,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, kind: Visibility) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            returns: Vec::new(),
            kind,
            mutability: None,
        }
    }

    pub fn arg(mut self, arg_type: impl Into<String>, name: impl Into<String>) -> Self {
        self.args.push(FunctionArgument::new(arg_type, name));
        self
    }

    pub fn returns(mut self, ret: impl Into<String>) -> Self {
        self.returns.push(ret.into());
        self
    }

    pub fn mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = Some(mutability);
        self
    }

    /// Registry key. Identity is structural: the name plus the argument name
    /// tuple, so independent feature modules contributing to the same logical
    /// function land on one entry.
    pub fn key(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(|a| a.name.as_str()).collect();
        format!("{}({})", self.name, args.join(","))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractFunction {
    pub signature: FunctionSignature,
    /// Base contracts claiming this function, keyed by name for deterministic
    /// iteration. Size drives the rendered override clause.
    pub overrides: IndexMap<String, ContractReference>,
    pub modifiers: Vec<String>,
    pub code: Vec<String>,
    pub mutability: Mutability,
    pub finalized: bool,
    pub comments: Vec<String>,
}

impl ContractFunction {
    fn from_signature(signature: &FunctionSignature) -> Self {
        Self {
            mutability: signature.mutability.unwrap_or(Mutability::NonPayable),
            signature: signature.clone(),
            overrides: IndexMap::new(),
            modifiers: Vec::new(),
            code: Vec::new(),
            finalized: false,
            comments: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }
}

/// Signature-keyed function store. Every mutation funnels through
/// [`FunctionRegistry::get_or_create`] so repeated contributions to the same
/// logical function accumulate instead of colliding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionRegistry {
    functions: IndexMap<String, ContractFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, signature: &FunctionSignature) -> &mut ContractFunction {
        self.functions
            .entry(signature.key())
            .or_insert_with(|| ContractFunction::from_signature(signature))
    }

    pub fn add_override(
        &mut self,
        parent: ContractReference,
        signature: &FunctionSignature,
        mutability: Option<Mutability>,
    ) {
        let function = self.get_or_create(signature);
        function.overrides.insert(parent.name.clone(), parent);
        if let Some(mutability) = mutability {
            function.mutability = function.mutability.max(mutability);
        }
    }

    pub fn add_modifier(&mut self, modifier: impl Into<String>, signature: &FunctionSignature) {
        self.get_or_create(signature).modifiers.push(modifier.into());
    }

    pub fn add_code(
        &mut self,
        line: impl Into<String>,
        signature: &FunctionSignature,
        mutability: Option<Mutability>,
    ) {
        let function = self.get_or_create(signature);
        if function.finalized {
            panic!("function {} is already finalized", signature.name);
        }
        function.code.push(line.into());
        if let Some(mutability) = mutability {
            function.mutability = function.mutability.max(mutability);
        }
    }

    pub fn set_body<I, S>(
        &mut self,
        lines: I,
        signature: &FunctionSignature,
        mutability: Option<Mutability>,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let function = self.get_or_create(signature);
        if function.finalized {
            panic!("function {} is already finalized", signature.name);
        }
        if !function.code.is_empty() {
            panic!("function {} already has additional code", signature.name);
        }
        function.code.extend(lines.into_iter().map(Into::into));
        function.finalized = true;
        if let Some(mutability) = mutability {
            function.mutability = mutability;
        }
    }

    pub fn set_comments<I, S>(&mut self, comments: I, signature: &FunctionSignature)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let function = self.get_or_create(signature);
        if !function.comments.is_empty() {
            panic!("function {} already has comments", signature.name);
        }
        function.comments = comments.into_iter().map(Into::into).collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContractFunction> {
        self.functions.values()
    }

    pub fn get(&self, signature: &FunctionSignature) -> Option<&ContractFunction> {
        self.functions.get(&signature.key())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
