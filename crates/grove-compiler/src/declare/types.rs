//! Resolved types and the type environment they are declared into.

use std::fmt::{self, Write};

use grove_core::GrammarSymbol;
use indexmap::IndexMap;

use super::model::QualifiedName;
use crate::Result;
use crate::ast::Ast;
use crate::error::Error;

/// Built-in type keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BasicType {
    Value,
    Void,
    Bool,
    Int,
    Real,
    Rational,
    Num,
    String,
    Loc,
    DateTime,
    Node,
    List,
    Set,
    Bag,
    Map,
    Tuple,
    Relation,
    ListRelation,
    Type,
}

impl BasicType {
    /// Basic type named by a `BasicType` AST constructor.
    pub fn from_constructor(name: &str) -> Option<Self> {
        let basic = match name {
            "Value" => Self::Value,
            "Void" => Self::Void,
            "Bool" => Self::Bool,
            "Int" => Self::Int,
            "Real" => Self::Real,
            "Rational" => Self::Rational,
            "Num" => Self::Num,
            "String" => Self::String,
            "Loc" => Self::Loc,
            "DateTime" => Self::DateTime,
            "Node" => Self::Node,
            "List" => Self::List,
            "Set" => Self::Set,
            "Bag" => Self::Bag,
            "Map" => Self::Map,
            "Tuple" => Self::Tuple,
            "Relation" => Self::Relation,
            "ListRelation" => Self::ListRelation,
            "Type" => Self::Type,
            _ => return None,
        };
        Some(basic)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Real => "real",
            Self::Rational => "rat",
            Self::Num => "num",
            Self::String => "str",
            Self::Loc => "loc",
            Self::DateTime => "datetime",
            Self::Node => "node",
            Self::List => "list",
            Self::Set => "set",
            Self::Bag => "bag",
            Self::Map => "map",
            Self::Tuple => "tuple",
            Self::Relation => "rel",
            Self::ListRelation => "lrel",
            Self::Type => "type",
        }
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A resolved type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Basic(BasicType),
    /// Basic type constructor applied to arguments, such as `list[int]`.
    Structured { kind: BasicType, args: Vec<Type> },
    Adt { name: String, parameters: Vec<Type> },
    Alias {
        name: String,
        parameters: Vec<Type>,
        aliased: Box<Type>,
    },
    /// Type variable `&name <: bound`.
    Parameter { name: String, bound: Box<Type> },
    NonTerminal(GrammarSymbol),
}

impl Type {
    pub fn value() -> Self {
        Self::Basic(BasicType::Value)
    }

    /// Name of a declared type; `None` for built-in and grammar types.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Self::Adt { name, .. } | Self::Alias { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn parameters(&self) -> &[Type] {
        match self {
            Self::Adt { parameters, .. } | Self::Alias { parameters, .. } => parameters,
            _ => &[],
        }
    }

    /// Same declared type applied to other parameters.
    pub fn instantiate(&self, parameters: Vec<Type>) -> Type {
        match self {
            Self::Adt { name, .. } => Self::Adt {
                name: name.clone(),
                parameters,
            },
            Self::Alias { name, aliased, .. } => Self::Alias {
                name: name.clone(),
                parameters,
                aliased: aliased.clone(),
            },
            other => other.clone(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(basic) => write!(f, "{basic}"),
            Self::Structured { kind, args } => {
                write!(f, "{kind}")?;
                write_parameters(f, args)
            }
            Self::Adt { name, parameters } | Self::Alias { name, parameters, .. } => {
                f.write_str(name)?;
                write_parameters(f, parameters)
            }
            Self::Parameter { name, bound } => {
                write!(f, "&{name}")?;
                if **bound != Type::value() {
                    write!(f, " <: {bound}")?;
                }
                Ok(())
            }
            Self::NonTerminal(sym) => write!(f, "{sym}"),
        }
    }
}

fn write_parameters(f: &mut fmt::Formatter<'_>, parameters: &[Type]) -> fmt::Result {
    if parameters.is_empty() {
        return Ok(());
    }
    f.write_str("[")?;
    for (i, p) in parameters.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{p}")?;
    }
    f.write_str("]")
}

/// Labeled constructor field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub label: String,
    pub ty: Type,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.label)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeywordParameter {
    pub name: String,
    pub ty: Type,
    /// Default value expression, evaluated by the consumer.
    pub default: Ast,
}

/// What a set of keyword parameters is attached to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeywordOwner {
    /// Shared by every constructor of the data type.
    Adt(String),
    Constructor { adt: String, name: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdtDef {
    pub name: String,
    pub parameters: Vec<Type>,
}

impl AdtDef {
    pub fn as_type(&self) -> Type {
        Type::Adt {
            name: self.name.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasDef {
    pub name: String,
    pub parameters: Vec<Type>,
    pub aliased: Type,
}

impl AliasDef {
    pub fn as_type(&self) -> Type {
        Type::Alias {
            name: self.name.clone(),
            parameters: self.parameters.clone(),
            aliased: Box::new(self.aliased.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructorDef {
    pub adt: String,
    pub name: String,
    pub fields: Vec<Field>,
}

/// Destination of resolved declarations.
///
/// Declaring an entity that already exists with the same definition is a
/// no-op; a conflicting redeclaration is an error.
pub trait TypeStore {
    /// Look up a declared data type or alias.
    fn lookup_type(&self, name: &QualifiedName) -> Option<Type>;

    fn declare_adt(&mut self, name: &str, parameters: Vec<Type>) -> Result<Type>;

    fn declare_alias(&mut self, name: &str, parameters: Vec<Type>, aliased: Type) -> Result<Type>;

    fn declare_constructor(&mut self, adt: &Type, name: &str, fields: Vec<Field>) -> Result<()>;

    fn declare_keyword_parameters(
        &mut self,
        owner: KeywordOwner,
        parameters: Vec<KeywordParameter>,
    ) -> Result<()>;
}

/// In-memory type environment of one module.
#[derive(Clone, Debug, Default)]
pub struct TypeEnv {
    module: Option<String>,
    adts: IndexMap<String, AdtDef>,
    aliases: IndexMap<String, AliasDef>,
    constructors: IndexMap<(String, String), ConstructorDef>,
    keyword_parameters: IndexMap<KeywordOwner, Vec<KeywordParameter>>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment of a named module. Names qualified with it resolve here too.
    pub fn for_module(name: &str) -> Self {
        Self {
            module: Some(name.to_owned()),
            ..Self::default()
        }
    }

    pub fn adt(&self, name: &str) -> Option<&AdtDef> {
        self.adts.get(name)
    }

    pub fn alias(&self, name: &str) -> Option<&AliasDef> {
        self.aliases.get(name)
    }

    pub fn constructor(&self, adt: &str, name: &str) -> Option<&ConstructorDef> {
        self.constructors.get(&(adt.to_owned(), name.to_owned()))
    }

    pub fn constructors_of<'a>(&'a self, adt: &'a str) -> impl Iterator<Item = &'a ConstructorDef> {
        self.constructors.values().filter(move |c| c.adt == adt)
    }

    pub fn keyword_parameters(&self, owner: &KeywordOwner) -> &[KeywordParameter] {
        self.keyword_parameters
            .get(owner)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn adts(&self) -> impl Iterator<Item = &AdtDef> {
        self.adts.values()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &AliasDef> {
        self.aliases.values()
    }

    /// Local name a qualified name refers to, if it refers into this module.
    fn local_name<'a>(&self, name: &'a QualifiedName) -> Option<&'a str> {
        match name.qualifier() {
            None => Some(name.name()),
            Some(q) if self.module.as_deref() == Some(q.as_str()) => Some(name.name()),
            Some(_) => None,
        }
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> fmt::Result {
        for adt in self.adts.values() {
            write!(w, "data {}", adt.as_type())?;
            self.format_keywords(w, &KeywordOwner::Adt(adt.name.clone()))?;
            writeln!(w)?;
            for cons in self.constructors_of(&adt.name) {
                write!(w, "  {}(", cons.name)?;
                for (i, field) in cons.fields.iter().enumerate() {
                    if i > 0 {
                        w.write_str(", ")?;
                    }
                    write!(w, "{field}")?;
                }
                w.write_str(")")?;
                let owner = KeywordOwner::Constructor {
                    adt: adt.name.clone(),
                    name: cons.name.clone(),
                };
                self.format_keywords(w, &owner)?;
                writeln!(w)?;
            }
        }
        for alias in self.aliases.values() {
            writeln!(w, "alias {} = {}", alias.as_type(), alias.aliased)?;
        }
        Ok(())
    }

    fn format_keywords(&self, w: &mut impl Write, owner: &KeywordOwner) -> fmt::Result {
        let params = self.keyword_parameters(owner);
        if params.is_empty() {
            return Ok(());
        }
        w.write_str(" {")?;
        for (i, p) in params.iter().enumerate() {
            if i > 0 {
                w.write_str(", ")?;
            }
            write!(w, "{} {}", p.ty, p.name)?;
        }
        w.write_str("}")
    }
}

impl TypeStore for TypeEnv {
    fn lookup_type(&self, name: &QualifiedName) -> Option<Type> {
        let local = self.local_name(name)?;
        if let Some(adt) = self.adts.get(local) {
            return Some(adt.as_type());
        }
        self.aliases.get(local).map(AliasDef::as_type)
    }

    fn declare_adt(&mut self, name: &str, parameters: Vec<Type>) -> Result<Type> {
        if self.aliases.contains_key(name) {
            return Err(redeclared(name));
        }
        if let Some(existing) = self.adts.get(name) {
            if existing.parameters.len() != parameters.len() {
                return Err(redeclared(name));
            }
            return Ok(existing.as_type());
        }
        let def = AdtDef {
            name: name.to_owned(),
            parameters,
        };
        let ty = def.as_type();
        self.adts.insert(name.to_owned(), def);
        Ok(ty)
    }

    fn declare_alias(&mut self, name: &str, parameters: Vec<Type>, aliased: Type) -> Result<Type> {
        if self.adts.contains_key(name) {
            return Err(redeclared(name));
        }
        let def = AliasDef {
            name: name.to_owned(),
            parameters,
            aliased,
        };
        if let Some(existing) = self.aliases.get(name) {
            if *existing != def {
                return Err(redeclared(name));
            }
            return Ok(existing.as_type());
        }
        let ty = def.as_type();
        self.aliases.insert(name.to_owned(), def);
        Ok(ty)
    }

    fn declare_constructor(&mut self, adt: &Type, name: &str, fields: Vec<Field>) -> Result<()> {
        let Some(adt_name) = adt.declared_name() else {
            return Err(Error::implementation(format!(
                "constructor {name} declared for non-data type {adt}"
            )));
        };
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.label == field.label) {
                return Err(Error::RedeclaredField {
                    field: field.label.clone(),
                    constructor: name.to_owned(),
                });
            }
        }

        let key = (adt_name.to_owned(), name.to_owned());
        if let Some(existing) = self.constructors.get(&key) {
            if existing.fields != fields {
                return Err(redeclared(name));
            }
            return Ok(());
        }
        self.constructors.insert(
            key,
            ConstructorDef {
                adt: adt_name.to_owned(),
                name: name.to_owned(),
                fields,
            },
        );
        Ok(())
    }

    fn declare_keyword_parameters(
        &mut self,
        owner: KeywordOwner,
        parameters: Vec<KeywordParameter>,
    ) -> Result<()> {
        let declared = self.keyword_parameters.entry(owner).or_default();
        for param in parameters {
            match declared.iter_mut().find(|p| p.name == param.name) {
                Some(slot) => *slot = param,
                None => declared.push(param),
            }
        }
        Ok(())
    }
}

fn redeclared(name: &str) -> Error {
    Error::RedeclaredType {
        name: name.to_owned(),
    }
}
