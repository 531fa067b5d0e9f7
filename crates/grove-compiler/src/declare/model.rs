//! Typed view of declaration ASTs.
//!
//! The resolver works on these structs rather than on raw [`Ast`] nodes.
//! [`collect_declarations`] reads them off the toplevels of a module body;
//! embedders with their own front-end can build them directly.

use std::fmt;

use grove_core::{GrammarSymbol, Span};

use super::types::BasicType;
use crate::Result;
use crate::ast::Ast;
use crate::convert::type_symbol;
use crate::error::Error;

/// Possibly qualified name, `a::b::C`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    parts: Vec<String>,
}

impl QualifiedName {
    /// # Panics
    /// Panics if `parts` is empty.
    pub fn new(parts: Vec<String>) -> Self {
        assert!(!parts.is_empty(), "QualifiedName: needs at least one part");
        Self { parts }
    }

    pub fn simple(name: &str) -> Self {
        Self {
            parts: vec![name.to_owned()],
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.parts.len() > 1
    }

    /// Last part.
    pub fn name(&self) -> &str {
        self.parts.last().map_or("", String::as_str)
    }

    /// Everything before the last part, if qualified.
    pub fn qualifier(&self) -> Option<String> {
        let (_, init) = self.parts.split_last()?;
        (!init.is_empty()).then(|| init.join("::"))
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("::"))
    }
}

/// Unresolved type expression.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    Basic(BasicType),
    Structured { kind: BasicType, args: Vec<TypeArg> },
    User(UserType),
    Variable(TypeVar),
    /// Grammar nonterminal used as a type.
    Symbol(GrammarSymbol),
}

/// Reference to a data type or alias, possibly applied to parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct UserType {
    pub name: QualifiedName,
    pub parameters: Vec<TypeExpr>,
    pub span: Option<Span>,
}

impl UserType {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            parameters: Vec::new(),
            span: None,
        }
    }

    pub fn parametric(name: QualifiedName, parameters: Vec<TypeExpr>) -> Self {
        Self {
            name,
            parameters,
            span: None,
        }
    }
}

/// `&name` or `&name <: bound`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeVar {
    pub name: String,
    pub bound: Option<Box<TypeExpr>>,
}

/// Constructor field or structured type argument, optionally labeled.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeArg {
    pub ty: TypeExpr,
    pub name: Option<String>,
}

impl TypeArg {
    pub fn unnamed(ty: TypeExpr) -> Self {
        Self { ty, name: None }
    }

    pub fn named(ty: TypeExpr, name: &str) -> Self {
        Self {
            ty,
            name: Some(name.to_owned()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeywordFormal {
    pub ty: TypeExpr,
    pub name: String,
    pub default: Ast,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    pub name: String,
    pub arguments: Vec<TypeArg>,
    pub keyword_formals: Vec<KeywordFormal>,
}

impl Variant {
    pub fn new(name: &str, arguments: Vec<TypeArg>) -> Self {
        Self {
            name: name.to_owned(),
            arguments,
            keyword_formals: Vec::new(),
        }
    }
}

/// `data T(kw) = V1 | V2`.
#[derive(Clone, Debug, PartialEq)]
pub struct DataDecl {
    pub user: UserType,
    pub common_keyword_formals: Vec<KeywordFormal>,
    pub variants: Vec<Variant>,
}

/// `data T(kw);` without constructors.
#[derive(Clone, Debug, PartialEq)]
pub struct DataAbstractDecl {
    pub user: UserType,
    pub common_keyword_formals: Vec<KeywordFormal>,
}

/// `alias T = Base;`.
#[derive(Clone, Debug, PartialEq)]
pub struct AliasDecl {
    pub user: UserType,
    pub base: TypeExpr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    Data(DataDecl),
    DataAbstract(DataAbstractDecl),
    Alias(AliasDecl),
}

impl Declaration {
    /// Type declarations among module toplevels; everything else is skipped.
    pub fn from_toplevel(toplevel: &Ast) -> Result<Option<Self>> {
        if toplevel.sort() == "Toplevel" && toplevel.is_ambiguity() {
            return Err(ambiguous(toplevel));
        }
        if !toplevel.is("Toplevel", "GivenVisibility") {
            return Ok(None);
        }
        Self::from_ast(node(toplevel, 0, "toplevel")?)
    }

    pub fn from_ast(decl: &Ast) -> Result<Option<Self>> {
        if decl.sort() != "Declaration" {
            return Err(malformed("declaration", decl));
        }
        if decl.is_ambiguity() {
            return Err(ambiguous(decl));
        }
        let declaration = match decl.constructor() {
            "Data" => Self::Data(DataDecl {
                user: UserType::from_ast(node(decl, 2, "data declaration")?)?,
                common_keyword_formals: common_keyword_formals(node(decl, 3, "data declaration")?)?,
                variants: list(decl, 4, "data declaration")?
                    .iter()
                    .map(Variant::from_ast)
                    .collect::<Result<_>>()?,
            }),
            "DataAbstract" => Self::DataAbstract(DataAbstractDecl {
                user: UserType::from_ast(node(decl, 2, "data declaration")?)?,
                common_keyword_formals: common_keyword_formals(node(decl, 3, "data declaration")?)?,
            }),
            "Alias" => Self::Alias(AliasDecl {
                user: UserType::from_ast(node(decl, 2, "alias declaration")?)?,
                base: TypeExpr::from_ast(node(decl, 3, "alias declaration")?)?,
            }),
            _ => return Ok(None),
        };
        Ok(Some(declaration))
    }
}

/// Type declarations of a module body's toplevels, in source order.
pub fn collect_declarations(toplevels: &[Ast]) -> Result<Vec<Declaration>> {
    let mut declarations = Vec::new();
    for toplevel in toplevels {
        if let Some(decl) = Declaration::from_toplevel(toplevel)? {
            declarations.push(decl);
        }
    }
    Ok(declarations)
}

impl QualifiedName {
    pub fn from_ast(ast: &Ast) -> Result<Self> {
        if !ast.is("QualifiedName", "Default") {
            return Err(malformed("qualified name", ast));
        }
        let parts = list(ast, 0, "qualified name")?
            .iter()
            .map(name_text)
            .collect::<Result<Vec<_>>>()?;
        if parts.is_empty() {
            return Err(malformed("qualified name", ast));
        }
        Ok(Self { parts })
    }
}

impl UserType {
    pub fn from_ast(ast: &Ast) -> Result<Self> {
        let name = QualifiedName::from_ast(node(ast, 0, "user type")?)?;
        let parameters = match ast.constructor() {
            "Name" => Vec::new(),
            "Parametric" => list(ast, 1, "user type")?
                .iter()
                .map(TypeExpr::from_ast)
                .collect::<Result<_>>()?,
            _ => return Err(malformed("user type", ast)),
        };
        Ok(Self {
            name,
            parameters,
            span: ast.span(),
        })
    }
}

impl TypeExpr {
    pub fn from_ast(ty: &Ast) -> Result<Self> {
        if ty.sort() != "Type" {
            return Err(malformed("type", ty));
        }
        let inner = node(ty, 0, "type")?;
        let expr = match ty.constructor() {
            "Basic" => Self::Basic(basic_type(inner)?),
            "Structured" => Self::Structured {
                kind: basic_type(node(inner, 0, "structured type")?)?,
                args: list(inner, 1, "structured type")?
                    .iter()
                    .map(TypeArg::from_ast)
                    .collect::<Result<_>>()?,
            },
            "User" => Self::User(UserType::from_ast(inner)?),
            "Variable" => Self::Variable(TypeVar::from_ast(inner)?),
            "Symbol" => Self::Symbol(type_symbol(ty).ok_or_else(|| malformed("symbol type", ty))?),
            "Bracket" => Self::from_ast(inner)?,
            _ => return Err(malformed("type", ty)),
        };
        Ok(expr)
    }
}

impl TypeVar {
    pub fn from_ast(ast: &Ast) -> Result<Self> {
        let name = name_text(node(ast, 0, "type variable")?)?;
        let bound = match ast.constructor() {
            "Free" => None,
            "Bounded" => Some(Box::new(TypeExpr::from_ast(node(ast, 1, "type variable")?)?)),
            _ => return Err(malformed("type variable", ast)),
        };
        Ok(Self { name, bound })
    }
}

impl TypeArg {
    pub fn from_ast(ast: &Ast) -> Result<Self> {
        let ty = TypeExpr::from_ast(node(ast, 0, "type argument")?)?;
        let name = match ast.constructor() {
            "Default" => None,
            "Named" => Some(name_text(node(ast, 1, "type argument")?)?),
            _ => return Err(malformed("type argument", ast)),
        };
        Ok(Self { ty, name })
    }
}

impl KeywordFormal {
    pub fn from_ast(ast: &Ast) -> Result<Self> {
        if !ast.is("KeywordFormal", "Default") {
            return Err(malformed("keyword formal", ast));
        }
        Ok(Self {
            ty: TypeExpr::from_ast(node(ast, 0, "keyword formal")?)?,
            name: name_text(node(ast, 1, "keyword formal")?)?,
            default: node(ast, 2, "keyword formal")?.clone(),
        })
    }
}

impl Variant {
    pub fn from_ast(ast: &Ast) -> Result<Self> {
        if !ast.is("Variant", "NAryConstructor") {
            return Err(malformed("variant", ast));
        }
        let keyword_formals = node(ast, 2, "variant")?;
        Ok(Self {
            name: name_text(node(ast, 0, "variant")?)?,
            arguments: list(ast, 1, "variant")?
                .iter()
                .map(TypeArg::from_ast)
                .collect::<Result<_>>()?,
            keyword_formals: match keyword_formals.constructor() {
                "Default" => keyword_formal_list(list(keyword_formals, 0, "keyword formals")?)?,
                _ => Vec::new(),
            },
        })
    }
}

fn common_keyword_formals(ast: &Ast) -> Result<Vec<KeywordFormal>> {
    match ast.constructor() {
        "Present" => keyword_formal_list(list(ast, 0, "keyword parameters")?),
        _ => Ok(Vec::new()),
    }
}

fn keyword_formal_list(formals: &[Ast]) -> Result<Vec<KeywordFormal>> {
    formals.iter().map(KeywordFormal::from_ast).collect()
}

fn basic_type(ast: &Ast) -> Result<BasicType> {
    BasicType::from_constructor(ast.constructor()).ok_or_else(|| malformed("basic type", ast))
}

/// Text of a name token, with the keyword escape removed.
fn name_text(ast: &Ast) -> Result<String> {
    let text = ast.text().ok_or_else(|| malformed("name", ast))?;
    Ok(text.strip_prefix('\\').unwrap_or(text).to_owned())
}

fn node<'a>(ast: &'a Ast, index: usize, what: &str) -> Result<&'a Ast> {
    ast.node_arg(index).ok_or_else(|| malformed(what, ast))
}

fn list<'a>(ast: &'a Ast, index: usize, what: &str) -> Result<&'a [Ast]> {
    ast.list_arg(index).ok_or_else(|| malformed(what, ast))
}

fn ambiguous(ast: &Ast) -> Error {
    Error::AmbiguousDeclaration { span: ast.span() }
}

fn malformed(what: &str, ast: &Ast) -> Error {
    Error::implementation(format!(
        "malformed {what}: {}.{}",
        ast.sort(),
        ast.constructor()
    ))
}
