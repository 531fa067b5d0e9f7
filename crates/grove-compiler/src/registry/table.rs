//! AST definitions of the target language.
//!
//! Every sort implicitly accepts `Ambiguity([alternatives])`; lexical sorts
//! also accept `Lexical(text)`.

use crate::ast::ArgKind::{self, List as L, Node as N};

/// Constructor with its argument shape.
#[derive(Debug)]
pub struct ConsDef {
    pub name: &'static str,
    pub args: &'static [ArgKind],
}

#[derive(Debug)]
pub struct SortDef {
    pub name: &'static str,
    pub lexical: bool,
    pub constructors: &'static [ConsDef],
}

macro_rules! cons {
    ($name:literal, $args:expr $(,)?) => {
        ConsDef {
            name: $name,
            args: $args,
        }
    };
}

macro_rules! sort {
    ($name:literal, $constructors:expr $(,)?) => {
        SortDef {
            name: $name,
            lexical: false,
            constructors: $constructors,
        }
    };
}

macro_rules! lexical {
    ($name:literal) => {
        SortDef {
            name: $name,
            lexical: true,
            constructors: &[],
        }
    };
}

pub static SORTS: &[SortDef] = &[
    // Modules
    sort!("Module", &[cons!("Default", &[N, N])]),
    sort!(
        "Header",
        &[
            cons!("Default", &[N, N, L]),
            cons!("Parameters", &[N, N, N, L]),
        ],
    ),
    sort!("ModuleParameters", &[cons!("Default", &[L])]),
    sort!("Import", &[cons!("Default", &[N]), cons!("Extend", &[N])]),
    sort!("ImportedModule", &[cons!("Default", &[N])]),
    sort!("Body", &[cons!("Toplevels", &[L])]),
    sort!("Tags", &[cons!("Default", &[L])]),
    sort!("Tag", &[cons!("Default", &[N, N]), cons!("Empty", &[N])]),
    sort!("Toplevel", &[cons!("GivenVisibility", &[N])]),
    sort!(
        "Visibility",
        &[cons!("Public", &[]), cons!("Private", &[]), cons!("Default", &[])],
    ),
    // Declarations
    sort!(
        "Declaration",
        &[
            cons!("Data", &[N, N, N, N, L]),
            cons!("DataAbstract", &[N, N, N, N]),
            cons!("Alias", &[N, N, N, N]),
            cons!("Variable", &[N, N, N, L]),
        ],
    ),
    sort!(
        "CommonKeywordParameters",
        &[cons!("Present", &[L]), cons!("Absent", &[])],
    ),
    sort!("KeywordFormals", &[cons!("Default", &[L]), cons!("None", &[])]),
    sort!("KeywordFormal", &[cons!("Default", &[N, N, N])]),
    sort!("Variant", &[cons!("NAryConstructor", &[N, L, N])]),
    sort!("Variable", &[cons!("Initialized", &[N, N]), cons!("UnInitialized", &[N])]),
    // Types
    sort!("TypeArg", &[cons!("Default", &[N]), cons!("Named", &[N, N])]),
    sort!("UserType", &[cons!("Name", &[N]), cons!("Parametric", &[N, L])]),
    sort!(
        "Type",
        &[
            cons!("Basic", &[N]),
            cons!("User", &[N]),
            cons!("Variable", &[N]),
            cons!("Structured", &[N]),
            cons!("Symbol", &[N]),
            cons!("Bracket", &[N]),
        ],
    ),
    sort!(
        "BasicType",
        &[
            cons!("Value", &[]),
            cons!("Void", &[]),
            cons!("Bool", &[]),
            cons!("Int", &[]),
            cons!("Real", &[]),
            cons!("Rational", &[]),
            cons!("Num", &[]),
            cons!("String", &[]),
            cons!("Loc", &[]),
            cons!("DateTime", &[]),
            cons!("Node", &[]),
            cons!("List", &[]),
            cons!("Set", &[]),
            cons!("Bag", &[]),
            cons!("Map", &[]),
            cons!("Tuple", &[]),
            cons!("Relation", &[]),
            cons!("ListRelation", &[]),
            cons!("Type", &[]),
        ],
    ),
    sort!("StructuredType", &[cons!("Default", &[N, L])]),
    sort!("TypeVar", &[cons!("Free", &[N]), cons!("Bounded", &[N, N])]),
    sort!(
        "Sym",
        &[
            cons!("Nonterminal", &[N]),
            cons!("Parametrized", &[N, L]),
            cons!("Iter", &[N]),
            cons!("IterStar", &[N]),
            cons!("IterSep", &[N, N]),
            cons!("IterStarSep", &[N, N]),
            cons!("Optional", &[N]),
            cons!("Labeled", &[N, N]),
            cons!("Literal", &[N]),
            cons!("CaseInsensitiveLiteral", &[N]),
            cons!("Empty", &[]),
        ],
    ),
    // Expressions
    sort!(
        "Expression",
        &[
            cons!("Call", &[N, L]),
            cons!("CallWithKeywords", &[N, L, L]),
            cons!("QualifiedName", &[N]),
            cons!("Literal", &[N]),
            cons!("List", &[L]),
            cons!("Set", &[L]),
            cons!("Tuple", &[L]),
            cons!("Map", &[L]),
            cons!("Bracket", &[N]),
            cons!("Addition", &[N, N]),
            cons!("Subtraction", &[N, N]),
            cons!("Product", &[N, N]),
            cons!("Division", &[N, N]),
            cons!("Equals", &[N, N]),
            cons!("NonEquals", &[N, N]),
            cons!("LessThan", &[N, N]),
            cons!("GreaterThan", &[N, N]),
            cons!("And", &[N, N]),
            cons!("Or", &[N, N]),
            cons!("Negation", &[N]),
            cons!("Negative", &[N]),
            cons!("IfThenElse", &[N, N, N]),
            cons!("FieldAccess", &[N, N]),
            cons!("Subscript", &[N, L]),
            cons!("Match", &[N, N]),
            cons!("IsDefined", &[N]),
            cons!("It", &[]),
            cons!("TypedVariable", &[N, N]),
            cons!("MultiVariable", &[N]),
            cons!("Guarded", &[N, N]),
            cons!("VariableBecomes", &[N, N]),
            cons!("TypedVariableBecomes", &[N, N, N]),
            cons!("Descendant", &[N]),
            cons!("Anti", &[N]),
            cons!("Closure", &[N, L, L]),
        ],
    ),
    sort!("Mapping_Expression", &[cons!("Default", &[N, N])]),
    sort!(
        "Literal",
        &[
            cons!("Integer", &[N]),
            cons!("Boolean", &[N]),
            cons!("String", &[N]),
            cons!("Real", &[N]),
        ],
    ),
    sort!("QualifiedName", &[cons!("Default", &[L])]),
    // Statements
    sort!(
        "Statement",
        &[
            cons!("Expression", &[N]),
            cons!("Assignment", &[N, N, N]),
            cons!("Return", &[N]),
            cons!("Throw", &[N]),
            cons!("Block", &[N, L]),
            cons!("IfThen", &[N, L, N]),
            cons!("IfThenElse", &[N, L, N, N]),
            cons!("While", &[N, L, N]),
            cons!("For", &[N, L, N]),
            cons!("Insert", &[N, N]),
            cons!("Append", &[N, N]),
            cons!("Fail", &[N]),
            cons!("Break", &[N]),
            cons!("Continue", &[N]),
            cons!("EmptyStatement", &[]),
            cons!("VariableDeclaration", &[N]),
        ],
    ),
    sort!("Label", &[cons!("Default", &[N]), cons!("Empty", &[])]),
    sort!("Target", &[cons!("Labeled", &[N]), cons!("Empty", &[])]),
    sort!("DataTarget", &[cons!("Labeled", &[N]), cons!("Empty", &[])]),
    sort!("Assignable", &[cons!("Variable", &[N]), cons!("Subscript", &[N, N])]),
    sort!(
        "Assignment",
        &[
            cons!("Default", &[]),
            cons!("Addition", &[]),
            cons!("Subtraction", &[]),
            cons!("IfDefined", &[]),
        ],
    ),
    sort!("LocalVariableDeclaration", &[cons!("Default", &[N])]),
    sort!(
        "Command",
        &[
            cons!("Expression", &[N]),
            cons!("Statement", &[N]),
            cons!("Declaration", &[N]),
            cons!("Import", &[N]),
        ],
    ),
    // Tokens
    lexical!("Name"),
    lexical!("IntLit"),
    lexical!("IntegerLiteral"),
    lexical!("BooleanLiteral"),
    lexical!("RealLiteral"),
    lexical!("StringConstant"),
    lexical!("StringLiteral"),
    lexical!("CaseInsensitiveStringConstant"),
    lexical!("Nonterminal"),
    lexical!("NonterminalLabel"),
    lexical!("TagString"),
];
