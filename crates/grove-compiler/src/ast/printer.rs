//! Text dump of AST nodes for snapshots and debugging.

use std::fmt::Write;

use super::{Arg, Ast, Body, Concrete};

pub struct AstPrinter<'a> {
    root: &'a Ast,
    spans: bool,
    stats: bool,
}

impl<'a> AstPrinter<'a> {
    pub fn new(root: &'a Ast) -> Self {
        Self {
            root,
            spans: false,
            stats: false,
        }
    }

    pub fn with_spans(mut self, value: bool) -> Self {
        self.spans = value;
        self
    }

    pub fn with_stats(mut self, value: bool) -> Self {
        self.stats = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        self.format_node(self.root, 0, w)
    }

    fn format_node(&self, node: &Ast, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        let prefix = "  ".repeat(indent);
        write!(w, "{prefix}{}.{}", node.sort(), node.constructor())?;

        match node.body() {
            Body::Lexical(text) => write!(w, " {text:?}")?,
            Body::Concrete(Concrete::Lexical { text, .. } | Concrete::Literal { text, .. }) => {
                write!(w, " {text:?}")?
            }
            Body::Concrete(Concrete::Char(code)) => {
                write!(w, " {:?}", char::from_u32(*code).unwrap_or('\u{FFFD}'))?
            }
            _ => {}
        }
        if self.spans
            && let Some(span) = node.span()
        {
            write!(w, " @{span}")?;
        }
        if self.stats {
            write!(w, " [{}]", node.stats())?;
        }
        writeln!(w)?;

        match node.body() {
            Body::Cons(args) => {
                for arg in args {
                    self.format_arg(arg, indent + 1, w)?;
                }
            }
            Body::Ambiguity(alts) => {
                for alt in alts {
                    self.format_node(alt, indent + 1, w)?;
                }
            }
            Body::Concrete(concrete) => {
                for child in concrete.children() {
                    self.format_node(child, indent + 1, w)?;
                }
            }
            Body::Lexical(_) => {}
        }
        Ok(())
    }

    fn format_arg(&self, arg: &Arg, indent: usize, w: &mut impl Write) -> std::fmt::Result {
        let prefix = "  ".repeat(indent);
        match arg {
            Arg::Node(node) => self.format_node(node, indent, w),
            Arg::Text(text) => writeln!(w, "{prefix}{text:?}"),
            Arg::List(items) if items.is_empty() => writeln!(w, "{prefix}[]"),
            Arg::List(items) => {
                writeln!(w, "{prefix}[")?;
                for item in items {
                    self.format_node(item, indent + 1, w)?;
                }
                writeln!(w, "{prefix}]")
            }
        }
    }
}
