//! Tracing infrastructure for debugging forest conversion.
//!
//! The converter is generic over a [`Tracer`]. With [`NoopTracer`] every hook
//! is an `#[inline(always)]` empty function and compiles away. [`PrintTracer`]
//! collects one line per event for inspection in tests and debugging sessions.

use std::fmt::Write;

use grove_core::NodeId;

/// Memoization table a cache hit was served from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheKind {
    Ambiguity,
    Sort,
    Lexical,
    Lift,
}

impl CacheKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Ambiguity => "amb",
            Self::Sort => "sort",
            Self::Lexical => "lex",
            Self::Lift => "lift",
        }
    }
}

/// Hooks called by the converter at decision points.
pub trait Tracer {
    /// Called before building a value for a forest node.
    fn trace_enter(&mut self, node: NodeId, sort: &str);

    /// Called when a memoized result is reused.
    fn trace_cache_hit(&mut self, node: NodeId, cache: CacheKind);

    /// Called when a derivation is filtered out.
    fn trace_filtered(&mut self, node: NodeId);

    /// Called after an ambiguity cluster was ranked.
    fn trace_ambiguity(&mut self, node: NodeId, alternatives: usize, survivors: usize);

    /// Called when lifting an embedded fragment starts.
    fn trace_lift(&mut self, node: NodeId);

    /// Called when an anti-quote hole does not fit its position.
    fn trace_meta_variable_rejected(&mut self, node: NodeId);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_enter(&mut self, _node: NodeId, _sort: &str) {}

    #[inline(always)]
    fn trace_cache_hit(&mut self, _node: NodeId, _cache: CacheKind) {}

    #[inline(always)]
    fn trace_filtered(&mut self, _node: NodeId) {}

    #[inline(always)]
    fn trace_ambiguity(&mut self, _node: NodeId, _alternatives: usize, _survivors: usize) {}

    #[inline(always)]
    fn trace_lift(&mut self, _node: NodeId) {}

    #[inline(always)]
    fn trace_meta_variable_rejected(&mut self, _node: NodeId) {}
}

/// Tracer that collects conversion events as text lines.
#[derive(Default)]
pub struct PrintTracer {
    lines: Vec<String>,
    /// Skip `enter` events.
    quiet: bool,
}

impl PrintTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only record decisions, not every visited node.
    pub fn quiet(mut self, value: bool) -> Self {
        self.quiet = value;
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            writeln!(out, "{line}").expect("String write never fails");
        }
        out
    }
}

impl Tracer for PrintTracer {
    fn trace_enter(&mut self, node: NodeId, sort: &str) {
        if !self.quiet {
            self.lines.push(format!("enter {node} {sort}"));
        }
    }

    fn trace_cache_hit(&mut self, node: NodeId, cache: CacheKind) {
        self.lines.push(format!("hit   {node} {}", cache.as_str()));
    }

    fn trace_filtered(&mut self, node: NodeId) {
        self.lines.push(format!("drop  {node}"));
    }

    fn trace_ambiguity(&mut self, node: NodeId, alternatives: usize, survivors: usize) {
        self.lines
            .push(format!("amb   {node} {alternatives} -> {survivors}"));
    }

    fn trace_lift(&mut self, node: NodeId) {
        self.lines.push(format!("lift  {node}"));
    }

    fn trace_meta_variable_rejected(&mut self, node: NodeId) {
        self.lines.push(format!("hole  {node} rejected"));
    }
}
