//! Derivation cost.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Cost vector attached to every AST node, used to rank sibling derivations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Stats {
    /// Built from an unresolved ambiguity.
    pub ambiguous: bool,
    /// Structurally transparent wrappers inside lifted fragments.
    pub injections: u32,
    /// Anti-quote holes.
    pub nested_meta_variables: u32,
    /// Lifted concrete fragments.
    pub concrete_fragment_count: u32,
    /// Characters covered by lifted concrete fragments.
    pub concrete_fragment_size: u32,
}

impl Stats {
    pub const ZERO: Stats = Stats {
        ambiguous: false,
        injections: 0,
        nested_meta_variables: 0,
        concrete_fragment_count: 0,
        concrete_fragment_size: 0,
    };

    /// Rank two derivations of the same ambiguity cluster. `Less` is preferred.
    ///
    /// Lexicographic over `(injections, concrete_fragment_size,
    /// concrete_fragment_count, nested_meta_variables)`. `Equal` means the two
    /// are equally good, not identical: `ambiguous` does not take part.
    pub fn rank(&self, other: &Stats) -> Ordering {
        self.key().cmp(&other.key())
    }

    fn key(&self) -> (u32, u32, u32, u32) {
        (
            self.injections,
            self.concrete_fragment_size,
            self.concrete_fragment_count,
            self.nested_meta_variables,
        )
    }

    pub fn with_ambiguous(mut self, value: bool) -> Self {
        self.ambiguous = value;
        self
    }
}

impl Add for Stats {
    type Output = Stats;

    fn add(self, rhs: Stats) -> Stats {
        Stats {
            ambiguous: self.ambiguous || rhs.ambiguous,
            injections: self.injections + rhs.injections,
            nested_meta_variables: self.nested_meta_variables + rhs.nested_meta_variables,
            concrete_fragment_count: self.concrete_fragment_count + rhs.concrete_fragment_count,
            concrete_fragment_size: self.concrete_fragment_size + rhs.concrete_fragment_size,
        }
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Stats) {
        *self = *self + rhs;
    }
}

impl Sum for Stats {
    fn sum<I: Iterator<Item = Stats>>(iter: I) -> Stats {
        iter.fold(Stats::ZERO, Add::add)
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ambiguous {
            parts.push("ambiguous".to_owned());
        }
        for (name, value) in [
            ("inj", self.injections),
            ("holes", self.nested_meta_variables),
            ("fragments", self.concrete_fragment_count),
            ("size", self.concrete_fragment_size),
        ] {
            if value > 0 {
                parts.push(format!("{name}={value}"));
            }
        }
        if parts.is_empty() {
            return f.write_str("-");
        }
        f.write_str(&parts.join(" "))
    }
}

/// Running set of best-cost candidates.
///
/// A strictly cheaper candidate replaces the set, an equally cheap one joins
/// it, a more expensive one is dropped. Candidates keep their offer order.
pub(crate) struct Survivors<T> {
    best: Option<Stats>,
    items: Vec<T>,
}

impl<T> Survivors<T> {
    pub(crate) fn new() -> Self {
        Self {
            best: None,
            items: Vec::new(),
        }
    }

    pub(crate) fn offer(&mut self, item: T, stats: Stats) {
        let Some(best) = self.best else {
            self.best = Some(stats);
            self.items.push(item);
            return;
        };
        match stats.rank(&best) {
            Ordering::Less => {
                self.best = Some(stats);
                self.items.clear();
                self.items.push(item);
            }
            Ordering::Equal => self.items.push(item),
            Ordering::Greater => {}
        }
    }

    /// Cost of the current survivors.
    pub(crate) fn best(&self) -> Stats {
        self.best.unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn into_items(self) -> Vec<T> {
        self.items
    }
}
