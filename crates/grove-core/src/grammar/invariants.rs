//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::types::{Grammar, ProdId, Production};

impl Grammar {
    pub(super) fn ensure_production(&self, id: ProdId) -> &Production {
        self.get(id).unwrap_or_else(|| {
            panic!(
                "Grammar: production {} not found in `{}` \
                 (forest nodes must reference productions of their own grammar)",
                id.as_u32(),
                self.name
            )
        })
    }
}
