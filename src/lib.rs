#![doc(test(attr(deny(warnings))))]

//! Bookkeeping engine for a small bakery: sales, expenses and a monthly
//! profit goal kept in a single JSON document, with month aggregation,
//! backup import/export and a printable report.

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod report;
pub mod storage;
pub mod utils;

pub use crate::core::{Bookkeeper, WriteStatus};
pub use crate::domain::{FinancialDocument, MonthKey};
pub use crate::storage::{DocumentStore, JsonFileStore, LoadStatus, MemoryStore};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(
            version = build.version,
            git_hash = build.git_hash,
            profile = build.profile,
            "doce_gestao initialized"
        );
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
