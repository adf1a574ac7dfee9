//! Prelude module - common imports for docx-fields users
//!
//! ```rust
//! use docx_fields::prelude::*;
//! ```

pub use crate::{
    BackupPolicy,
    // Error types
    Error,
    // Main types
    FieldRefresher,
    FieldUpdater,
    Platform,
    RefreshConfig,
    RefreshOutcome,
    Result,
    StrategyKind,
    TargetDocument,
};
