//! # API Shared
//!
//! Wire types shared by the TPA proxy surfaces.
//!
//! Contains:
//! - The uniform error envelope returned by every proxy route on failure
//! - Health check types and `HealthService`
//! - Page context handed to detail-page renderers
//!
//! Used by `tpa-core` and `api-rest`.

pub mod envelope;
pub mod health;
pub mod page;

pub use envelope::ErrorEnvelope;
pub use health::{HealthRes, HealthService};
pub use page::{PageContext, PageMode};
