//! Cascading filter core for the organism catalog
//!
//! Four request-scoped pieces, assembled per request and discarded after the
//! response:
//!
//! - [`selection`]: the filter dimensions and the current (partial) selection
//! - [`codec`]: tolerant query-string encode/decode for deep-linking
//! - [`options`]: valid, non-empty option sets with counts per dimension
//! - [`page`]: clamped pagination over an ordered result set
//! - [`resolver`]: orchestrates a selection change into a consistent new
//!   selection, recomputed option sets and the first result page
//!
//! Nothing in here touches the database: the resolver operates on a snapshot
//! of organism records fetched by the caller, which keeps every response
//! self-describing and the whole module synchronous and unit-testable.

pub mod codec;
pub mod options;
pub mod page;
pub mod resolver;
pub mod selection;

pub use codec::{decode, decode_param, encode};
pub use options::{build_options, FilterOption, OptionSet};
pub use page::{clamp_page, offset, slice, total_pages, ResultPage};
pub use resolver::{CascadeResolver, FilterOutcome};
pub use selection::{Dimension, FilterSelection};
