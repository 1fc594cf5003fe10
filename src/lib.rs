//! Resolve legacy numeric locale keys (`l0359`) to the human-readable
//! text they stand for.
//!
//! Older Chinese medical web frontends reference every UI string through
//! opaque keys like `R.l0359`, with the actual text buried in loosely
//! structured `zh.js` resource modules. This crate loads those modules
//! through a forgiving extraction cascade, scans source buffers for key
//! usages, and resolves each one against the merged key table.
//!
//! The pieces compose in layers:
//!
//! - [`locale`]: extraction cascade, candidate discovery, and the merged,
//!   cached key map
//! - [`scan`]: line-oriented occurrence matching gated on map membership
//! - [`annotate`]: debounced live-annotation pipeline for editor hosts
//! - [`report`]: terminal rendering of scan results
//! - [`cli`]: the `lokey` command-line tool

pub mod annotate;
pub mod cli;
pub mod config;
pub mod locale;
pub mod report;
pub mod scan;
