//! # dfx - Describe tabular datasets
//!
//! dfx explores a dataset by running a library of small statistical
//! *describers* over it (shape, column types, nulls, uniqueness, ANOVA,
//! correlation, cardinality) and caching their verdicts, so that viewing the
//! same data twice is served from disk instead of recomputed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dfx::dataset::{Column, Dataset};
//! use dfx::describer::{DescriberFactory as _, DescriberKind, Subject};
//! use dfx::render::PrefixUrlBuilder;
//! use dfx::store::CacheStore;
//! use std::sync::Arc;
//!
//! # fn example() -> dfx::error::Result<()> {
//! let df = Arc::new(Dataset::new(vec![
//!     Column::new("region", ["west", "west", "east", "east"]),
//!     Column::new("state", ["CA", "WA", "NC", "NY"]),
//! ])?);
//!
//! let store = CacheStore::open("./dfx-cache");
//! let rel = store.get_or_create(
//!     DescriberKind::RelationshipOneToMany,
//!     &df,
//!     Subject::relationship("region", "state"),
//! )?;
//! assert!(rel.qualified());
//! println!("{}", rel.render(&PrefixUrlBuilder::new("/data/regions")));
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`dataset`]: columns, values, content hashing, polars conversion
//! - [`describer`]: the describer engine, its variants and the suppression resolver
//! - [`store`]: persistent cache with dataset deduplication
//! - [`render`]: rich output blocks and Markdown rendering
//! - [`error`]: error types and handling utilities
//! - [`config`] / [`logging`]: settings file and tracing setup for the binary
//!
//! ## Key Concepts
//!
//! ### Verdicts
//!
//! Every describer ends up in one of three states. *Invalid* means the test
//! could not be run (wrong column type, degenerate data). *Unqualified* means
//! it ran and the property does not hold. *Qualified* means it holds.
//!
//! ### Factories
//!
//! Describers are obtained through a [`describer::DescriberFactory`]. The
//! [`describer::PlainFactory`] always computes; [`store::CacheStore`] serves
//! stored results and saves new ones. Pages pass their factory down to every
//! describer they aggregate.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod dataset;
pub mod describer;
pub mod error;
pub mod logging;
pub mod render;
pub mod store;
pub mod utils;
