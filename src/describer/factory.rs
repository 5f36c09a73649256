//! Pluggable describer construction.
//!
//! Pages never construct their sub-describers directly. They ask the factory
//! they were evaluated with, so evaluating a page through a [`crate::store::CacheStore`]
//! caches every nested finding as well.

use super::{Describer, DescriberKind, Subject};
use crate::dataset::Dataset;
use crate::error::Result;
use std::sync::Arc;

pub trait DescriberFactory {
    /// Return a describer for `(kind, dataset, subject)`, computing it if needed.
    fn get_or_create(
        &self,
        kind: DescriberKind,
        dataset: &Arc<Dataset>,
        subject: Subject,
    ) -> Result<Describer>;
}

/// Always constructs a fresh describer. Evaluation happens on first access.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainFactory;

impl DescriberFactory for PlainFactory {
    fn get_or_create(
        &self,
        kind: DescriberKind,
        dataset: &Arc<Dataset>,
        subject: Subject,
    ) -> Result<Describer> {
        Describer::new(kind, Arc::clone(dataset), subject)
    }
}
