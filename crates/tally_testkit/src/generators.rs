//! Property-based test generators using proptest.

use crate::entity::{Doc, CHILD, PARENT};
use proptest::prelude::*;
use tally_core::{EntityKind, Registration, UnitOfWork, UowResult};

/// One registration applied to one doc.
#[derive(Debug, Clone)]
pub struct Step {
    /// Which `register_*` to call.
    pub registration: Registration,
    /// The doc to register.
    pub doc: Doc,
}

impl Step {
    /// Applies this step to `uow`.
    ///
    /// # Errors
    ///
    /// Returns whatever the registration returns.
    pub fn apply<U: UnitOfWork<Doc>>(&self, uow: &mut U) -> UowResult<()> {
        let doc = self.doc.clone();
        match self.registration {
            Registration::New => uow.register_new(doc),
            Registration::Dirty => uow.register_dirty(doc),
            Registration::Removed => uow.register_removed(doc),
            Registration::Clean => uow.register_clean(doc),
        }
    }
}

/// Strategy for any registration.
pub fn registration_strategy() -> impl Strategy<Value = Registration> {
    prop_oneof![
        Just(Registration::New),
        Just(Registration::Dirty),
        Just(Registration::Removed),
        Just(Registration::Clean),
    ]
}

/// Strategy for a [`PARENT`] or [`CHILD`] kind.
pub fn kind_strategy() -> impl Strategy<Value = EntityKind> {
    prop_oneof![Just(PARENT), Just(CHILD)]
}

/// Strategy for docs with IDs in `1..=max_id` and a short body.
///
/// A small `max_id` makes repeated registrations of the same doc likely.
pub fn doc_strategy(max_id: i64) -> impl Strategy<Value = Doc> {
    (kind_strategy(), 1..=max_id, "[a-z]{0,6}")
        .prop_map(|(kind, id, body)| Doc::new(kind, id).with_body(body))
}

/// Strategy for a single step.
pub fn step_strategy(max_id: i64) -> impl Strategy<Value = Step> {
    (registration_strategy(), doc_strategy(max_id))
        .prop_map(|(registration, doc)| Step { registration, doc })
}

/// Strategy for scripts of up to `max_len` steps.
pub fn script_strategy(max_id: i64, max_len: usize) -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step_strategy(max_id), 0..=max_len)
}
