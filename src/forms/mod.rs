//! Multi-step forms driven one chat message at a time.
//!
//! Each draft answers an input with the next prompt or the finished form. A
//! validation error leaves the draft untouched so the same question can be
//! asked again.

pub mod account;
pub mod catalog;
pub mod checkout;

pub use account::{LoginDraft, ProfileDraft, RegisterDraft};
pub use catalog::{parse_category, MedicineDraft, MedicineSubmission, ReviewDraft};
pub use checkout::{CheckoutDraft, ShippingDetails};

/// Input meaning "keep the current value" in optional or editing steps.
pub const KEEP: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub enum Progress<D, T> {
    Next { draft: D, prompt: String },
    Done(T),
}

impl<D, T> Progress<D, T> {
    pub(crate) fn next(draft: D, prompt: impl Into<String>) -> Self {
        Progress::Next {
            draft,
            prompt: prompt.into(),
        }
    }
}

pub(crate) fn is_keep(input: &str) -> bool {
    input.trim() == KEEP
}
