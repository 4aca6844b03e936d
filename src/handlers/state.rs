use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;

use crate::forms::{
    CheckoutDraft, LoginDraft, MedicineDraft, ProfileDraft, RegisterDraft, ReviewDraft,
    ShippingDetails,
};

/// Which wizard, if any, the next text message of a chat belongs to.
#[derive(Clone, Debug, Default)]
pub enum State {
    #[default]
    Idle,
    Login(LoginDraft),
    Register(RegisterDraft),
    EditProfile(ProfileDraft),
    Checkout(CheckoutDraft),
    /// Shipping details collected, waiting for the confirm button.
    ConfirmOrder(ShippingDetails),
    Review(ReviewDraft),
    MedicineEditor(MedicineDraft),
    /// `editing` holds the id of the category being renamed.
    CategoryEditor { editing: Option<String> },
}

pub type MyDialogue = Dialogue<State, InMemStorage<State>>;
