use super::{is_keep, Progress};
use crate::models::User;
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum CheckoutStep {
    #[default]
    Name,
    Address,
    Phone,
}

/// Collects shipping details. Values from the customer's profile are offered
/// as defaults and taken with `-`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutDraft {
    step: CheckoutStep,
    defaults: Defaults,
    name: String,
    address: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Defaults {
    name: Option<String>,
    address: Option<String>,
    phone: Option<String>,
}

impl CheckoutDraft {
    pub fn for_user(user: &User) -> Self {
        Self {
            defaults: Defaults {
                name: Some(user.name.clone()).filter(|name| !name.trim().is_empty()),
                address: user.address.clone().filter(|a| !a.trim().is_empty()),
                phone: user.phone.clone().filter(|p| !p.trim().is_empty()),
            },
            ..Self::default()
        }
    }

    pub fn prompt(&self) -> String {
        match self.step {
            CheckoutStep::Name => with_default("Recipient name", &self.defaults.name),
            CheckoutStep::Address => with_default("Delivery address", &self.defaults.address),
            CheckoutStep::Phone => with_default("Contact phone", &self.defaults.phone),
        }
    }

    pub fn accept(&self, input: &str) -> Result<Progress<Self, ShippingDetails>, ValidationError> {
        let mut draft = self.clone();
        match self.step {
            CheckoutStep::Name => {
                draft.name = pick("Name", input, &self.defaults.name)?;
                draft.step = CheckoutStep::Address;
            }
            CheckoutStep::Address => {
                draft.address = pick("Address", input, &self.defaults.address)?;
                draft.step = CheckoutStep::Phone;
            }
            CheckoutStep::Phone => {
                let phone = match (&self.defaults.phone, is_keep(input)) {
                    (Some(phone), true) => validation::phone(phone)?,
                    _ => validation::phone(input)?,
                };
                return Ok(Progress::Done(ShippingDetails {
                    name: draft.name,
                    address: draft.address,
                    phone,
                }));
            }
        }
        let prompt = draft.prompt();
        Ok(Progress::next(draft, prompt))
    }
}

fn pick(field: &'static str, input: &str, default: &Option<String>) -> Result<String, ValidationError> {
    match default {
        Some(value) if is_keep(input) => Ok(value.clone()),
        _ if is_keep(input) => Err(ValidationError::Required(field)),
        _ => validation::required(field, input),
    }
}

fn with_default(label: &str, default: &Option<String>) -> String {
    match default {
        Some(value) => format!("{} (send - to use \"{}\"):", label, value),
        None => format!("{}:", label),
    }
}
