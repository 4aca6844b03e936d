use super::{is_keep, Progress};
use crate::models::{LoginRequest, ProfileUpdate, RegisterRequest, Role};
use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginDraft {
    email: Option<String>,
}

impl LoginDraft {
    pub const PROMPT: &'static str = "Enter your email:";

    pub fn accept(&self, input: &str) -> Result<Progress<Self, LoginRequest>, ValidationError> {
        match &self.email {
            None => {
                let email = validation::email(input)?;
                Ok(Progress::next(
                    LoginDraft { email: Some(email) },
                    "Enter your password:",
                ))
            }
            Some(email) => {
                if input.trim().is_empty() {
                    return Err(ValidationError::Required("Password"));
                }
                Ok(Progress::Done(LoginRequest {
                    email: email.clone(),
                    password: input.to_string(),
                }))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RegisterStep {
    #[default]
    Name,
    Email,
    Password,
    Confirm,
    Role,
    Phone,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterDraft {
    step: RegisterStep,
    name: String,
    email: String,
    password: String,
    role: Role,
}

impl RegisterDraft {
    pub const PROMPT: &'static str = "Let's create your account. What is your full name?";

    pub fn accept(&self, input: &str) -> Result<Progress<Self, RegisterRequest>, ValidationError> {
        let mut draft = self.clone();
        let prompt = match self.step {
            RegisterStep::Name => {
                draft.name = validation::required("Name", input)?;
                draft.step = RegisterStep::Email;
                "Enter your email:"
            }
            RegisterStep::Email => {
                draft.email = validation::email(input)?;
                draft.step = RegisterStep::Password;
                "Choose a password (at least 6 characters):"
            }
            RegisterStep::Password => {
                draft.password = validation::password(input)?;
                draft.step = RegisterStep::Confirm;
                "Repeat the password:"
            }
            RegisterStep::Confirm => {
                validation::password_confirmation(&self.password, input)?;
                draft.step = RegisterStep::Role;
                "Are you signing up as a customer or a seller?"
            }
            RegisterStep::Role => {
                draft.role = match input.parse::<Role>() {
                    Ok(role @ (Role::Customer | Role::Seller)) => role,
                    _ => return Err(ValidationError::Choice("Please answer customer or seller.")),
                };
                draft.step = RegisterStep::Phone;
                "Enter your phone number, or - to skip:"
            }
            RegisterStep::Phone => {
                let phone = if is_keep(input) {
                    None
                } else {
                    Some(validation::phone(input)?)
                };
                return Ok(Progress::Done(RegisterRequest {
                    name: draft.name,
                    email: draft.email,
                    password: draft.password,
                    role: draft.role,
                    phone,
                }));
            }
        };
        Ok(Progress::next(draft, prompt))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ProfileStep {
    #[default]
    Name,
    Phone,
    Address,
}

/// Profile editing; `-` keeps a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    step: ProfileStep,
    update: ProfileUpdate,
}

impl ProfileDraft {
    pub const PROMPT: &'static str = "New name (or - to keep the current one):";

    pub fn accept(&self, input: &str) -> Result<Progress<Self, ProfileUpdate>, ValidationError> {
        let mut draft = self.clone();
        let keep = is_keep(input);
        match self.step {
            ProfileStep::Name => {
                if !keep {
                    draft.update.name = Some(validation::required("Name", input)?);
                }
                draft.step = ProfileStep::Phone;
                Ok(Progress::next(draft, "New phone number (or -):"))
            }
            ProfileStep::Phone => {
                if !keep {
                    draft.update.phone = Some(validation::phone(input)?);
                }
                draft.step = ProfileStep::Address;
                Ok(Progress::next(draft, "New delivery address (or -):"))
            }
            ProfileStep::Address => {
                if !keep {
                    draft.update.address = Some(validation::required("Address", input)?);
                }
                Ok(Progress::Done(draft.update))
            }
        }
    }
}
