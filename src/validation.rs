use thiserror::Error;

pub const PHONE_DIGITS: usize = 11;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Required(&'static str),
    #[error("Please enter a valid email address.")]
    Email,
    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Phone number must contain exactly 11 digits.")]
    PhoneDigits,
    #[error("Price must be a positive number.")]
    Price,
    #[error("Stock must be a whole number of units.")]
    Stock,
    #[error("Quantity must be a positive whole number.")]
    Quantity,
    #[error("Rating must be a number from 1 to 5.")]
    Rating,
    #[error("{0}")]
    Choice(&'static str),
}

pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(value.to_string())
}

pub fn email(value: &str) -> Result<String, ValidationError> {
    let value = required("Email", value)?;
    match value.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !value.contains(char::is_whitespace) =>
        {
            Ok(value.to_lowercase())
        }
        _ => Err(ValidationError::Email),
    }
}

pub fn password(value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required("Password"));
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(value.to_string())
}

pub fn password_confirmation(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Accepts digits plus the usual separators and returns the number unchanged
/// apart from surrounding whitespace.
pub fn phone(value: &str) -> Result<String, ValidationError> {
    let value = required("Phone", value)?;
    let mut digits = 0;
    for c in value.chars() {
        match c {
            '0'..='9' => digits += 1,
            '+' | '-' | ' ' | '(' | ')' => {}
            _ => return Err(ValidationError::PhoneDigits),
        }
    }
    if digits != PHONE_DIGITS {
        return Err(ValidationError::PhoneDigits);
    }
    Ok(value)
}

pub fn price(value: &str) -> Result<f64, ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price > 0.0 => Ok(price),
        _ => Err(ValidationError::Price),
    }
}

pub fn stock(value: &str) -> Result<u32, ValidationError> {
    value.trim().parse::<u32>().map_err(|_| ValidationError::Stock)
}

pub fn quantity(value: &str) -> Result<u32, ValidationError> {
    match value.trim().parse::<u32>() {
        Ok(qty) if qty > 0 => Ok(qty),
        _ => Err(ValidationError::Quantity),
    }
}

pub fn rating(value: &str) -> Result<u8, ValidationError> {
    match value.trim().parse::<u8>() {
        Ok(rating @ 1..=5) => Ok(rating),
        _ => Err(ValidationError::Rating),
    }
}
