//! Field rules for customer records.
//!
//! Each rule returns a `ValidationError` whose code is the field name and whose
//! message is the text shown to API clients.

use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::models::customer::Gender;

pub const NAME_MAX_LENGTH: usize = 100;
pub const EMAIL_MAX_LENGTH: usize = 100;
pub const ADDRESS_MAX_LENGTH: usize = 200;
pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 60;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern compiles")
});

fn violation(field: &'static str, message: &'static str) -> ValidationError {
    ValidationError {
        code: Cow::from(field),
        message: Some(Cow::from(message)),
        params: Default::default(),
    }
}

fn exceeds(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

pub fn validate_first_name(first_name: &str) -> Result<(), ValidationError> {
    let first_name = first_name.trim();

    if first_name.is_empty() {
        return Err(violation("first_name", "first name is required"));
    }

    if exceeds(first_name, NAME_MAX_LENGTH) {
        return Err(violation("first_name", "first name length exceeds the limit"));
    }

    Ok(())
}

pub fn validate_last_name(last_name: &str) -> Result<(), ValidationError> {
    let last_name = last_name.trim();

    if last_name.is_empty() {
        return Err(violation("last_name", "last name is required"));
    }

    if exceeds(last_name, NAME_MAX_LENGTH) {
        return Err(violation("last_name", "last name length exceeds the limit"));
    }

    Ok(())
}

/// Completed years between `birth_date` and `today`.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();

    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }

    age
}

pub fn validate_age(birth_date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    let age = age_on(birth_date, today);

    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(violation("birth_date", "age should be between 18 and 60"));
    }

    Ok(())
}

pub fn validate_gender(gender: &str) -> Result<Gender, ValidationError> {
    gender
        .parse::<Gender>()
        .map_err(|_| violation("gender", "invalid gender"))
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(violation("email", "email is required"));
    }

    if exceeds(email, EMAIL_MAX_LENGTH) {
        return Err(violation("email", "email length exceeds the limit"));
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err(violation("email", "invalid email address"));
    }

    Ok(())
}

pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    if exceeds(address.trim(), ADDRESS_MAX_LENGTH) {
        return Err(violation("address", "address length exceeds the limit"));
    }

    Ok(())
}
