use chrono::NaiveDate;
use serde::Deserialize;
use validator::ValidationError;

use crate::models::customer::NewCustomer;
use crate::utils::birth_date_format;
use crate::validators;

/// Body of `POST /create` and `POST /edit/:id`.
///
/// Missing text fields deserialize as empty so they fail validation with
/// their own message instead of a parse error.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct RequestCustomer {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(with = "birth_date_format")]
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

impl RequestCustomer {
    /// Runs every field rule in order and stops at the first failure.
    pub fn validate(&self, today: NaiveDate) -> Result<NewCustomer, ValidationError> {
        validators::validate_first_name(&self.first_name)?;
        validators::validate_last_name(&self.last_name)?;
        validators::validate_age(self.birth_date, today)?;
        let gender = validators::validate_gender(&self.gender)?;
        validators::validate_email(&self.email)?;
        validators::validate_address(&self.address)?;

        let address = self.address.trim();

        Ok(NewCustomer {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            birth_date: self.birth_date,
            gender,
            email: self.email.trim().to_string(),
            address: if address.is_empty() {
                None
            } else {
                Some(address.to_string())
            },
        })
    }
}

/// Query string of the list page.
#[derive(Deserialize, Debug, Default)]
pub struct RequestListCustomers {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub desc: Option<String>,
}

impl RequestListCustomers {
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|search| !search.is_empty())
    }

    pub fn sort_column(&self) -> Option<&str> {
        self.sort.as_deref().filter(|sort| !sort.is_empty())
    }

    pub fn descending(&self) -> bool {
        self.desc.as_deref() == Some("true")
    }
}
