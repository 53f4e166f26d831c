use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::CustomerError;
use crate::utils::birth_date_format;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    #[serde(rename = "ID")]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(serialize_with = "birth_date_format::serialize")]
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub email: String,
    pub address: String,
}

/// A validated customer ready to be written. Text fields are trimmed and an
/// empty address is `None`, which leaves the stored address untouched on
/// update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub email: String,
    pub address: Option<String>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(format!("unknown gender {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    FirstName,
    LastName,
    BirthDate,
    Gender,
    Email,
    Address,
}

impl SortColumn {
    pub fn column_name(&self) -> &'static str {
        match self {
            SortColumn::FirstName => "first_name",
            SortColumn::LastName => "last_name",
            SortColumn::BirthDate => "birth_date",
            SortColumn::Gender => "gender",
            SortColumn::Email => "email",
            SortColumn::Address => "address",
        }
    }
}

impl FromStr for SortColumn {
    type Err = CustomerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FirstName" => Ok(SortColumn::FirstName),
            "LastName" => Ok(SortColumn::LastName),
            "BirthDate" => Ok(SortColumn::BirthDate),
            "Gender" => Ok(SortColumn::Gender),
            "Email" => Ok(SortColumn::Email),
            "Address" => Ok(SortColumn::Address),
            other => Err(CustomerError::InvalidSortColumn(other.to_string())),
        }
    }
}
