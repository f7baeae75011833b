use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ClinicError, ClinicResult};

use super::{MAX_TEXT_LEN, require_max_len};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        }
    }

    /// Reads free-form input such as "male" or "F" by its first letter.
    /// Blank input means `Other`.
    pub fn from_loose(input: &str) -> ClinicResult<Self> {
        match input.trim().chars().next() {
            None => Ok(Gender::Other),
            Some(c) => c.to_ascii_uppercase().to_string().parse(),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Gender {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            "O" => Ok(Gender::Other),
            other => Err(ClinicError::Validation(format!(
                "Invalid gender '{}', expected one of M, F, O",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub first_name: String,
    pub age: i32,
    pub gender: Gender,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub prescription_file: Option<String>,
    pub prescription_filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    #[serde(default)]
    pub user_id: Option<String>,
    pub first_name: String,
    pub age: i32,
    pub gender: Gender,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub prescription_file: Option<String>,
    #[serde(default)]
    pub prescription_filename: Option<String>,
}

impl NewPatient {
    pub fn validate(&self) -> ClinicResult<()> {
        validate_name(&self.first_name)?;
        validate_age(self.age)?;
        if let Some(user_id) = &self.user_id {
            require_max_len("user_id", user_id, MAX_NAME_LEN)?;
        }
        if let Some(phone) = &self.phone_number {
            validate_phone(phone)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientUpdate {
    pub first_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl PatientUpdate {
    pub fn validate(&self) -> ClinicResult<()> {
        if let Some(name) = &self.first_name {
            validate_name(name)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        if let Some(phone) = &self.phone_number {
            validate_phone(phone)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    pub fn apply(self, patient: &mut Patient) {
        if let Some(first_name) = self.first_name {
            patient.first_name = first_name;
        }
        if let Some(age) = self.age {
            patient.age = age;
        }
        if let Some(gender) = self.gender {
            patient.gender = gender;
        }
        if self.phone_number.is_some() {
            patient.phone_number = self.phone_number;
        }
        if self.email.is_some() {
            patient.email = self.email;
        }
    }
}

fn validate_name(name: &str) -> ClinicResult<()> {
    if name.trim().is_empty() {
        return Err(ClinicError::Validation("first_name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ClinicError::Validation(format!(
            "first_name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

fn validate_age(age: i32) -> ClinicResult<()> {
    if age < 0 {
        return Err(ClinicError::Validation("age must not be negative".to_string()));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> ClinicResult<()> {
    if phone.chars().count() > MAX_PHONE_LEN {
        return Err(ClinicError::Validation(format!(
            "phone_number must be at most {} characters",
            MAX_PHONE_LEN
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> ClinicResult<()> {
    if !email.contains('@') {
        return Err(ClinicError::Validation(format!("Invalid email '{}'", email)));
    }
    require_max_len("email", email, MAX_TEXT_LEN)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_patients: i64,
    pub total_consultations: i64,
    pub total_tests: i64,
    pub recent_patients: Vec<Patient>,
}
