use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ClinicError, ClinicResult};

use super::{MAX_TEXT_LEN, require_amount, require_max_len};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: Uuid,
    pub docname: String,
    pub specialization: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewConsultation {
    pub docname: String,
    #[serde(default)]
    pub specialization: Option<String>,
    pub price: f64,
}

impl NewConsultation {
    pub fn validate(&self) -> ClinicResult<()> {
        require_name("docname", &self.docname)?;
        if let Some(specialization) = &self.specialization {
            require_max_len("specialization", specialization, MAX_TEXT_LEN)?;
        }
        require_amount("price", self.price)
    }
}

/// A diagnostic test offered by the clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTest {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLabTest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
}

impl NewLabTest {
    pub fn validate(&self) -> ClinicResult<()> {
        require_name("name", &self.name)?;
        require_amount("price", self.price)
    }
}

fn require_name(field: &str, value: &str) -> ClinicResult<()> {
    if value.trim().is_empty() {
        return Err(ClinicError::Validation(format!("{} is required", field)));
    }
    require_max_len(field, value, MAX_TEXT_LEN)
}
