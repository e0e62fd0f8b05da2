use serde::{Deserialize, Serialize};
use std::fmt;

pub const CUSTOMER_ID_MAX_LEN: usize = 5;

/// Primary key of the `customers` table: 1 to 5 characters, not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

impl CustomerId {
    pub fn parse(raw: impl Into<String>) -> northwind::Result<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(northwind::Error::Validation(
                "customer id must not be blank".into(),
            ));
        }
        let len = raw.chars().count();
        if len > CUSTOMER_ID_MAX_LEN {
            return Err(northwind::Error::Validation(format!(
                "customer id must be at most {CUSTOMER_ID_MAX_LEN} characters, got {len}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CustomerId {
    type Error = northwind::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CustomerId> for String {
    fn from(value: CustomerId) -> Self {
        value.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row of the `customers` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Customer {
    pub customer_id: String,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub contact_title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
}

impl Customer {
    pub fn new(id: &CustomerId, company_name: impl Into<String>) -> Self {
        Self {
            customer_id: id.as_str().to_string(),
            company_name: company_name.into(),
            contact_name: None,
            contact_title: None,
            address: None,
            city: None,
            region: None,
            postal_code: None,
            country: None,
            phone: None,
            fax: None,
        }
    }
}
