use serde::{Deserialize, Serialize};

use crate::entity::{Customer, CustomerId};

/// The shape of a customer on the wire.
///
/// Fields are private and there are no setters: a DTO is only ever rebuilt,
/// never mutated. Missing `id`/`companyName` deserialize as empty strings so
/// that [`CustomerDto::validate`] reports them instead of the JSON extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    #[serde(default)]
    id: String,
    #[serde(default)]
    company_name: String,
    contact_name: Option<String>,
    contact_title: Option<String>,
    address: Option<String>,
    city: Option<String>,
    region: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    phone: Option<String>,
    fax: Option<String>,
}

pub const COMPANY_NAME_MAX_LEN: usize = 40;

impl CustomerDto {
    pub fn new(id: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
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

    pub fn with_contact(
        self,
        contact_name: impl Into<String>,
        contact_title: impl Into<String>,
    ) -> Self {
        Self {
            contact_name: Some(contact_name.into()),
            contact_title: Some(contact_title.into()),
            ..self
        }
    }

    pub fn with_city(self, city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..self
        }
    }

    pub fn with_country(self, country: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            ..self
        }
    }

    /// Same customer under another id. Used to make the id in the request
    /// path win over the one in the body.
    pub fn with_id(self, id: &CustomerId) -> Self {
        Self {
            id: id.as_str().to_string(),
            ..self
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn contact_name(&self) -> Option<&str> {
        self.contact_name.as_deref()
    }

    pub fn contact_title(&self) -> Option<&str> {
        self.contact_title.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn fax(&self) -> Option<&str> {
        self.fax.as_deref()
    }

    /// Checks every field and reports all violations in one error.
    pub fn validate(&self) -> northwind::Result<()> {
        let mut violations = Vec::new();

        if let Err(northwind::Error::Validation(msg)) =
            CustomerId::parse(self.id.as_str())
        {
            violations.push(format!("id: {msg}"));
        }

        if self.company_name.trim().is_empty() {
            violations.push("companyName: must not be blank".to_string());
        } else {
            check_len(
                &mut violations,
                "companyName",
                Some(self.company_name.as_str()),
                COMPANY_NAME_MAX_LEN,
            );
        }

        let optional = [
            ("contactName", &self.contact_name, 30),
            ("contactTitle", &self.contact_title, 30),
            ("address", &self.address, 60),
            ("city", &self.city, 15),
            ("region", &self.region, 15),
            ("postalCode", &self.postal_code, 10),
            ("country", &self.country, 15),
            ("phone", &self.phone, 24),
            ("fax", &self.fax, 24),
        ];
        for (field, value, max) in optional {
            check_len(&mut violations, field, value.as_deref(), max);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(northwind::Error::Validation(violations.join("; ")))
        }
    }
}

fn check_len(
    violations: &mut Vec<String>,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(value) = value {
        let len = value.chars().count();
        if len > max {
            violations.push(format!(
                "{field}: must be at most {max} characters, got {len}"
            ));
        }
    }
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        Self {
            id: c.customer_id,
            company_name: c.company_name,
            contact_name: c.contact_name,
            contact_title: c.contact_title,
            address: c.address,
            city: c.city,
            region: c.region,
            postal_code: c.postal_code,
            country: c.country,
            phone: c.phone,
            fax: c.fax,
        }
    }
}

impl From<CustomerDto> for Customer {
    fn from(dto: CustomerDto) -> Self {
        Self {
            customer_id: dto.id,
            company_name: dto.company_name,
            contact_name: dto.contact_name,
            contact_title: dto.contact_title,
            address: dto.address,
            city: dto.city,
            region: dto.region,
            postal_code: dto.postal_code,
            country: dto.country,
            phone: dto.phone,
            fax: dto.fax,
        }
    }
}
