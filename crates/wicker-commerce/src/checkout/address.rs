//! Postal address type.

use serde::{Deserialize, Serialize};

/// A shipping or billing address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Address {
    /// Recipient name.
    pub name: String,
    /// Street address.
    pub street: String,
    /// Apartment, suite, etc.
    pub unit: Option<String>,
    /// City.
    pub city: String,
    /// State or province code (e.g., "CA").
    pub region: Option<String>,
    /// Postal/ZIP code.
    pub postal_code: String,
    /// Country code (e.g., "US").
    pub country_code: String,
    /// Phone number.
    pub phone: Option<String>,
}

impl Address {
    /// Create an address with the required fields.
    pub fn new(
        name: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            street: street.into(),
            unit: None,
            city: city.into(),
            region: None,
            postal_code: postal_code.into(),
            country_code: country_code.into(),
            phone: None,
        }
    }

    /// Check if every required field is non-empty.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.street.is_empty()
            && !self.city.is_empty()
            && !self.postal_code.is_empty()
            && !self.country_code.is_empty()
    }

    /// Format as a single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.street.clone()];
        if let Some(ref unit) = self.unit {
            parts.push(unit.clone());
        }
        parts.push(self.city.clone());
        if let Some(ref region) = self.region {
            parts.push(region.clone());
        }
        parts.push(self.postal_code.clone());
        parts.push(self.country_code.clone());
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_address() {
        let addr = Address::new("Ada Lovelace", "12 Analytical Way", "London", "N1 9GU", "GB");
        assert!(addr.is_complete());
    }

    #[test]
    fn test_empty_required_field_is_incomplete() {
        let mut addr = Address::new("Ada Lovelace", "12 Analytical Way", "London", "N1 9GU", "GB");
        addr.city.clear();
        assert!(!addr.is_complete());
    }

    #[test]
    fn test_one_line_formatting() {
        let mut addr = Address::new("Grace Hopper", "1 Compiler Ct", "Arlington", "22202", "US");
        addr.region = Some("VA".to_string());
        let line = addr.one_line();
        assert!(line.contains("Arlington"));
        assert!(line.contains("VA"));
    }
}
