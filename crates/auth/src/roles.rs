use core::str::FromStr;

use serde::{Deserialize, Serialize};

use souk_core::DomainError;

/// Marketplace role carried by every bearer credential.
///
/// The role set is closed: a user is either a merchant (owns catalog entries)
/// or a customer (purchases them). Route groups are gated on exactly one of
/// these values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Merchant,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Merchant => "merchant",
            Role::Customer => "customer",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merchant" => Ok(Role::Merchant),
            "customer" => Ok(Role::Customer),
            other => Err(DomainError::validation(format!("invalid role: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_roles() {
        assert_eq!("merchant".parse::<Role>().unwrap(), Role::Merchant);
        assert_eq!("customer".parse::<Role>().unwrap(), Role::Customer);
    }

    #[test]
    fn parse_rejects_unknown_role() {
        assert!("admin".parse::<Role>().is_err());
        assert!("Merchant".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Merchant).unwrap(), "\"merchant\"");
        let r: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(r, Role::Customer);
    }
}
