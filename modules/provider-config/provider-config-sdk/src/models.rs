use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigValueError;

/// Location of a secret in the vault: `path` with an optional `#key` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VaultRef {
    pub path: String,
    pub key: Option<String>,
}

impl VaultRef {
    /// Parses `secret/path` or `secret/path#key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigValueError::InvalidVaultRef`] for a blank path or an
    /// empty key after `#`.
    pub fn parse(reference: &str) -> Result<Self, ConfigValueError> {
        let invalid = |reason| ConfigValueError::InvalidVaultRef {
            reference: reference.to_owned(),
            reason,
        };

        let (path, key) = match reference.split_once('#') {
            Some((path, key)) => (path, Some(key)),
            None => (reference, None),
        };
        let path = path.trim();
        if path.is_empty() {
            return Err(invalid("path must not be blank"));
        }
        let key = match key.map(str::trim) {
            Some("") => return Err(invalid("key after '#' must not be empty")),
            other => other.map(str::to_owned),
        };

        Ok(Self {
            path: path.to_owned(),
            key,
        })
    }
}

impl FromStr for VaultRef {
    type Err = ConfigValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VaultRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}#{key}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// A provider parameter value: a secret held in the vault, or plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfigValue", into = "RawConfigValue")]
pub enum ConfigValue {
    Secret(VaultRef),
    Plaintext(String),
}

impl ConfigValue {
    #[must_use]
    pub fn is_secret(&self) -> bool {
        matches!(self, Self::Secret(_))
    }

    #[must_use]
    pub fn vault_ref(&self) -> Option<&VaultRef> {
        match self {
            Self::Secret(vault_ref) => Some(vault_ref),
            Self::Plaintext(_) => None,
        }
    }

    #[must_use]
    pub fn plaintext(&self) -> Option<&str> {
        match self {
            Self::Plaintext(value) => Some(value),
            Self::Secret(_) => None,
        }
    }
}

/// Stored shape of a [`ConfigValue`]: exactly one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaintext: Option<String>,
}

impl TryFrom<RawConfigValue> for ConfigValue {
    type Error = ConfigValueError;

    fn try_from(raw: RawConfigValue) -> Result<Self, Self::Error> {
        match (raw.vault_ref, raw.plaintext) {
            (Some(_), Some(_)) => Err(ConfigValueError::BothSet),
            (None, None) => Err(ConfigValueError::NeitherSet),
            (Some(reference), None) => VaultRef::parse(&reference).map(Self::Secret),
            (None, Some(value)) => Ok(Self::Plaintext(value)),
        }
    }
}

impl From<ConfigValue> for RawConfigValue {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Secret(vault_ref) => Self {
                vault_ref: Some(vault_ref.to_string()),
                plaintext: None,
            },
            ConfigValue::Plaintext(value) => Self {
                vault_ref: None,
                plaintext: Some(value),
            },
        }
    }
}

/// Configuration of one external provider. `tenant_id == None` is the
/// vanilla configuration shared by every tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub provider_code: String,
    #[serde(default)]
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub parameters: BTreeMap<String, ConfigValue>,
}

impl ProviderConfig {
    #[must_use]
    pub fn is_vanilla(&self) -> bool {
        self.tenant_id.is_none()
    }

    /// Vault references used by this provider, in parameter order.
    pub fn secret_refs(&self) -> impl Iterator<Item = (&str, &VaultRef)> {
        self.parameters
            .iter()
            .filter_map(|(name, value)| value.vault_ref().map(|r| (name.as_str(), r)))
    }
}

/// Effective parameters of `provider_code` for `tenant_id`: the vanilla
/// configuration overlaid with the tenant's overrides, key by key.
#[must_use]
pub fn merged_parameters(
    configs: &[ProviderConfig],
    provider_code: &str,
    tenant_id: Option<Uuid>,
) -> BTreeMap<String, ConfigValue> {
    let for_provider = || configs.iter().filter(|c| c.provider_code == provider_code);

    let mut merged: BTreeMap<String, ConfigValue> = for_provider()
        .filter(|c| c.is_vanilla())
        .flat_map(|c| c.parameters.clone())
        .collect();

    if let Some(tenant_id) = tenant_id {
        merged.extend(
            for_provider()
                .filter(|c| c.tenant_id == Some(tenant_id))
                .flat_map(|c| c.parameters.clone()),
        );
    }
    merged
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn secret(reference: &str) -> ConfigValue {
        ConfigValue::Secret(VaultRef::parse(reference).unwrap())
    }

    fn plain(value: &str) -> ConfigValue {
        ConfigValue::Plaintext(value.to_owned())
    }

    #[test]
    fn test_vault_ref_parse_and_display() {
        let with_key = VaultRef::parse("secret/payments/stripe#api_key").unwrap();
        assert_eq!(with_key.path, "secret/payments/stripe");
        assert_eq!(with_key.key.as_deref(), Some("api_key"));
        assert_eq!(with_key.to_string(), "secret/payments/stripe#api_key");

        let bare: VaultRef = "secret/kyc".parse().unwrap();
        assert_eq!(bare.key, None);
        assert_eq!(bare.to_string(), "secret/kyc");
    }

    #[test]
    fn test_vault_ref_rejects_blank_parts() {
        assert!(matches!(
            VaultRef::parse("  #key"),
            Err(ConfigValueError::InvalidVaultRef { .. })
        ));
        assert!(matches!(
            VaultRef::parse("secret/kyc#"),
            Err(ConfigValueError::InvalidVaultRef { .. })
        ));
    }

    #[test]
    fn test_raw_value_with_both_fields_is_rejected() {
        let raw = RawConfigValue {
            vault_ref: Some("secret/x".to_owned()),
            plaintext: Some("x".to_owned()),
        };
        assert_eq!(ConfigValue::try_from(raw), Err(ConfigValueError::BothSet));
    }

    #[test]
    fn test_raw_value_with_no_fields_is_rejected() {
        assert_eq!(
            ConfigValue::try_from(RawConfigValue::default()),
            Err(ConfigValueError::NeitherSet)
        );
    }

    #[test]
    fn test_raw_value_converts_to_variant() {
        let raw = RawConfigValue {
            vault_ref: Some("secret/x#k".to_owned()),
            plaintext: None,
        };
        let value = ConfigValue::try_from(raw.clone()).unwrap();
        assert!(value.is_secret());
        assert_eq!(RawConfigValue::from(value), raw);

        let value = ConfigValue::try_from(RawConfigValue {
            vault_ref: None,
            plaintext: Some("https://api.example.com".to_owned()),
        })
        .unwrap();
        assert_eq!(value.plaintext(), Some("https://api.example.com"));
    }

    #[test]
    fn test_deserialize_rejects_invalid_state() {
        let ok: ConfigValue = serde_json::from_str(r#"{"plaintext":"v"}"#).unwrap();
        assert_eq!(ok, plain("v"));

        let both = r#"{"vault_ref":"a","plaintext":"b"}"#;
        assert!(serde_json::from_str::<ConfigValue>(both).is_err());
        assert!(serde_json::from_str::<ConfigValue>("{}").is_err());
    }

    #[test]
    fn test_serialize_emits_single_field() {
        let json = serde_json::to_string(&secret("secret/x#k")).unwrap();
        assert_eq!(json, r#"{"vault_ref":"secret/x#k"}"#);
    }

    #[test]
    fn test_tenant_parameters_override_vanilla() {
        let tenant = Uuid::new_v4();
        let configs = vec![
            ProviderConfig {
                provider_code: "stripe".to_owned(),
                tenant_id: None,
                parameters: BTreeMap::from([
                    ("base_url".to_owned(), plain("https://api.stripe.com")),
                    ("api_key".to_owned(), secret("secret/stripe#default")),
                ]),
            },
            ProviderConfig {
                provider_code: "stripe".to_owned(),
                tenant_id: Some(tenant),
                parameters: BTreeMap::from([(
                    "api_key".to_owned(),
                    secret("secret/stripe#tenant"),
                )]),
            },
            ProviderConfig {
                provider_code: "onfido".to_owned(),
                tenant_id: None,
                parameters: BTreeMap::from([("region".to_owned(), plain("eu"))]),
            },
        ];

        let merged = merged_parameters(&configs, "stripe", Some(tenant));
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["api_key"], secret("secret/stripe#tenant"));
        assert_eq!(merged["base_url"], plain("https://api.stripe.com"));

        let vanilla = merged_parameters(&configs, "stripe", None);
        assert_eq!(vanilla["api_key"], secret("secret/stripe#default"));

        let other = merged_parameters(&configs, "stripe", Some(Uuid::new_v4()));
        assert_eq!(other, vanilla);
    }

    #[test]
    fn test_secret_refs_lists_only_vault_values() {
        let config = ProviderConfig {
            provider_code: "stripe".to_owned(),
            tenant_id: None,
            parameters: BTreeMap::from([
                ("api_key".to_owned(), secret("secret/stripe#api_key")),
                ("base_url".to_owned(), plain("https://api.stripe.com")),
            ]),
        };

        let refs: Vec<_> = config.secret_refs().map(|(name, _)| name).collect();
        assert_eq!(refs, vec!["api_key"]);
    }
}
