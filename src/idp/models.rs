use serde::{Deserialize, Serialize};

use crate::profile::FieldError;

/// Identity provider configuration summary
///
/// `Default` is the empty provider shown while the real one loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProvider {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Logo URL
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub home_realm_identifier: String,
}

impl IdentityProvider {
    /// Avatar initial for providers without a logo
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }
}

/// Editable general settings of an identity provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProviderUpdate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub home_realm_identifier: String,
}

/// One entry of the management API's PATCH body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityProviderPatchOperation {
    pub operation: &'static str,
    pub path: &'static str,
    pub value: serde_json::Value,
}

impl IdentityProviderUpdate {
    /// Trim text fields; a blank image clears it
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            image: self
                .image
                .map(|image| image.trim().to_string())
                .filter(|image| !image.is_empty()),
            home_realm_identifier: self.home_realm_identifier.trim().to_string(),
            ..self
        }
    }

    /// The provider name must not be blank
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        if self.name.trim().is_empty() {
            return Err(vec![FieldError {
                name: "name".to_string(),
                message: "Name is required".to_string(),
            }]);
        }
        Ok(())
    }

    /// `REPLACE` operations for every general setting
    pub fn operations(&self) -> Vec<IdentityProviderPatchOperation> {
        let replace = |path, value| IdentityProviderPatchOperation {
            operation: "REPLACE",
            path,
            value,
        };

        vec![
            replace("/name", self.name.clone().into()),
            replace("/description", self.description.clone().into()),
            replace("/image", self.image.clone().unwrap_or_default().into()),
            replace("/isEnabled", self.is_enabled.into()),
            replace("/isPrimary", self.is_primary.into()),
            replace(
                "/homeRealmIdentifier",
                self.home_realm_identifier.clone().into(),
            ),
        ]
    }

    /// Apply these settings to a stored provider
    pub fn apply_to(&self, provider: &mut IdentityProvider) {
        provider.name = self.name.clone();
        provider.description = self.description.clone();
        provider.image = self.image.clone();
        provider.is_enabled = self.is_enabled;
        provider.is_primary = self.is_primary;
        provider.home_realm_identifier = self.home_realm_identifier.clone();
    }
}
