use crate::error::ApiError;
use log::warn;
use serde::Deserialize;

/// Roles granted through the identity provider's realm, e.g. Keycloak `realm_access`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Access-token claims the API reads. Group and role claims are all optional;
/// identity providers fill in whichever they support.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessClaims {
    pub sub: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub realm_access: RealmAccess,
}

impl AccessClaims {
    /// Group paths such as `/course_manager` match by their last segment
    fn memberships(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .chain(&self.roles)
            .chain(&self.realm_access.roles)
            .map(|name| name.rsplit('/').next().unwrap_or(name.as_str()))
    }

    pub fn is_member_of_any(&self, wanted: &[String]) -> bool {
        self.memberships()
            .any(|name| wanted.iter().any(|role| role == name))
    }
}

/// The user identifier carried in the access token's `sub` claim.
/// Students are registered under this identifier.
pub fn subject(claims: &AccessClaims) -> Result<String, ApiError> {
    claims
        .sub
        .as_ref()
        .filter(|sub| !sub.trim().is_empty())
        .cloned()
        .ok_or(ApiError::MissingSubject)
}

/// The caller's subject, provided they hold one of `staff_roles`
pub fn require_staff(claims: &AccessClaims, staff_roles: &[String]) -> Result<String, ApiError> {
    let sub = subject(claims)?;
    if claims.is_member_of_any(staff_roles) {
        return Ok(sub);
    }

    warn!("Refused staff-only request from {sub}");
    Err(ApiError::Forbidden(
        "Only course managers and administrators can do this".to_string(),
    ))
}
