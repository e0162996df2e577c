//! Validation for user credentials submitted on signup and profile update.

use crate::error::CoreError;

/// Check the shape of an email/password pair before it is hashed and stored.
///
/// Only basic sanity is enforced: the email must look like `local@domain`
/// and the password must not be empty.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), CoreError> {
    let email = email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid_email {
        return Err(CoreError::Validation("A valid email is required".into()));
    }
    if password.is_empty() {
        return Err(CoreError::Validation("Password must not be empty".into()));
    }
    Ok(())
}
