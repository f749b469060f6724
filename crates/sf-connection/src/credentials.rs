//! Credentials for username/password authentication.
//!
//! Sensitive fields are redacted in Debug output to prevent accidental
//! exposure in logs.

/// Username/password credentials for one remote org.
///
/// The password and security token are redacted in Debug output.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
    security_token: Option<String>,
    sandbox: bool,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field(
                "security_token",
                &self.security_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sandbox", &self.sandbox)
            .finish()
    }
}

impl Credentials {
    /// Create new credentials with the given values.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: Option<String>,
        sandbox: bool,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token,
            sandbox,
        }
    }

    /// Get the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password as sent to the login endpoint: the org password with the
    /// security token appended when one is configured.
    pub fn api_password(&self) -> String {
        match &self.security_token {
            Some(token) => format!("{}{}", self.password, token),
            None => self.password.clone(),
        }
    }

    /// Whether these credentials target a sandbox org.
    pub fn is_sandbox(&self) -> bool {
        self.sandbox
    }

    /// The login host for these credentials (sandbox orgs log in against
    /// the test host).
    pub fn login_host(&self) -> &'static str {
        if self.sandbox {
            "test.salesforce.com"
        } else {
            "www.salesforce.com"
        }
    }

    /// Returns true if the credentials appear to be valid (non-empty).
    pub fn is_valid(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_password_appends_security_token() {
        let creds = Credentials::new("user@example.com", "hunter2", Some("TOK123".into()), false);
        assert_eq!(creds.api_password(), "hunter2TOK123");

        let creds = Credentials::new("user@example.com", "hunter2", None, false);
        assert_eq!(creds.api_password(), "hunter2");
    }

    #[test]
    fn test_login_host_switches_on_sandbox() {
        let creds = Credentials::new("user@example.com", "pw", None, true);
        assert_eq!(creds.login_host(), "test.salesforce.com");
        assert!(creds.is_sandbox());

        let creds = Credentials::new("user@example.com", "pw", None, false);
        assert_eq!(creds.login_host(), "www.salesforce.com");
        assert!(!creds.is_sandbox());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("user@example.com", "hunter2", Some("TOK123".into()), false);
        let debug = format!("{creds:?}");
        assert!(debug.contains("user@example.com"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("TOK123"));
    }

    #[test]
    fn test_is_valid_requires_username_and_password() {
        assert!(Credentials::new("u", "p", None, false).is_valid());
        assert!(!Credentials::new("", "p", None, false).is_valid());
        assert!(!Credentials::new("u", "", None, false).is_valid());
    }
}
