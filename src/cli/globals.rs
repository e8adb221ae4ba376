use crate::email::smtp::SmtpConfig;
use secrecy::SecretString;

/// Settings shared across actions, wired once at startup.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<SecretString>,
    pub smtp_from: String,
}

impl GlobalArgs {
    /// SMTP settings when a relay host is configured; `None` means mail is
    /// logged instead of sent.
    #[must_use]
    pub fn smtp_config(&self) -> Option<SmtpConfig> {
        self.smtp_host.as_ref().map(|host| SmtpConfig {
            host: host.clone(),
            port: self.smtp_port,
            username: self.smtp_username.clone(),
            password: self.smtp_password.clone(),
            from: self.smtp_from.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(host: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            smtp_host: host.map(ToString::to_string),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: "no-reply@localhost".to_string(),
        }
    }

    #[test]
    fn test_smtp_config_requires_host() {
        assert!(args(None).smtp_config().is_none());

        let config = args(Some("smtp.example.com")).smtp_config().unwrap();
        assert_eq!(config.host, "smtp.example.com");
        assert_eq!(config.port, 587);
    }
}
