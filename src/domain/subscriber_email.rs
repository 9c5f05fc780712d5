use validator::ValidateEmail;

const MAX_EMAIL_LENGTH: usize = 1000;

#[derive(Debug, Clone, serde::Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Trims and validates an address before it is allowed anywhere near
    /// persistence or outbound delivery.
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        let email = email.trim().to_lowercase();

        if email.len() > MAX_EMAIL_LENGTH {
            return Err("The e-mail address is too long.".to_string());
        }

        if !email.validate_email() {
            return Err(format!("{} is not a valid e-mail address.", email));
        }

        Ok(Self(email))
    }

    /// The part before the `@`, used as a fallback display name on the
    /// public subscription form.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
