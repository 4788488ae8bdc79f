use std::env;

/// Process-wide settings, read once at startup. Transport-specific settings
/// (provider keys, SMTP credentials, spreadsheet id) are read by each
/// adapter's own constructor.
pub struct Config {
    pub frontend_origin: String,
    /// Mailbox the notification emails are delivered to.
    pub owner_email: String,
    /// Display name used for the From header and in the email subject.
    pub site_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok(); // Load .env file

        let frontend_origin = env::var("FRONTEND_ORIGIN").expect("FRONTEND_ORIGIN must be set");
        let owner_email = env::var("CONTACT_EMAIL_TO").expect("CONTACT_EMAIL_TO must be set");
        let site_name = env::var("SITE_NAME").unwrap_or_else(|_| "Clinic Contact Form".into());

        Config {
            frontend_origin,
            owner_email,
            site_name,
        }
    }
}
