pub mod fanout;
pub mod google_auth;
pub mod mailer;
pub mod sheets;
pub mod template;
