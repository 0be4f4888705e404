use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Contact form submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    /// Trims every field and rejects empty or malformed values
    pub fn normalized(self) -> Result<Self, AppError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        let message = self.message.trim().to_string();

        if name.is_empty() {
            return Err(AppError::InvalidInput("Name is required".to_string()));
        }
        if message.is_empty() {
            return Err(AppError::InvalidInput("Message is required".to_string()));
        }
        let valid_email = matches!(
            email.split_once('@'),
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        );
        if !valid_email {
            return Err(AppError::InvalidInput(format!("Invalid email address: {}", email)));
        }

        Ok(Self {
            name,
            email,
            message,
        })
    }

    pub fn subject(&self) -> String {
        format!("New Contact Form Submission from {}", self.name)
    }

    pub fn text_body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\nMessage: {}\n",
            self.name, self.email, self.message
        )
    }

    /// HTML body; user text is escaped
    pub fn html_body(&self) -> String {
        format!(
            "<h2>New Contact Form Submission</h2>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Message:</strong></p>\n\
             <p>{}</p>\n",
            escape_html(&self.name),
            escape_html(&self.email),
            escape_html(&self.message)
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
