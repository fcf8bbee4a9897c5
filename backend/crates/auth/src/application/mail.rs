//! Verification mail

use platform::mailer::OutgoingMail;

use crate::domain::value_object::{
    email::Email, user_name::UserName, verification_code::VerificationCode,
};

pub const VERIFICATION_SUBJECT: &str = "Code de vérification";

pub fn verification_mail(to: &Email, name: &UserName, code: &VerificationCode) -> OutgoingMail {
    OutgoingMail {
        to: to.as_str().to_string(),
        subject: VERIFICATION_SUBJECT.to_string(),
        html: format!(
            "<p>Bonjour {}, votre code de vérification est : <strong>{}</strong>.</p>",
            escape_html(name.as_str()),
            code
        ),
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_contains_code_and_escaped_name() {
        let code = VerificationCode::from_json(&serde_json::json!(123456)).unwrap();
        let mail = verification_mail(
            &Email::new("zoe@example.com").unwrap(),
            &UserName::new("<Zoé>").unwrap(),
            &code,
        );

        assert_eq!(mail.to, "zoe@example.com");
        assert!(mail.html.contains("<strong>123456</strong>"));
        assert!(mail.html.contains("&lt;Zoé&gt;"));
    }
}
