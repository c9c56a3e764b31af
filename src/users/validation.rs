use serde::Serialize;

use crate::users::repo_types::{NewUser, Role, SocialLinks};

const USERNAME_MAX: usize = 20;
const EMAIL_MAX: usize = 50;
const NAME_MAX: usize = 20;
const SOCIAL_URL_MAX: usize = 100;

/// Raw registration input, before any field rule has been applied.
#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub social_links: Option<SocialLinks>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", summary(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Required string: missing or empty counts as absent.
    fn required(&mut self, field: &'static str, value: Option<String>, label: &str) -> String {
        match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.push(field, format!("{label} is required"));
                String::new()
            }
        }
    }

    fn max_len(&mut self, field: &'static str, value: Option<&str>, max: usize, message: &str) {
        if value.is_some_and(|v| v.chars().count() > max) {
            self.push(field, message);
        }
    }
}

/// Applies the user schema rules to `draft`.
///
/// Every rule is checked, so the error list names all offending fields at
/// once. A missing role falls back to [`Role::User`]; uniqueness is left to
/// the store.
pub fn validate(draft: UserDraft) -> Result<NewUser, ValidationErrors> {
    let mut errs = Collector::default();

    let username = errs.required("username", draft.username, "Username");
    errs.max_len(
        "username",
        Some(username.as_str()),
        USERNAME_MAX,
        "Username must be less than 20 characters",
    );

    let email = errs.required("email", draft.email, "Email");
    errs.max_len(
        "email",
        Some(email.as_str()),
        EMAIL_MAX,
        "Email must be less than 50 characters",
    );

    let password = errs.required("password", draft.password, "Password");

    let role = match draft.role {
        None => Role::default(),
        Some(raw) if raw.is_empty() => {
            errs.push("role", "Role is required");
            Role::default()
        }
        Some(raw) => Role::parse(&raw).unwrap_or_else(|| {
            errs.push("role", format!("{raw} is not supported"));
            Role::default()
        }),
    };

    errs.max_len(
        "firstName",
        draft.first_name.as_deref(),
        NAME_MAX,
        "First name must be less than 20 characters",
    );
    errs.max_len(
        "lastName",
        draft.last_name.as_deref(),
        NAME_MAX,
        "Last name must be less than 20 characters",
    );

    let social_links = draft.social_links.filter(|links| !links.is_empty());
    if let Some(links) = &social_links {
        let checks: [(&'static str, &Option<String>, &str); 6] = [
            ("socialLinks.website", &links.website, "Website"),
            ("socialLinks.facebook", &links.facebook, "Facebook"),
            ("socialLinks.instagram", &links.instagram, "Instagram"),
            ("socialLinks.linkedin", &links.linkedin, "LinkedIn"),
            ("socialLinks.x", &links.x, "X"),
            ("socialLinks.youtube", &links.youtube, "YouTube"),
        ];
        for (field, value, site) in checks {
            errs.max_len(
                field,
                value.as_deref(),
                SOCIAL_URL_MAX,
                &format!("{site} URL must be less than 100 characters"),
            );
        }
    }

    if !errs.0.is_empty() {
        return Err(ValidationErrors(errs.0));
    }

    Ok(NewUser {
        username,
        email,
        password,
        role,
        first_name: draft.first_name,
        last_name: draft.last_name,
        social_links,
    })
}
