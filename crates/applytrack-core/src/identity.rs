//! Identities, accounts, and the inputs accepted by registration and login.

use serde::{Deserialize, Serialize};

use crate::validate::{
  BLANK, NON_FIELD_ERRORS, REQUIRED, ValidationErrors, looks_like_email,
};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Opaque reference to an authenticated actor. Every owner-scoped store call
/// takes one explicitly.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

/// A registered account, without its secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:       UserId,
  pub username: String,
  pub email:    String,
}

/// A user together with its stored argon2 PHC string. Never serialised.
#[derive(Debug, Clone)]
pub struct UserCredentials {
  pub user:          User,
  pub password_hash: String,
}

/// Input to [`crate::store::TrackerStore::create_user`]; the password is
/// already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
}

/// Body returned by registration and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
  pub token:    String,
  pub username: String,
  pub email:    String,
}

// ─── Registration ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationInput {
  pub username:          Option<String>,
  pub email:             Option<String>,
  pub password:          Option<String>,
  pub repeated_password: Option<String>,
}

/// A registration request that passed validation. The password is plaintext.
#[derive(Debug, Clone)]
pub struct Registration {
  pub username: String,
  pub email:    String,
  pub password: String,
}

impl RegistrationInput {
  pub fn validate(self) -> Result<Registration, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let username = present(&mut errors, "username", self.username);
    if let Some(name) = &username {
      if name.chars().count() > 150 {
        errors.add(
          "username",
          "Ensure this field has no more than 150 characters.",
        );
      } else if !name
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
      {
        errors.add(
          "username",
          "Enter a valid username. This value may contain only letters, \
           numbers, and @/./+/-/_ characters.",
        );
      }
    }

    let email = present(&mut errors, "email", self.email);
    if let Some(e) = &email
      && !looks_like_email(e)
    {
      errors.add("email", "Enter a valid email address.");
    }

    let password = present(&mut errors, "password", self.password);
    let repeated = present(&mut errors, "repeated_password", self.repeated_password);

    if let (Some(pw), Some(rep)) = (&password, &repeated)
      && pw != rep
    {
      errors.add(NON_FIELD_ERRORS, "Passwords don't match");
    }

    match (username, email, password) {
      (Some(username), Some(email), Some(password)) if errors.is_empty() => {
        Ok(Registration { username, email, password })
      }
      _ => Err(errors),
    }
  }
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
  pub email:    Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Login {
  pub email:    String,
  pub password: String,
}

impl LoginInput {
  pub fn validate(self) -> Result<Login, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let email = present(&mut errors, "email", self.email);
    if let Some(e) = &email
      && !looks_like_email(e)
    {
      errors.add("email", "Enter a valid email address.");
    }
    // Passwords are compared verbatim; whitespace is significant.
    let password = match self.password {
      None => {
        errors.add("password", REQUIRED);
        None
      }
      Some(p) if p.is_empty() => {
        errors.add("password", BLANK);
        None
      }
      Some(p) => Some(p),
    };

    match (email, password) {
      (Some(email), Some(password)) if errors.is_empty() => {
        Ok(Login { email, password })
      }
      _ => Err(errors),
    }
  }
}

/// Required and non-blank; surrounding whitespace is trimmed.
fn present(
  errors: &mut ValidationErrors,
  field: &str,
  value: Option<String>,
) -> Option<String> {
  match value.map(|v| v.trim().to_owned()) {
    None => {
      errors.add(field, REQUIRED);
      None
    }
    Some(v) if v.is_empty() => {
      errors.add(field, BLANK);
      None
    }
    Some(v) => Some(v),
  }
}
