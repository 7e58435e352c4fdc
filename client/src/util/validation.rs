//! Form checks shared by the account pages.
//!
//! Each check returns the first problem as a user-facing French message.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn check_email(email: &str) -> Result<(), &'static str> {
    let well_formed = email
        .trim()
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if well_formed { Ok(()) } else { Err("Adresse email invalide.") }
}

/// A new password and its confirmation.
pub fn check_new_password(password: &str, confirm: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Le mot de passe doit contenir au moins 8 caractères.");
    }
    if password != confirm {
        return Err("Les mots de passe ne correspondent pas.");
    }
    Ok(())
}
