use super::*;

#[test]
fn email_needs_local_part_and_dotted_domain() {
    assert_eq!(check_email(" awa@example.org "), Ok(()));
    for email in ["", "awa", "@example.org", "awa@localhost", "awa@.org"] {
        assert_eq!(check_email(email), Err("Adresse email invalide."), "{email}");
    }
}

#[test]
fn password_length_counts_characters() {
    assert_eq!(check_new_password("éééééééé", "éééééééé"), Ok(()));
    assert_eq!(
        check_new_password("court", "court"),
        Err("Le mot de passe doit contenir au moins 8 caractères.")
    );
}

#[test]
fn password_must_match_confirmation() {
    assert_eq!(
        check_new_password("sahel-2024", "sahel-2025"),
        Err("Les mots de passe ne correspondent pas.")
    );
}
