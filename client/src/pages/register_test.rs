use super::*;

fn valid() -> RegisterRequest {
    RegisterRequest {
        firstname: "Awa".to_owned(),
        lastname: "Diallo".to_owned(),
        email: "awa@example.org".to_owned(),
        password: "sahel-2024".to_owned(),
        confirm_password: "sahel-2024".to_owned(),
        phone: None,
        terms: true,
    }
}

#[test]
fn accepts_complete_form() {
    assert_eq!(validate_registration(&valid()), Ok(()));
}

#[test]
fn requires_names() {
    let form = RegisterRequest { lastname: "  ".to_owned(), ..valid() };
    assert_eq!(validate_registration(&form), Err("Le prénom et le nom sont requis."));
}

#[test]
fn rejects_malformed_email() {
    for email in ["awa", "@example.org", "awa@localhost", "awa@.org"] {
        let form = RegisterRequest { email: email.to_owned(), ..valid() };
        assert_eq!(validate_registration(&form), Err("Adresse email invalide."), "{email}");
    }
}

#[test]
fn rejects_short_or_mismatched_password() {
    let short = RegisterRequest { password: "short".to_owned(), confirm_password: "short".to_owned(), ..valid() };
    assert!(validate_registration(&short).is_err());
    let mismatch = RegisterRequest { confirm_password: "other-pass".to_owned(), ..valid() };
    assert_eq!(validate_registration(&mismatch), Err("Les mots de passe ne correspondent pas."));
}

#[test]
fn requires_terms() {
    let form = RegisterRequest { terms: false, ..valid() };
    assert_eq!(validate_registration(&form), Err("Vous devez accepter les conditions d'utilisation."));
}
