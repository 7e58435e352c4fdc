use super::*;

#[test]
fn oauth_paths_embed_provider() {
    assert_eq!(oauth_login_path(Provider::Google), "/api/auth/oauth/google/login");
    assert_eq!(oauth_callback_path(Provider::Github), "/api/auth/oauth/github/callback");
}

#[test]
fn bearer_formats_authorization_header() {
    assert_eq!(bearer("abc"), "Bearer abc");
}

#[test]
fn login_form_body_encodes_credentials() {
    let credentials = LoginRequest {
        email: "a+b@example.org".to_owned(),
        password: "p&ss word".to_owned(),
        remember_me: false,
    };
    assert_eq!(login_form_body(&credentials), "username=a%2Bb%40example.org&password=p%26ss+word");
}

#[test]
fn rejection_message_prefers_string_detail() {
    assert_eq!(rejection_message(r#"{"detail":"invalid_credentials"}"#, "Login failed"), "invalid_credentials");
}

#[test]
fn rejection_message_reads_validation_list() {
    let body = r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address"}]}"#;
    assert_eq!(rejection_message(body, "Registration failed"), "value is not a valid email address");
}

#[test]
fn rejection_message_falls_back_on_garbage() {
    assert_eq!(rejection_message("<html>502</html>", "Login failed"), "Login failed");
    assert_eq!(rejection_message(r#"{"detail":""}"#, "Login failed"), "Login failed");
    assert_eq!(rejection_message("{}", "Login failed"), "Login failed");
}

#[test]
fn endpoint_paths_are_stable() {
    assert_eq!(LOGIN_PATH, "/api/auth/login");
    assert_eq!(ME_PATH, "/api/auth/me");
    assert_eq!(REFRESH_PATH, "/api/auth/refresh");
    assert_eq!(VERIFY_EMAIL_PATH, "/api/auth/verify-email");
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn email_verification_is_unavailable_off_browser() {
    let gateway = HttpGateway::new(ApiConfig { base_url: "http://localhost:8000".to_owned() });
    let result = futures::executor::block_on(gateway.verify_email("tok"));
    assert_eq!(result, Err(GatewayError::Unavailable));
}

#[test]
fn gateway_error_messages_surface_detail() {
    let err = GatewayError::Rejected { status: 400, message: "bad".to_owned() };
    assert_eq!(err.to_string(), "bad");
    assert_eq!(GatewayError::Network("Failed to fetch".to_owned()).to_string(), "Failed to fetch");
}
