/// Integration-level tests for the `shared` crate.
///
/// Each section tests one module; unit tests that are tightly coupled to
/// private helpers live inside the modules themselves (see `#[cfg(test)]`
/// blocks in `role.rs` and `client_config.rs`).
// ---------------------------------------------------------------------------
// Token claims
// ---------------------------------------------------------------------------
#[cfg(test)]
mod jwt_tests {
    use shared::types::*;

    #[test]
    fn claims_deserialize_from_typical_payload() {
        let json = r#"{"id":"64f0c2","sub":"alice@example.com","iat":1700000000,"exp":1700003600}"#;
        let c: TokenClaims = serde_json::from_str(json).unwrap();
        assert_eq!(c.exp, Some(1_700_003_600.0));
        assert_eq!(c.iat, Some(1_700_000_000.0));
        assert_eq!(c.id.as_deref(), Some("64f0c2"));
    }

    #[test]
    fn missing_exp_is_none_not_an_error() {
        let c: TokenClaims = serde_json::from_str(r#"{"sub":"bob"}"#).unwrap();
        assert!(c.exp.is_none());
        assert!(c.exp_millis().is_none());
    }

    #[test]
    fn string_exp_is_a_decode_error() {
        let r = serde_json::from_str::<TokenClaims>(r#"{"exp":"1700003600"}"#);
        assert!(r.is_err());
    }

    #[test]
    fn exp_millis_scales_seconds() {
        let c = TokenClaims {
            exp: Some(2.5),
            ..TokenClaims::default()
        };
        assert_eq!(c.exp_millis(), Some(2500.0));
    }

    #[test]
    fn mongo_style_id_alias() {
        let c: TokenClaims = serde_json::from_str(r#"{"_id":"abc","exp":1}"#).unwrap();
        assert_eq!(c.id.as_deref(), Some("abc"));
    }

    #[test]
    fn from_value_keeps_exp_when_ids_are_numbers() {
        let payload = serde_json::json!({"id": 42, "sub": 7, "exp": 4102444800u64});
        let c = TokenClaims::from_value(&payload);
        assert_eq!(c.exp, Some(4_102_444_800.0));
        assert_eq!(c.id.as_deref(), Some("42"));
        assert_eq!(c.sub.as_deref(), Some("7"));
    }

    #[test]
    fn from_value_prefers_id_over_mongo_id() {
        let payload = serde_json::json!({"id": "a", "_id": "b", "exp": 1});
        assert_eq!(TokenClaims::from_value(&payload).id.as_deref(), Some("a"));
    }

    #[test]
    fn from_value_drops_mistyped_claims() {
        let payload = serde_json::json!({"exp": "soon", "iat": [1], "sub": null});
        assert_eq!(TokenClaims::from_value(&payload), TokenClaims::default());
    }
}

// ---------------------------------------------------------------------------
// Session / user types
// ---------------------------------------------------------------------------

#[cfg(test)]
mod session_tests {
    use shared::types::*;

    fn sample_user() -> User {
        User {
            id: "u-42".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Mentor,
        }
    }

    #[test]
    fn user_roundtrips_through_storage_json() {
        let u = sample_user();
        let json = serde_json::to_string(&u).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, u);
    }

    #[test]
    fn user_json_contains_expected_keys() {
        let json = serde_json::to_value(sample_user()).unwrap();
        for key in &["id", "name", "email", "role"] {
            assert!(json.get(key).is_some(), "missing key: {}", key);
        }
        assert_eq!(json["role"], "mentor");
    }

    #[test]
    fn user_accepts_underscore_id() {
        let json = r#"{"_id":"x1","name":"B","email":"b@x.io","role":"student"}"#;
        let u: User = serde_json::from_str(json).unwrap();
        assert_eq!(u.id, "x1");
        assert_eq!(u.role, Role::Student);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let json = r#"{"id":"x1","name":"B","email":"b@x.io","role":"owner"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }

    #[test]
    fn session_debug_redacts_token() {
        let s = Session::new("secret.token.value", sample_user());
        let out = format!("{:?}", s);
        assert!(!out.contains("secret.token.value"));
        assert!(out.contains("alice@example.com"));
    }

    #[test]
    fn session_display_omits_token() {
        let s = Session::new("secret.token.value", sample_user());
        let out = format!("{}", s);
        assert!(!out.contains("secret"));
        assert!(out.contains("role=mentor"));
    }

    #[test]
    fn role_helpers() {
        assert!(Role::Admin.is_staff() && Role::Admin.is_admin());
        assert!(Role::Mentor.is_staff() && !Role::Mentor.is_admin());
        assert!(!Role::Student.is_staff());
        assert!(!Role::Volunteer.is_staff());
    }
}

// ---------------------------------------------------------------------------
// Auth wire types
// ---------------------------------------------------------------------------

#[cfg(test)]
mod auth_tests {
    use shared::types::*;

    #[test]
    fn login_data_username_alias_maps_to_email() {
        let json = r#"{"username":"bob@example.com","password":"pass123"}"#;
        let d: LoginData = serde_json::from_str(json).unwrap();
        assert_eq!(d.email, "bob@example.com");
    }

    #[test]
    fn auth_response_becomes_session() {
        let json = r#"{
            "token": "a.b.c",
            "user": {"id":"1","name":"Ann","email":"ann@x.io","role":"admin"},
            "message": "Login successful"
        }"#;
        let r: AuthResponse = serde_json::from_str(json).unwrap();
        let s = r.into_session();
        assert_eq!(s.token, "a.b.c");
        assert_eq!(s.role(), Role::Admin);
    }

    #[test]
    fn registration_role_defaults_to_student() {
        let json = r#"{"name":"C","email":"c@x.io","password":"Pass1234"}"#;
        let d: RegistrationData = serde_json::from_str(json).unwrap();
        assert_eq!(d.role, Role::Student);
    }

    #[test]
    fn verify_otp_serializes_fields() {
        let d = VerifyOtpData {
            email: "c@x.io".into(),
            otp: "123456".into(),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["otp"], "123456");
    }

    #[test]
    fn reset_password_serializes_fields() {
        let d = ResetPasswordData {
            token: "t".into(),
            password: "NewPass1".into(),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["token"], "t");
        assert_eq!(json["password"], "NewPass1");
    }

    #[test]
    fn error_response_tolerates_message_only_body() {
        let e: ErrorResponse = serde_json::from_str(r#"{"message":"Invalid credentials"}"#).unwrap();
        assert_eq!(e.status, "error");
        assert!(e.code.is_empty());
        assert_eq!(e.to_string(), "Invalid credentials");
    }

    #[test]
    fn error_response_display_includes_code() {
        let e = ErrorResponse::new("TOKEN_EXPIRED", "Session expired");
        assert_eq!(e.to_string(), "TOKEN_EXPIRED: Session expired");
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

#[cfg(test)]
mod config_tests {
    use shared::config::{load_config, load_config_or_default};
    use shared::types::ConfigError;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_full_document() {
        let f = write_config(
            r#"
            [api]
            base_url = "https://portal.example.com/api/"
            timeout_secs = 5

            [auth]
            token_lifetime_minutes = 30
            min_check_interval_secs = 10
            max_check_interval_secs = 120

            [storage]
            dir = "/tmp/portal"
            "#,
        );
        let cfg = load_config(f.path()).unwrap();
        assert_eq!(cfg.api.timeout_secs, 5);
        assert_eq!(cfg.auth.token_lifetime_minutes, 30);
        assert_eq!(cfg.auth.max_check_interval_secs, 120);
        assert_eq!(cfg.storage.dir, "/tmp/portal");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn empty_file_is_rejected() {
        let f = write_config("   \n");
        assert!(matches!(load_config(f.path()), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn zero_lifetime_is_rejected() {
        let f = write_config("[auth]\ntoken_lifetime_minutes = 0\n");
        assert!(matches!(load_config(f.path()), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn huge_lifetime_loads_without_overflow() {
        let f = write_config("[auth]\ntoken_lifetime_minutes = 9223372036854775807\n");
        let cfg = load_config(f.path()).unwrap();
        assert_eq!(
            cfg.auth.token_lifetime(),
            std::time::Duration::from_secs(u64::MAX)
        );
    }

    #[test]
    fn inverted_interval_bounds_are_rejected() {
        let f = write_config("[auth]\nmin_check_interval_secs = 90\nmax_check_interval_secs = 30\n");
        assert!(matches!(load_config(f.path()), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let f = write_config("[auth\n");
        assert!(matches!(load_config(f.path()), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.auth.token_lifetime_minutes, 60);
    }

    #[test]
    fn missing_file_is_io_error_for_strict_loader() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_config(dir.path().join("absent.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
