use super::*;

#[test]
fn token_response_decodes_full_body() -> Result<(), String> {
    let token = TokenResponse::from_json(
        r#"{"access_token": "abc123", "expires_in": 300, "token_type": "Bearer"}"#,
    )
    .map_err(|err| format!("decode failed: {}", err))?;
    if token.access_token != "abc123" {
        return Err(format!("Unexpected token: {}", token.access_token));
    }
    if token.expires_in != 300 {
        return Err(format!("Unexpected expires_in: {}", token.expires_in));
    }
    Ok(())
}

#[test]
fn token_response_defaults_expires_in() -> Result<(), String> {
    let token = TokenResponse::from_json(r#"{"access_token": "abc123"}"#)
        .map_err(|err| format!("decode failed: {}", err))?;
    if token.expires_in != DEFAULT_EXPIRES_IN_SECS {
        return Err(format!("Unexpected expires_in: {}", token.expires_in));
    }
    Ok(())
}

#[test]
fn token_response_requires_access_token() -> Result<(), String> {
    if TokenResponse::from_json(r#"{"expires_in": 60}"#).is_ok() {
        return Err("Expected error for missing access_token".to_owned());
    }
    Ok(())
}

#[test]
fn token_response_rejects_non_json() -> Result<(), String> {
    if TokenResponse::from_json("<html>Bad Gateway</html>").is_ok() {
        return Err("Expected error for non-JSON body".to_owned());
    }
    Ok(())
}

#[test]
fn credential_expiry_applies_safety_margin() -> Result<(), String> {
    let token = TokenResponse::from_json(r#"{"access_token": "tok", "expires_in": 60}"#)
        .map_err(|err| format!("decode failed: {}", err))?;
    let credential = Credential::from_token_response(&token, 1_000);
    if credential.expires_at_epoch_secs() != 1_055 {
        return Err(format!(
            "Expected expiry 1055, got {}",
            credential.expires_at_epoch_secs()
        ));
    }
    Ok(())
}

#[test]
fn credential_expiry_saturates_short_lifetime() -> Result<(), String> {
    let token = TokenResponse::from_json(r#"{"access_token": "tok", "expires_in": 3}"#)
        .map_err(|err| format!("decode failed: {}", err))?;
    let credential = Credential::from_token_response(&token, 1_000);
    if !credential.is_expired(1_000) {
        return Err("Lifetime below the safety margin should expire immediately".to_owned());
    }
    Ok(())
}

#[test]
fn credential_is_expired_only_at_or_after_expiry() -> Result<(), String> {
    let token = TokenResponse::from_json(r#"{"access_token": "tok", "expires_in": 60}"#)
        .map_err(|err| format!("decode failed: {}", err))?;
    let credential = Credential::from_token_response(&token, 1_000);
    if credential.is_expired(1_054) {
        return Err("Credential should still be valid one second before expiry".to_owned());
    }
    if !credential.is_expired(1_055) {
        return Err("Credential should be expired at the expiry instant".to_owned());
    }
    if !credential.is_expired(2_000) {
        return Err("Credential should stay expired after the expiry instant".to_owned());
    }
    Ok(())
}
