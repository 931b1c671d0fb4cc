//! Security schemes for the standard authenticators.

use super::AuthenticationExtension;
use crate::schema::SecurityScheme;

/// Session cookie authentication
pub struct SessionScheme;

impl AuthenticationExtension for SessionScheme {
    fn target(&self) -> &str {
        "SessionAuthentication"
    }

    fn name(&self) -> &str {
        "cookieAuth"
    }

    fn security_definition(&self) -> SecurityScheme {
        SecurityScheme {
            scheme_type: "apiKey".to_string(),
            location: Some("cookie".to_string()),
            name: Some("sessionid".to_string()),
            ..Default::default()
        }
    }
}

/// HTTP basic authentication
pub struct BasicScheme;

impl AuthenticationExtension for BasicScheme {
    fn target(&self) -> &str {
        "BasicAuthentication"
    }

    fn name(&self) -> &str {
        "basicAuth"
    }

    fn security_definition(&self) -> SecurityScheme {
        SecurityScheme {
            scheme_type: "http".to_string(),
            scheme: Some("basic".to_string()),
            ..Default::default()
        }
    }
}

/// `Authorization: Token <key>` header
pub struct TokenScheme;

impl AuthenticationExtension for TokenScheme {
    fn target(&self) -> &str {
        "TokenAuthentication"
    }

    fn name(&self) -> &str {
        "tokenAuth"
    }

    fn security_definition(&self) -> SecurityScheme {
        SecurityScheme {
            scheme_type: "apiKey".to_string(),
            location: Some("header".to_string()),
            name: Some("Authorization".to_string()),
            description: Some("Token-based authentication with required prefix \"Token\"".to_string()),
            ..Default::default()
        }
    }
}

/// Bearer JSON web tokens
pub struct JwtScheme;

impl AuthenticationExtension for JwtScheme {
    fn target(&self) -> &str {
        "JWTAuthentication"
    }

    fn name(&self) -> &str {
        "jwtAuth"
    }

    fn security_definition(&self) -> SecurityScheme {
        SecurityScheme {
            scheme_type: "http".to_string(),
            scheme: Some("bearer".to_string()),
            bearer_format: Some("JWT".to_string()),
            ..Default::default()
        }
    }
}
