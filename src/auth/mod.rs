//! Bearer-token identity. Tokens are issued by the account service; this
//! module only verifies them and answers role questions.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    SchedulerAdmin,
    HrAdmin,
    AuthorizationAdmin,
    PayrollAdmin,
    Staff,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        !matches!(self, Role::Staff)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn can_manage_shifts(&self) -> bool {
        matches!(
            self.role,
            Role::SuperAdmin | Role::SchedulerAdmin | Role::HrAdmin
        )
    }

    pub fn can_read_audit_log(&self) -> bool {
        matches!(self.role, Role::SuperAdmin | Role::AuthorizationAdmin)
    }

    pub fn requires_shift_manager(&self) -> Result<(), AppError> {
        if self.can_manage_shifts() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Shift management requires a scheduling role".to_string(),
            ))
        }
    }

    pub fn requires_audit_reader(&self) -> Result<(), AppError> {
        if self.can_read_audit_log() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Audit log access requires an authorization role".to_string(),
            ))
        }
    }

    pub fn requires_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// Signs a token for `user_id`. Used by tooling and tests; production tokens
/// come from the account service with the same secret.
pub fn issue_token(
    user_id: Uuid,
    role: Role,
    secret: &str,
    valid_for: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        role,
        exp: (Utc::now() + valid_for).timestamp().max(0) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

impl FromRequest for Claims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(token) = bearer_token(req) else {
            return ready(Err(AppError::Unauthorized));
        };
        let Some(config) = req.app_data::<Data<Config>>() else {
            log::error!("Config missing from app data; cannot verify tokens");
            return ready(Err(AppError::InternalServerError(None)));
        };

        ready(verify_token(token, &config.jwt_secret).map_err(|e| {
            log::debug!("Rejected bearer token: {}", e);
            AppError::Unauthorized
        }))
    }
}
