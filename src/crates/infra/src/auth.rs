use application::auth::{TokenService, UserClaims};
use application::error::AppError;
use bcrypt::hash as bcrypt_hash;
use bcrypt::verify as bcrypt_verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use serde::{Deserialize, Serialize};

pub trait AuthConfig {
    fn jwt_secret(&self) -> &str;
    fn jwt_expire_secs(&self) -> i64;
    fn salt_cost(&self) -> i32;
}

#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    salt_cost: i32,
}

impl BcryptPasswordHasher {
    pub fn new(salt_cost: i32) -> Self {
        Self { salt_cost }
    }
}

impl application::auth::PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plain: &str) -> Result<String, AppError> {
        bcrypt_hash(plain, self.salt_cost as u32).map_err(|e| AppError::AuthError(e.to_string()))
    }

    fn verify(&self, pwd: &str, hashed_pwd: &str) -> Result<(), AppError> {
        if bcrypt_verify(pwd, hashed_pwd).unwrap_or(false) {
            Ok(())
        } else {
            Err(AppError::AuthError("invalid password".to_string()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtTokenService {
    jwt_secret: String,
    exp_secs: i64,
}

impl JwtTokenService {
    pub fn new(jwt_secret: &str, exp_secs: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            exp_secs,
        }
    }

    fn encode_claims<T: Serialize>(&self, claims: &T) -> Result<String, AppError> {
        let key = EncodingKey::from_secret(self.jwt_secret.as_bytes());
        encode(&Header::new(Algorithm::HS256), claims, &key)
            .map_err(|e| AppError::AuthError(e.to_string()))
    }

    fn decode_claims<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<T>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AppError::AuthError(e.to_string()))?;

        Ok(token_data.claims)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    pub sub: String,
    pub adm: bool,
    pub exp: i64,
    pub iat: i64,
}

impl JwtClaims {
    fn new(claims: &UserClaims, exp_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: claims.user_name.clone(),
            adm: claims.is_admin,
            exp: now + exp_secs,
            iat: now,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, claims: &UserClaims) -> Result<String, AppError> {
        let jwt_claims = JwtClaims::new(claims, self.exp_secs);
        self.encode_claims(&jwt_claims)
    }

    fn verify(&self, token: &str) -> Result<UserClaims, AppError> {
        let jwt_claims: JwtClaims = self.decode_claims(token)?;
        Ok(UserClaims {
            user_name: jwt_claims.sub,
            is_admin: jwt_claims.adm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use application::auth::PasswordHasher;

    #[test]
    fn test_bcrypt_roundtrip() {
        let hasher = BcryptPasswordHasher::new(4); // 测试用低成本
        let hashed = hasher.hash("s3cret").unwrap();
        assert!(hasher.verify("s3cret", &hashed).is_ok());
        assert!(hasher.verify("wrong", &hashed).is_err());
    }

    #[test]
    fn test_jwt_roundtrip() {
        let svc = JwtTokenService::new("unit-test-secret", 60);
        let token = svc
            .issue(&UserClaims {
                user_name: "ops".to_string(),
                is_admin: true,
            })
            .unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.user_name, "ops");
        assert!(claims.is_admin);
    }

    #[test]
    fn test_jwt_rejects_wrong_secret() {
        let svc = JwtTokenService::new("secret-a", 60);
        let token = svc
            .issue(&UserClaims {
                user_name: "ops".to_string(),
                is_admin: false,
            })
            .unwrap();
        let other = JwtTokenService::new("secret-b", 60);
        assert!(other.verify(&token).is_err());
    }
}
