use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use shared::error::{AppError, AppResult};

// ソルト付き argon2id でハッシュ化する
pub fn hash_password(plain: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHashError(e.to_string()))
}

// 未登録のメールアドレスでの照合に使う。どの平文とも一致しない
const UNKNOWN_USER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

// 登録済みユーザーの照合と同じだけ argon2 の計算を行う
pub fn verify_unknown_user(plain: &str) -> AppResult<bool> {
    verify_password(plain, UNKNOWN_USER_HASH)
}

pub fn verify_password(plain: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| AppError::PasswordHashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifiable() {
        let first = hash_password("s3cret-pass").unwrap();
        let second = hash_password("s3cret-pass").unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(verify_password("s3cret-pass", &first).unwrap());
        assert!(verify_password("s3cret-pass", &second).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(!verify_password("s3cret-pasS", &hash).unwrap());
    }

    #[test]
    fn unknown_user_hash_is_well_formed_and_never_matches() {
        assert!(!verify_unknown_user("s3cret-pass").unwrap());
        assert!(!verify_unknown_user("").unwrap());

        let params = PasswordHash::new(UNKNOWN_USER_HASH).unwrap();
        let real = hash_password("s3cret-pass").unwrap();
        let real = PasswordHash::new(&real).unwrap();
        assert_eq!(params.algorithm, real.algorithm);
        assert_eq!(params.params, real.params);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("whatever", "plaintext"),
            Err(AppError::PasswordHashError(_))
        ));
    }
}
