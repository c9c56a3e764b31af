use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use rand::{rngs::OsRng, Rng};
use tracing::error;

const USERNAME_PREFIX: &str = "user-";
const USERNAME_RANDOM_LEN: usize = 10;

/// Random username such as `user-k2j9xq0w1z`. Uniqueness is left to the store.
pub fn gen_username() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..USERNAME_RANDOM_LEN)
        .filter_map(|_| char::from_digit(rng.gen_range(0..36), 36))
        .collect();
    format!("{USERNAME_PREFIX}{suffix}")
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}
