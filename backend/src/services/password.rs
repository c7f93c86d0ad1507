use anyhow::{anyhow, Result};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

#[cfg(not(test))]
pub const PASSWORD_HASH_ITERATIONS: u32 = 600_000;
#[cfg(test)]
pub const PASSWORD_HASH_ITERATIONS: u32 = 1_000;

/// Hashes a password with PBKDF2-HMAC-SHA256 and a fresh random salt.
///
/// Output format: `pbkdf2-sha256$<iterations>$<salt-hex>$<hash-hex>`. The
/// iteration count is stored, so older hashes keep verifying after it changes.
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let mut hash = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        &salt,
        PASSWORD_HASH_ITERATIONS,
        &mut hash,
    );

    Ok(format!(
        "{SCHEME}${PASSWORD_HASH_ITERATIONS}${}${}",
        hex::encode(salt),
        hex::encode(hash)
    ))
}

/// Checks a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match parse_stored(stored) {
        Ok((iterations, salt, expected)) => {
            let mut actual = vec![0u8; expected.len()];
            pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut actual);
            constant_time_eq(&actual, &expected)
        }
        Err(_) => false,
    }
}

fn parse_stored(stored: &str) -> Result<(u32, Vec<u8>, Vec<u8>)> {
    let parts: Vec<&str> = stored.split('$').collect();
    let [scheme, iterations, salt, expected] = parts.as_slice() else {
        return Err(anyhow!("unexpected password hash layout"));
    };
    if *scheme != SCHEME {
        return Err(anyhow!("unsupported password hash scheme {scheme}"));
    }

    let iterations: u32 = iterations.parse()?;
    let salt = hex::decode(salt)?;
    let expected = hex::decode(expected)?;
    if iterations == 0 || salt.is_empty() || expected.is_empty() {
        return Err(anyhow!("degenerate password hash"));
    }
    Ok((iterations, salt, expected))
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
