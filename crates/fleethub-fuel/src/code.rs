//! Fuel authorization code generation.
//!
//! Codes are short enough to read out over a pump intercom and typed on
//! a bowser keypad, so the alphabet drops the characters operators
//! reliably confuse: 0/O and 1/I/L.

use rand::RngExt;
use uuid::Uuid;

use fleethub_database::repositories::FuelAuthorizationRepository;

use crate::authorization::FuelAuthError;

/// Characters allowed in an authorization code. Uppercase letters and
/// digits, minus the visually ambiguous 0, O, 1, I, and L.
pub const AUTH_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Length of a generated authorization code.
pub const AUTH_CODE_LENGTH: usize = 6;

/// Maximum draws before unique-code generation gives up. At the code
/// space this alphabet spans, exhausting this bound in practice means
/// something is badly wrong with the store, not the generator.
const MAX_GENERATION_ATTEMPTS: u32 = 10;

/// Generate a random authorization code, uniformly drawn from
/// [`AUTH_CODE_ALPHABET`].
pub fn generate_auth_code() -> String {
    let mut rng = rand::rng();
    (0..AUTH_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..AUTH_CODE_ALPHABET.len());
            AUTH_CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate an authorization code not currently held by any live
/// (pending or authorized) authorization in the organisation.
///
/// Draws up to 10 codes, checking the store after each draw; fails with
/// [`FuelAuthError::CodeSpaceExhausted`] only if every draw collides,
/// which bounds the loop rather than representing a reachable state at
/// normal scale.
pub async fn generate_unique_auth_code(
    repo: &FuelAuthorizationRepository,
    organisation_id: Uuid,
) -> Result<String, FuelAuthError> {
    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let code = generate_auth_code();
        if repo.find_live_by_code(organisation_id, &code).await?.is_none() {
            return Ok(code);
        }
        tracing::warn!(
            attempt,
            %organisation_id,
            "Auth code collision, redrawing"
        );
    }
    Err(FuelAuthError::CodeSpaceExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length() {
        for _ in 0..100 {
            assert_eq!(generate_auth_code().len(), AUTH_CODE_LENGTH);
        }
    }

    #[test]
    fn test_code_uses_only_alphabet_characters() {
        for _ in 0..1000 {
            let code = generate_auth_code();
            for c in code.bytes() {
                assert!(
                    AUTH_CODE_ALPHABET.contains(&c),
                    "unexpected character {:?} in code {code}",
                    c as char
                );
            }
        }
    }

    #[test]
    fn test_alphabet_excludes_ambiguous_characters() {
        for ambiguous in b"0O1IL" {
            assert!(
                !AUTH_CODE_ALPHABET.contains(ambiguous),
                "alphabet must not contain {:?}",
                *ambiguous as char
            );
        }
    }

    #[test]
    fn test_codes_are_not_constant() {
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| generate_auth_code()).collect();
        assert!(codes.len() > 1, "50 draws produced a single code");
    }
}
