//! Collision resolution for generated codes.
//!
//! Truncating to eight base-62 characters maps a larger keyspace onto a smaller
//! one, so two URLs can land on the same candidate. The resolver walks the seed
//! forward (`seed + 1`, `seed + 2`, ...) re-encoding each time until the store
//! reports the candidate as free or already owned by the same URL.
//!
//! Truncated candidates of different attempts may coincide; the walk is driven
//! only by what the store reports, never by uniqueness of the full encoding.

use std::future::Future;

use tracing::{debug, error};

use crate::error::AppError;
use crate::utils::code_generator::{GeneratedCode, candidate_for};

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub code: String,
    /// Perturbation applied to the seed; 0 means the original candidate won.
    pub attempt: u32,
}

/// Returns the candidate code for a given perturbation of the seed.
pub fn candidate_at(generated: &GeneratedCode, attempt: u32) -> String {
    if attempt == 0 {
        return generated.code.clone();
    }

    candidate_for(generated.seed.wrapping_add(u64::from(attempt)))
}

/// Resolves `generated` into a code that `url` may hold.
///
/// Attempts run from `start_attempt` up to, but excluding, `max_attempts`.
/// `exists(code, url)` must answer whether the store holds `code` for a URL other
/// than `url`; it is called once per attempt, in order.
///
/// Resuming from a later `start_attempt` lets callers continue the walk after the
/// store rejected an insert that lost a race.
///
/// # Errors
///
/// Returns [`AppError::ExhaustedRetries`] when every attempt collided, and
/// propagates any error returned by `exists` unchanged.
pub async fn resolve_collision<'a, F, Fut>(
    generated: &GeneratedCode,
    url: &'a str,
    start_attempt: u32,
    max_attempts: u32,
    mut exists: F,
) -> Result<Resolution, AppError>
where
    F: FnMut(String, &'a str) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    for attempt in start_attempt..max_attempts {
        let code = candidate_at(generated, attempt);

        if !exists(code.clone(), url).await? {
            return Ok(Resolution { code, attempt });
        }

        debug!(code = %code, attempt, "Code collision, perturbing seed");
        metrics::counter!("dwarf_code_collisions_total").increment(1);
    }

    error!(url, max_attempts, "Collision resolution exhausted");
    Err(AppError::exhausted_retries(max_attempts, url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::code_generator::generate_code;
    use serde_json::json;

    const URL: &str = "https://dwarf.io/test-url";

    #[test]
    fn test_candidate_at_zero_is_generated_code() {
        let generated = generate_code(URL);
        assert_eq!(candidate_at(&generated, 0), generated.code);
    }

    #[test]
    fn test_candidate_at_follows_seed() {
        let generated = generate_code(URL);
        assert_eq!(candidate_at(&generated, 3), candidate_for(generated.seed + 3));
    }

    #[test]
    fn test_candidate_at_honours_given_code() {
        let generated = GeneratedCode {
            code: "given".to_string(),
            seed: 62,
        };

        assert_eq!(candidate_at(&generated, 0), "given");
        assert_eq!(candidate_at(&generated, 1), "11");
    }

    #[tokio::test]
    async fn test_free_candidate_is_returned_immediately() {
        let generated = generate_code(URL);
        let mut calls = Vec::new();

        let resolution = resolve_collision(&generated, URL, 0, 10, |code, _| {
            calls.push(code);
            async { Ok(false) }
        })
        .await
        .unwrap();

        assert_eq!(resolution.code, generated.code);
        assert_eq!(resolution.attempt, 0);
        assert_eq!(calls, vec![generated.code.clone()]);
    }

    #[tokio::test]
    async fn test_third_candidate_after_two_collisions() {
        let generated = generate_code(URL);
        let first = candidate_at(&generated, 0);
        let second = candidate_at(&generated, 1);
        let third = candidate_at(&generated, 2);

        let mut calls = Vec::new();
        let taken = [first.clone(), second.clone()];

        let resolution = resolve_collision(&generated, URL, 0, 10, |code, url| {
            assert_eq!(url, URL);
            let hit = taken.contains(&code);
            calls.push(code);
            async move { Ok(hit) }
        })
        .await
        .unwrap();

        assert_eq!(resolution.code, third);
        assert_eq!(resolution.attempt, 2);
        assert_eq!(calls, vec![first, second, third]);
    }

    #[tokio::test]
    async fn test_resume_from_later_attempt() {
        let generated = generate_code(URL);

        let resolution = resolve_collision(&generated, URL, 5, 10, |_, _| async { Ok(false) })
            .await
            .unwrap();

        assert_eq!(resolution.attempt, 5);
        assert_eq!(resolution.code, candidate_for(generated.seed + 5));
    }

    #[tokio::test]
    async fn test_store_always_colliding_exhausts() {
        let generated = generate_code(URL);
        let mut calls = 0;

        let result = resolve_collision(&generated, URL, 0, 4, |_, _| {
            calls += 1;
            async { Ok(true) }
        })
        .await;

        assert!(matches!(result, Err(AppError::ExhaustedRetries { .. })));
        assert_eq!(calls, 4);
    }

    #[tokio::test]
    async fn test_zero_budget_exhausts_without_querying() {
        let generated = generate_code(URL);
        let mut calls = 0;

        let result = resolve_collision(&generated, URL, 0, 0, |_, _| {
            calls += 1;
            async { Ok(false) }
        })
        .await;

        assert!(matches!(result, Err(AppError::ExhaustedRetries { .. })));
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let generated = generate_code(URL);

        let result = resolve_collision(&generated, URL, 0, 10, |_, _| async {
            Err(AppError::internal("Database error", json!({})))
        })
        .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }
}
