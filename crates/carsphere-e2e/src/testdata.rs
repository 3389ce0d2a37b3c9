//! Test-data collaborators: the user-listing endpoint and generated
//! registration credentials.

use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use crate::result::{HarnessError, HarnessResult};

/// Password used for generated registration accounts
pub const REGISTRATION_PASSWORD: &str = "1234";

/// Fetch the raw user listing from the application's `/get-users` endpoint.
///
/// The endpoint serves the listing as plain text; callers check candidate
/// names against it by containment rather than parsing a structure out of it.
pub async fn fetch_existing_users(base_url: &str) -> HarnessResult<String> {
    let url = format!("{}/get-users", base_url.trim_end_matches('/'));
    let response = reqwest::get(&url)
        .await
        .map_err(|err| HarnessError::TestData {
            message: format!("GET {url} failed: {err}"),
        })?;
    let listing = response.text().await.map_err(|err| HarnessError::TestData {
        message: format!("GET {url} returned an unreadable body: {err}"),
    })?;
    debug!(bytes = listing.len(), "fetched existing users");
    Ok(listing)
}

/// Generate a username of the form `Auto_usernameNNN` that does not occur
/// anywhere in the fetched user listing.
#[must_use]
pub fn random_username(existing_users: &str) -> String {
    loop {
        let candidate = format!("Auto_username{}", three_digits());
        if !existing_users.contains(&candidate) {
            return candidate;
        }
    }
}

/// Verify the upload fixture exists before a scenario depends on it.
pub fn ensure_fixture(path: &Path) -> HarnessResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(HarnessError::TestData {
            message: format!("upload fixture missing: {}", path.display()),
        })
    }
}

fn three_digits() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    bytes
        .iter()
        .take(3)
        .map(|byte| char::from(b'0' + byte % 10))
        .collect()
}
