//! Bulk creation of throwaway accounts for development environments.

use std::collections::HashSet;

use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::FirstName;

use crate::client::{AdminClient, ClientError};

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub count: usize,
    /// Password given to every seeded account.
    pub password: String,
}

impl SeedConfig {
    pub fn new(count: usize, password: impl Into<String>) -> Self {
        Self {
            count,
            password: password.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub failed: Vec<(String, ClientError)>,
}

/// Generates `count` distinct addresses shaped like `first.name.N@example.com`.
pub fn generate_emails(count: usize) -> Vec<String> {
    let mut seen = HashSet::with_capacity(count);
    let mut emails = Vec::with_capacity(count);

    while emails.len() < count {
        let first: String = FirstName().fake();
        let safe: String = SafeEmail().fake();
        let domain = safe.split('@').nth(1).unwrap_or("example.com").to_string();
        let email = format!(
            "{}.{}@{}",
            first.to_lowercase(),
            emails.len() + 1,
            domain
        );
        if seen.insert(email.clone()) {
            emails.push(email);
        }
    }
    emails
}

/// Creates the accounts one at a time, collecting failures instead of
/// stopping at the first one.
pub async fn seed_accounts(client: &AdminClient, config: &SeedConfig) -> SeedReport {
    let mut report = SeedReport::default();

    for email in generate_emails(config.count) {
        match client.create_user(&email, &config.password).await {
            Ok(uid) => {
                println!("  + {} ({})", email, uid);
                report.created.push(uid);
            }
            Err(err) => {
                eprintln!("  ! {}: {}", email, err);
                report.failed.push((email, err));
            }
        }
    }
    report
}
