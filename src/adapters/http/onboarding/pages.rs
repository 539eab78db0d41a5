//! HTML pages served to partners.

use crate::domain::onboarding::{AccountId, CompletionStatus};

/// Landing page.
pub fn index_page() -> String {
    r#"<!DOCTYPE html>
<html>
  <head><title>Partner Onboarding</title></head>
  <body>
    <h1>Stripe Partner Onboarding Server</h1>
    <p>This server handles redirect URLs for Stripe Connect onboarding.</p>
    <p>To create a new partner account, run the <code>create-account-link</code> tool or POST to <code>/stripe/onboard</code>.</p>
  </body>
</html>
"#
    .to_string()
}

/// Status page shown when a partner returns from hosted onboarding.
pub fn completion_page(account_id: &AccountId, status: &CompletionStatus) -> String {
    let account_id = account_id.as_str();
    if status.complete {
        format!(
            r#"<!DOCTYPE html>
<html>
  <head><title>Onboarding Complete</title></head>
  <body>
    <h1>Onboarding Complete!</h1>
    <p>Your partner account is now fully set up.</p>
    <p>Account ID: {account_id}</p>
  </body>
</html>
"#
        )
    } else {
        format!(
            r#"<!DOCTYPE html>
<html>
  <head><title>Onboarding In Progress</title></head>
  <body>
    <h1>Onboarding In Progress</h1>
    <p>Your partner still needs to complete some requirements.</p>
    <p>They can continue onboarding later from their dashboard.</p>
    <p>Outstanding requirements: {outstanding}</p>
    <p>Account ID: {account_id}</p>
  </body>
</html>
"#,
            outstanding = status.outstanding()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(currently_due: &[&str]) -> CompletionStatus {
        CompletionStatus {
            complete: currently_due.is_empty(),
            currently_due: currently_due.iter().map(|s| s.to_string()).collect(),
            eventually_due: vec![],
        }
    }

    #[test]
    fn complete_page_shows_account() {
        let page = completion_page(&AccountId::new("acct_123").unwrap(), &status(&[]));
        assert!(page.contains("Onboarding Complete!"));
        assert!(page.contains("Account ID: acct_123"));
    }

    #[test]
    fn in_progress_page_counts_requirements() {
        let page = completion_page(
            &AccountId::new("acct_123").unwrap(),
            &status(&["individual.id_number"]),
        );
        assert!(page.contains("Onboarding In Progress"));
        assert!(page.contains("Outstanding requirements: 1"));
    }
}
