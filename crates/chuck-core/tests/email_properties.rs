//! Property-based tests for email validation in the session flows

use std::sync::Arc;

use chuck_core::validation::is_valid_email;
use chuck_core::{AuthError, CredentialStore, SessionService};
use proptest::prelude::*;

/// Strings that can never be an email address
fn arb_non_email() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-zA-Z0-9 .+_%\-]{0,40}").unwrap()
}

fn arb_email() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-z0-9._]{1,20}@[a-z0-9]{1,12}\.[a-z]{2,6}").unwrap()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    /// Property: anything without an '@' is rejected by both flows with the format error
    #[test]
    fn non_email_is_rejected(email in arb_non_email(), password in "[a-z]{6,12}") {
        prop_assert!(!is_valid_email(&email));

        let (login, register) = runtime().block_on(async {
            let session = SessionService::new(Arc::new(CredentialStore::in_memory()));
            let login = session.login(&email, &password).await;
            let register = session.register(&email, &password, &password).await;
            (login, register)
        });

        prop_assert!(matches!(login, Err(AuthError::InvalidEmailFormat)));
        prop_assert!(matches!(register, Err(AuthError::InvalidEmailFormat)));
    }

    /// Property: a registered pair always logs in
    #[test]
    fn register_then_login(email in arb_email(), password in "[a-zA-Z0-9]{6,24}") {
        let outcome = runtime().block_on(async {
            let session = SessionService::new(Arc::new(CredentialStore::in_memory()));
            session.register(&email, &password, &password).await?;
            session.logout().await;
            session.login(&email, &password).await
        });

        prop_assert!(outcome.is_ok(), "{:?}", outcome);
    }
}
