//! Email + one-time-code login.
//!
//! `start_auth` gets an OTP sent, registering the account first when the
//! email is unknown. `verify_otp` exchanges the code for a session.

use tracing::{debug, info};

use super::{EventSink, FlowEvent};
use crate::api::{ApiError, GridApi, UserContext};
use crate::auth::{Session, SessionSecrets};
use crate::error::FlowError;
use crate::utils::{validate_email, validate_otp};

/// Which completion call the OTP goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPath {
    ExistingUser,
    NewUser,
}

/// An OTP has been (or may have been) sent to `email`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAuth {
    pub email: String,
    pub path: AuthPath,
}

#[derive(Debug)]
pub enum AuthStart {
    OtpSent(PendingAuth),
    /// Starting failed in a way that does not say whether the account
    /// exists. The caller decides whether to try a previously received code.
    Uncertain { pending: PendingAuth, error: ApiError },
}

fn otp_sent(email: String, path: AuthPath, events: &dyn EventSink) -> AuthStart {
    events.emit(FlowEvent::OtpSent {
        email: email.clone(),
        new_user: path == AuthPath::NewUser,
    });
    AuthStart::OtpSent(PendingAuth { email, path })
}

pub async fn start_auth<A: GridApi>(
    api: &A,
    email: &str,
    events: &dyn EventSink,
) -> Result<AuthStart, FlowError> {
    let email = validate_email(email)?;
    events.emit(FlowEvent::AuthStarted {
        email: email.clone(),
    });

    match api.init_auth(&email).await {
        Ok(()) => Ok(otp_sent(email, AuthPath::ExistingUser, events)),
        Err(e) if e.is_not_found() => {
            debug!(error = %e, "No account for email, registering");
            events.emit(FlowEvent::RegisteringAccount {
                email: email.clone(),
            });
            match api.create_account(&email).await {
                Ok(()) => Ok(otp_sent(email, AuthPath::NewUser, events)),
                Err(e) if e.is_already_exists() => {
                    debug!(error = %e, "Account already exists, retrying login");
                    events.emit(FlowEvent::RetryingLogin {
                        email: email.clone(),
                    });
                    api.init_auth(&email).await?;
                    Ok(otp_sent(email, AuthPath::ExistingUser, events))
                }
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => {
            debug!(error = %e, "Could not start authentication");
            events.emit(FlowEvent::AuthUncertain {
                reason: e.to_string(),
            });
            Ok(AuthStart::Uncertain {
                pending: PendingAuth {
                    email,
                    path: AuthPath::ExistingUser,
                },
                error: e,
            })
        }
    }
}

/// Complete a pending login with the code the user received.
///
/// Fresh session secrets are generated for every attempt.
pub async fn verify_otp<A: GridApi>(
    api: &A,
    pending: &PendingAuth,
    otp_code: &str,
    events: &dyn EventSink,
) -> Result<(Session, SessionSecrets), FlowError> {
    let otp_code = validate_otp(otp_code)?;

    let secrets = api.generate_session_secrets();
    events.emit(FlowEvent::SessionKeyGenerated {
        public_key: secrets.public_key().to_string(),
    });

    let user = UserContext::email(pending.email.clone());
    let session = match pending.path {
        AuthPath::NewUser => {
            api.complete_auth_and_create_account(&user, &otp_code, &secrets)
                .await?
        }
        AuthPath::ExistingUser => api.complete_auth(&user, &otp_code, &secrets).await?,
    };

    info!(address = ?session.address(), "Authenticated");
    events.emit(FlowEvent::Authenticated {
        address: session.account_address.clone(),
        user_id: session.user_id.clone(),
    });
    Ok((session, secrets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::{FakeGrid, ADDR1};
    use crate::flows::EventLog;
    use crate::utils::ValidationError;
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    fn not_found() -> ApiError {
        ApiError::Remote("User not found".into())
    }

    fn exists() -> ApiError {
        ApiError::Conflict("Account already exists".into())
    }

    #[tokio::test]
    async fn test_existing_user_path() {
        let api = FakeGrid::new();
        let events = EventLog::new();

        let start = start_auth(&api, "a@example.com", &events).await.unwrap();
        let pending = match start {
            AuthStart::OtpSent(p) => p,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(pending.path, AuthPath::ExistingUser);

        let (session, _secrets) = verify_otp(&api, &pending, "123456", &events).await.unwrap();
        assert_eq!(session.address(), Some(ADDR1));
        assert_eq!(
            api.calls(),
            vec!["init_auth", "generate_session_secrets", "complete_auth"]
        );
    }

    #[tokio::test]
    async fn test_new_user_registration_scenario() {
        let api = FakeGrid::new();
        api.init_auth_results.lock().unwrap().push_back(Err(not_found()));
        *api.complete_result.lock().unwrap() = Some(Ok(json!({
            "smart_account_address": ADDR1,
            "grid_user_id": "user-9"
        })));
        let events = EventLog::new();

        let start = start_auth(&api, "a@example.com", &events).await.unwrap();
        let AuthStart::OtpSent(pending) = start else {
            panic!("expected OTP to be sent");
        };
        assert_eq!(pending.path, AuthPath::NewUser);

        let (session, _) = verify_otp(&api, &pending, "123456", &events).await.unwrap();
        assert_eq!(session.address(), Some(ADDR1));
        assert_eq!(
            api.calls(),
            vec![
                "init_auth",
                "create_account",
                "generate_session_secrets",
                "complete_auth_and_create_account"
            ]
        );

        // Minimal user context: email only, signers left to Grid
        let users = api.users.lock().unwrap().clone();
        assert_eq!(users, vec![UserContext::email("a@example.com")]);

        let log = events.events();
        assert!(log.contains(&FlowEvent::RegisteringAccount {
            email: "a@example.com".into()
        }));
        assert_eq!(
            log.last(),
            Some(&FlowEvent::Authenticated {
                address: Some(ADDR1.into()),
                user_id: Some("user-9".into())
            })
        );
    }

    #[tokio::test]
    async fn test_already_exists_retries_login_once() {
        let api = FakeGrid::new();
        api.init_auth_results.lock().unwrap().push_back(Err(not_found()));
        api.create_account_results.lock().unwrap().push_back(Err(exists()));
        let events = EventLog::new();

        let start = start_auth(&api, "a@example.com", &events).await.unwrap();
        assert!(matches!(
            start,
            AuthStart::OtpSent(PendingAuth { path: AuthPath::ExistingUser, .. })
        ));
        assert_eq!(api.calls(), vec!["init_auth", "create_account", "init_auth"]);
    }

    #[tokio::test]
    async fn test_retry_failure_is_reported() {
        let api = FakeGrid::new();
        {
            let mut init = api.init_auth_results.lock().unwrap();
            init.push_back(Err(not_found()));
            init.push_back(Err(ApiError::ServerError("down".into())));
        }
        api.create_account_results.lock().unwrap().push_back(Err(exists()));
        let events = EventLog::new();

        let err = start_auth(&api, "a@example.com", &events).await.unwrap_err();
        assert!(matches!(err, FlowError::Api(ApiError::ServerError(_))));
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_registration_failure_aborts() {
        let api = FakeGrid::new();
        api.init_auth_results.lock().unwrap().push_back(Err(not_found()));
        api.create_account_results
            .lock()
            .unwrap()
            .push_back(Err(ApiError::Remote("email domain blocked".into())));
        let events = EventLog::new();

        let err = start_auth(&api, "a@example.com", &events).await.unwrap_err();
        assert!(matches!(err, FlowError::Api(ApiError::Remote(_))));
    }

    #[tokio::test]
    async fn test_unrecognized_error_is_uncertain() {
        let api = FakeGrid::new();
        api.init_auth_results
            .lock()
            .unwrap()
            .push_back(Err(ApiError::ServerError("boom".into())));
        let events = EventLog::new();

        let start = start_auth(&api, "a@example.com", &events).await.unwrap();
        match start {
            AuthStart::Uncertain { pending, error } => {
                assert_eq!(pending.path, AuthPath::ExistingUser);
                assert!(matches!(error, ApiError::ServerError(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(api.calls(), vec!["init_auth"]);
    }

    /// Log output captured in memory
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_expected_failures_are_quiet_at_warn() {
        let capture = LogCapture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let api = FakeGrid::new();
        {
            let mut init = api.init_auth_results.lock().unwrap();
            init.push_back(Err(not_found()));
            init.push_back(Err(ApiError::ServerError("boom".into())));
        }
        let events = EventLog::new();
        start_auth(&api, "a@example.com", &events).await.unwrap();
        start_auth(&api, "b@example.com", &events).await.unwrap();

        let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output, "");
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_api() {
        let api = FakeGrid::new();
        let events = EventLog::new();

        let err = start_auth(&api, "not-an-email", &events).await.unwrap_err();
        assert!(matches!(err, FlowError::Validation(ValidationError::InvalidEmail)));

        let pending = PendingAuth {
            email: "a@example.com".into(),
            path: AuthPath::ExistingUser,
        };
        let err = verify_otp(&api, &pending, "12ab", &events).await.unwrap_err();
        assert!(matches!(err, FlowError::Validation(ValidationError::InvalidOtp)));

        assert!(api.calls().is_empty());
        assert!(events.events().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_code_fails() {
        let api = FakeGrid::new();
        *api.complete_result.lock().unwrap() = Some(Err(ApiError::Remote("Invalid OTP".into())));
        let events = EventLog::new();
        let pending = PendingAuth {
            email: "a@example.com".into(),
            path: AuthPath::ExistingUser,
        };

        let err = verify_otp(&api, &pending, "000000", &events).await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed: Invalid OTP");
        assert!(!events
            .events()
            .iter()
            .any(|e| matches!(e, FlowEvent::Authenticated { .. })));
    }
}
