//! Use-case level tests against in-memory stores
//!
//! These cover the behavior the HTTP layer relies on: single winner
//! under concurrent duplicate sign-ups, admission counting, credential
//! indistinguishability and degraded sign-up outcomes.

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use kernel::id::SessionId;
    use uuid::Uuid;

    use crate::domain::entity::{member::Member, session::Session};
    use crate::domain::repository::{MemberRepository, SessionRepository};
    use crate::error::{GatewayError, GatewayResult};

    #[derive(Default)]
    pub struct MemState {
        pub members: Vec<Member>,
        pub sessions: HashMap<Uuid, Session>,
    }

    /// In-memory store with the same uniqueness semantics as the
    /// database constraints: insert is atomic and decides duplicates.
    #[derive(Clone, Default)]
    pub struct MemRepo {
        pub state: Arc<Mutex<MemState>>,
    }

    impl MemRepo {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn member_count(&self) -> usize {
            self.state.lock().unwrap().members.len()
        }

        pub fn session_count(&self) -> usize {
            self.state.lock().unwrap().sessions.len()
        }
    }

    impl MemberRepository for MemRepo {
        async fn insert(&self, member: &Member) -> GatewayResult<()> {
            let mut state = self.state.lock().unwrap();

            let collision = state.members.iter().any(|m| {
                m.email.as_str() == member.email.as_str()
                    || m.university_id.as_i64() == member.university_id.as_i64()
            });
            if collision {
                return Err(GatewayError::DuplicateIdentity);
            }

            state.members.push(member.clone());
            Ok(())
        }

        async fn find_by_email(&self, email: &str) -> GatewayResult<Option<Member>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .members
                .iter()
                .find(|m| m.email.as_str() == email)
                .cloned())
        }

        async fn exists_by_email(&self, email: &str) -> GatewayResult<bool> {
            let state = self.state.lock().unwrap();
            Ok(state.members.iter().any(|m| m.email.as_str() == email))
        }
    }

    impl SessionRepository for MemRepo {
        async fn create(&self, session: &Session) -> GatewayResult<()> {
            let mut state = self.state.lock().unwrap();
            state
                .sessions
                .insert(session.session_id.into_uuid(), session.clone());
            Ok(())
        }

        async fn find_by_id(&self, session_id: SessionId) -> GatewayResult<Option<Session>> {
            let state = self.state.lock().unwrap();
            Ok(state.sessions.get(session_id.as_uuid()).cloned())
        }

        async fn delete(&self, session_id: SessionId) -> GatewayResult<()> {
            let mut state = self.state.lock().unwrap();
            state.sessions.remove(session_id.as_uuid());
            Ok(())
        }

        async fn delete_expired(&self) -> GatewayResult<u64> {
            let mut state = self.state.lock().unwrap();
            let before = state.sessions.len();
            state.sessions.retain(|_, s| !s.is_expired());
            Ok((before - state.sessions.len()) as u64)
        }
    }

    /// Session store whose writes always fail
    #[derive(Clone, Default)]
    pub struct FailingSessionRepo;

    impl SessionRepository for FailingSessionRepo {
        async fn create(&self, _session: &Session) -> GatewayResult<()> {
            Err(GatewayError::StoreUnavailable)
        }

        async fn find_by_id(&self, _session_id: SessionId) -> GatewayResult<Option<Session>> {
            Err(GatewayError::StoreUnavailable)
        }

        async fn delete(&self, _session_id: SessionId) -> GatewayResult<()> {
            Err(GatewayError::StoreUnavailable)
        }

        async fn delete_expired(&self) -> GatewayResult<u64> {
            Err(GatewayError::StoreUnavailable)
        }
    }
}

#[cfg(test)]
mod sign_up_tests {
    use std::sync::Arc;

    use platform::password::WorkFactor;
    use platform::rate_limit::{MemoryRateLimitStore, RateLimitConfig};

    use super::support::{FailingSessionRepo, MemRepo};
    use crate::application::config::GatewayConfig;
    use crate::application::sign_up::{SessionOutcome, SignUpInput, SignUpUseCase};
    use crate::error::GatewayError;

    fn test_config() -> Arc<GatewayConfig> {
        Arc::new(GatewayConfig {
            work_factor: WorkFactor::fast_insecure(),
            rate_limit: RateLimitConfig::new(100, 60),
            session_secret: [1u8; 32],
            ..GatewayConfig::default()
        })
    }

    fn input(email: &str, university_id: i64) -> SignUpInput {
        SignUpInput {
            full_name: "Ada Lovelace".to_string(),
            email: email.to_string(),
            university_id,
            password: "CorrectHorse9!".to_string(),
            university_card_ref: "cards/ada.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_creates_member_and_session() {
        let repo = MemRepo::new();
        let use_case = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            test_config(),
        );

        let output = use_case
            .execute(input("ada@university.edu", 1001), "1.2.3.4", None)
            .await
            .unwrap();

        assert!(matches!(output.session, SessionOutcome::Established(_)));
        assert_eq!(repo.member_count(), 1);
        assert_eq!(repo.session_count(), 1);
    }

    #[tokio::test]
    async fn test_stored_digest_is_not_plaintext() {
        let repo = MemRepo::new();
        let use_case = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            test_config(),
        );

        use_case
            .execute(input("ada@university.edu", 1001), "1.2.3.4", None)
            .await
            .unwrap();

        let state = repo.state.lock().unwrap();
        let phc = state.members[0].password_digest.as_phc_string().to_string();
        assert!(phc.starts_with("$argon2id$"));
        assert!(!phc.contains("CorrectHorse9!"));
    }

    #[tokio::test]
    async fn test_duplicate_email_leaves_single_record() {
        let repo = MemRepo::new();
        let use_case = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            test_config(),
        );

        use_case
            .execute(input("ada@university.edu", 1001), "1.2.3.4", None)
            .await
            .unwrap();

        let err = use_case
            .execute(input("ada@university.edu", 1002), "1.2.3.4", None)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::DuplicateIdentity));
        assert_eq!(repo.member_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_sign_up_single_winner() {
        let repo = MemRepo::new();
        let limiter = Arc::new(MemoryRateLimitStore::new());
        let config = test_config();

        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = repo.clone();
            let limiter = limiter.clone();
            let config = config.clone();

            handles.push(tokio::spawn(async move {
                let use_case = SignUpUseCase::new(
                    Arc::new(repo.clone()),
                    Arc::new(repo),
                    limiter,
                    config,
                );
                use_case
                    .execute(
                        input("race@university.edu", 2000 + i),
                        // Distinct caller keys so admission is not the gate
                        &format!("10.0.0.{i}"),
                        None,
                    )
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert!(matches!(e, GatewayError::DuplicateIdentity)),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.member_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_password_rejected_before_persistence() {
        let repo = MemRepo::new();
        let use_case = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            test_config(),
        );

        let mut bad = input("ada@university.edu", 1001);
        bad.password = "short".to_string();

        let err = use_case.execute(bad, "1.2.3.4", None).await.unwrap_err();
        assert!(matches!(err, GatewayError::PasswordPolicy(_)));
        assert_eq!(repo.member_count(), 0);
    }

    #[tokio::test]
    async fn test_session_failure_keeps_account() {
        let repo = MemRepo::new();
        let use_case = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(FailingSessionRepo),
            Arc::new(MemoryRateLimitStore::new()),
            test_config(),
        );

        let output = use_case
            .execute(input("ada@university.edu", 1001), "1.2.3.4", None)
            .await
            .unwrap();

        // Account exists even though no session could be issued
        assert!(matches!(output.session, SessionOutcome::Failed(_)));
        assert_eq!(repo.member_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_in_works_after_degraded_sign_up() {
        let repo = MemRepo::new();
        let config = test_config();

        let sign_up = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(FailingSessionRepo),
            Arc::new(MemoryRateLimitStore::new()),
            config.clone(),
        );

        sign_up
            .execute(input("ada@university.edu", 1001), "1.2.3.4", None)
            .await
            .unwrap();

        // Same credentials, healthy session store
        use crate::application::sign_in::{SignInInput, SignInUseCase};
        let sign_in = SignInUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            config,
        );

        let issued = sign_in
            .execute(
                SignInInput {
                    email: "ada@university.edu".to_string(),
                    password: "CorrectHorse9!".to_string(),
                },
                "1.2.3.4",
                None,
            )
            .await
            .unwrap();

        assert!(issued.expires_at_ms > 0);
        assert_eq!(repo.session_count(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_sign_up_burns_budget() {
        let repo = MemRepo::new();
        let config = Arc::new(GatewayConfig {
            work_factor: WorkFactor::fast_insecure(),
            rate_limit: RateLimitConfig::new(2, 60),
            session_secret: [1u8; 32],
            ..GatewayConfig::default()
        });

        let use_case = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            config,
        );

        // Two rejected attempts still count against the budget
        for _ in 0..2 {
            let mut bad = input("ada@university.edu", 1001);
            bad.password = "short".to_string();
            let _ = use_case.execute(bad, "9.9.9.9", None).await;
        }

        let err = use_case
            .execute(input("ada@university.edu", 1001), "9.9.9.9", None)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::RateLimited { .. }));
        assert_eq!(repo.member_count(), 0);
    }
}

#[cfg(test)]
mod sign_in_tests {
    use std::sync::Arc;

    use platform::password::WorkFactor;
    use platform::rate_limit::{MemoryRateLimitStore, RateLimitConfig};

    use super::support::MemRepo;
    use crate::application::config::GatewayConfig;
    use crate::application::sign_in::{SignInInput, SignInUseCase};
    use crate::application::sign_up::{SignUpInput, SignUpUseCase};
    use crate::error::GatewayError;

    fn test_config() -> Arc<GatewayConfig> {
        Arc::new(GatewayConfig {
            work_factor: WorkFactor::fast_insecure(),
            rate_limit: RateLimitConfig::new(5, 60),
            session_secret: [1u8; 32],
            ..GatewayConfig::default()
        })
    }

    async fn seeded_repo(config: Arc<GatewayConfig>) -> MemRepo {
        let repo = MemRepo::new();
        let use_case = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            config,
        );

        use_case
            .execute(
                SignUpInput {
                    full_name: "Ada Lovelace".to_string(),
                    email: "ada@university.edu".to_string(),
                    university_id: 1001,
                    password: "CorrectHorse9!".to_string(),
                    university_card_ref: "cards/ada.png".to_string(),
                },
                "seed",
                None,
            )
            .await
            .unwrap();

        repo
    }

    fn attempt(email: &str, password: &str) -> SignInInput {
        SignInInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_with_valid_credentials() {
        let config = test_config();
        let repo = seeded_repo(config.clone()).await;

        let use_case = SignInUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            config,
        );

        let issued = use_case
            .execute(attempt("ada@university.edu", "CorrectHorse9!"), "1.2.3.4", None)
            .await
            .unwrap();

        assert!(!issued.session_token.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_identical() {
        let config = test_config();
        let repo = seeded_repo(config.clone()).await;

        let use_case = SignInUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            config,
        );

        let unknown = use_case
            .execute(attempt("nobody@university.edu", "CorrectHorse9!"), "k", None)
            .await
            .unwrap_err();
        let wrong = use_case
            .execute(attempt("ada@university.edu", "WrongHorse9!"), "k", None)
            .await
            .unwrap_err();

        assert!(matches!(unknown, GatewayError::InvalidCredentials));
        assert!(matches!(wrong, GatewayError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_unknown_email_attempts_share_decoy_digest() {
        let config = test_config();
        let repo = seeded_repo(config.clone()).await;

        // Fresh use case per attempt, exactly as the HTTP layer does
        for _ in 0..2 {
            let use_case = SignInUseCase::new(
                Arc::new(repo.clone()),
                Arc::new(repo.clone()),
                Arc::new(MemoryRateLimitStore::new()),
                config.clone(),
            );
            let _ = use_case
                .execute(attempt("ghost@university.edu", "CorrectHorse9!"), "k2", None)
                .await;
        }

        // The decoy was hashed once and lives on the shared config;
        // later lookups return that same instance instead of rehashing.
        let first = config.decoy_digest().unwrap();
        assert!(std::ptr::eq(first, config.decoy_digest().unwrap()));
    }

    #[tokio::test]
    async fn test_sixth_attempt_in_window_rejected() {
        let config = test_config();
        let repo = seeded_repo(config.clone()).await;

        let use_case = SignInUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            config,
        );

        // Five failures are admitted and counted
        for _ in 0..5 {
            let err = use_case
                .execute(attempt("ada@university.edu", "WrongHorse9!"), "2.2.2.2", None)
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::InvalidCredentials));
        }

        // The sixth attempt is rejected even with correct credentials
        let err = use_case
            .execute(attempt("ada@university.edu", "CorrectHorse9!"), "2.2.2.2", None)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_callers_have_independent_budgets() {
        let config = test_config();
        let repo = seeded_repo(config.clone()).await;

        let use_case = SignInUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            config,
        );

        for _ in 0..5 {
            let _ = use_case
                .execute(attempt("ada@university.edu", "WrongHorse9!"), "3.3.3.3", None)
                .await;
        }

        // A different caller is unaffected
        let issued = use_case
            .execute(attempt("ada@university.edu", "CorrectHorse9!"), "4.4.4.4", None)
            .await;
        assert!(issued.is_ok());
    }
}

#[cfg(test)]
mod session_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use platform::password::WorkFactor;
    use platform::rate_limit::{MemoryRateLimitStore, RateLimitConfig};

    use super::support::MemRepo;
    use crate::application::check_session::CheckSessionUseCase;
    use crate::application::config::GatewayConfig;
    use crate::application::sign_out::SignOutUseCase;
    use crate::application::sign_up::{SessionOutcome, SignUpInput, SignUpUseCase};

    fn test_config(ttl: Duration) -> Arc<GatewayConfig> {
        Arc::new(GatewayConfig {
            work_factor: WorkFactor::fast_insecure(),
            rate_limit: RateLimitConfig::new(100, 60),
            session_secret: [1u8; 32],
            session_ttl: ttl,
            ..GatewayConfig::default()
        })
    }

    async fn sign_up_token(repo: &MemRepo, config: Arc<GatewayConfig>) -> String {
        let use_case = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(MemoryRateLimitStore::new()),
            config,
        );

        let output = use_case
            .execute(
                SignUpInput {
                    full_name: "Ada Lovelace".to_string(),
                    email: "ada@university.edu".to_string(),
                    university_id: 1001,
                    password: "CorrectHorse9!".to_string(),
                    university_card_ref: "cards/ada.png".to_string(),
                },
                "seed",
                None,
            )
            .await
            .unwrap();

        match output.session {
            SessionOutcome::Established(issued) => issued.session_token,
            SessionOutcome::Failed(e) => panic!("session should be issued: {e}"),
        }
    }

    #[tokio::test]
    async fn test_fresh_session_is_valid() {
        let repo = MemRepo::new();
        let config = test_config(Duration::from_secs(3600));
        let token = sign_up_token(&repo, config.clone()).await;

        let check = CheckSessionUseCase::new(Arc::new(repo.clone()), config);
        assert!(check.is_valid(&token).await);

        let info = check.execute(&token).await.unwrap();
        assert!(info.expires_at_ms > 0);
    }

    #[tokio::test]
    async fn test_expired_session_is_deleted_on_check() {
        let repo = MemRepo::new();
        let config = test_config(Duration::from_millis(0));
        let token = sign_up_token(&repo, config.clone()).await;

        let check = CheckSessionUseCase::new(Arc::new(repo.clone()), config);
        assert!(!check.is_valid(&token).await);
        assert_eq!(repo.session_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_out_is_idempotent() {
        let repo = MemRepo::new();
        let config = test_config(Duration::from_secs(3600));
        let token = sign_up_token(&repo, config.clone()).await;

        let sign_out = SignOutUseCase::new(Arc::new(repo.clone()), config.clone());
        sign_out.execute(&token).await.unwrap();
        assert_eq!(repo.session_count(), 0);

        // Second sign-out and garbage tokens are no-op successes
        sign_out.execute(&token).await.unwrap();
        sign_out.execute("garbage").await.unwrap();
    }

    #[tokio::test]
    async fn test_forged_token_rejected() {
        let repo = MemRepo::new();
        let config = test_config(Duration::from_secs(3600));
        let token = sign_up_token(&repo, config.clone()).await;

        let other_secret = Arc::new(GatewayConfig {
            session_secret: [9u8; 32],
            ..(*config).clone()
        });

        let check = CheckSessionUseCase::new(Arc::new(repo.clone()), other_secret);
        assert!(!check.is_valid(&token).await);

        // Session itself is untouched
        assert_eq!(repo.session_count(), 1);
    }
}
