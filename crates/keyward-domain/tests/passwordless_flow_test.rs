//! Integration tests driving full authentication flows through the port
//! traits with in-memory adapters and a deterministic clock.
//!
//! These mirror how an orchestrating service uses the core: load or create
//! an aggregate, invoke one operation, drain events, save, publish.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use keyward_core::{AttemptId, ChallengeId, Clock, FixedClock, IdentityId, MfaSessionId};
use keyward_domain::ports::{ChallengeDelivery, EventPublisher, PasswordlessChallengeRepository};
use keyward_domain::types::{
    generate_numeric_code, AuthMethod, ChallengeChannel, ChallengeSecret, Destination,
};
use keyward_domain::{
    AuthDomainError, AuthenticationAttempt, MfaChallenge, MfaChallengeType, MfaSession,
    PasswordlessChallenge, RecordedEvent, Result,
};
use parking_lot::Mutex;

#[derive(Default)]
struct InMemoryChallengeRepo {
    challenges: Mutex<HashMap<ChallengeId, PasswordlessChallenge>>,
}

#[async_trait]
impl PasswordlessChallengeRepository for InMemoryChallengeRepo {
    async fn find_by_id(&self, id: ChallengeId) -> Result<Option<PasswordlessChallenge>> {
        Ok(self.challenges.lock().get(&id).cloned())
    }

    async fn save(&self, challenge: &PasswordlessChallenge) -> Result<()> {
        self.challenges
            .lock()
            .insert(challenge.id(), challenge.clone());
        Ok(())
    }
}

#[derive(Default)]
struct CollectingPublisher {
    published: Mutex<Vec<RecordedEvent>>,
}

#[async_trait]
impl EventPublisher for CollectingPublisher {
    async fn publish(&self, events: &[RecordedEvent]) -> Result<()> {
        self.published.lock().extend_from_slice(events);
        Ok(())
    }
}

#[derive(Default)]
struct RecordingDelivery {
    deliveries: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ChallengeDelivery for RecordingDelivery {
    async fn deliver(&self, destination: &Destination, secret: &ChallengeSecret) -> Result<()> {
        self.deliveries
            .lock()
            .push((destination.as_str().to_string(), secret.expose().to_string()));
        Ok(())
    }
}

#[tokio::test]
async fn test_full_passwordless_flow() {
    let clock = FixedClock::default();
    let repo = Arc::new(InMemoryChallengeRepo::default());
    let publisher = Arc::new(CollectingPublisher::default());
    let delivery = Arc::new(RecordingDelivery::default());

    let identity_id = IdentityId::new();
    let destination = Destination::new(ChallengeChannel::Email, "user@example.com").unwrap();
    let code = generate_numeric_code();

    // Use case 1: start an attempt and issue a challenge.
    let mut attempt = AuthenticationAttempt::start(
        AttemptId::new(),
        AuthMethod::Passwordless,
        Some(identity_id),
        clock.now(),
    );

    let issued_at = clock.now();
    let mut challenge = PasswordlessChallenge::issue(
        ChallengeId::new(),
        Some(identity_id),
        ChallengeChannel::Email,
        destination.clone(),
        ChallengeSecret::new(code.clone()).unwrap(),
        issued_at,
        issued_at + Duration::seconds(300),
    )
    .unwrap();
    let challenge_id = challenge.id();

    repo.save(&challenge).await.unwrap();
    delivery
        .deliver(challenge.destination(), challenge.secret())
        .await
        .unwrap();

    let mut batch = attempt.take_events();
    batch.extend(challenge.take_events());
    publisher.publish(&batch).await.unwrap();

    // The secret went out of band, not into any event payload
    let deliveries = delivery.deliveries.lock();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].0, "user@example.com");
    assert_eq!(deliveries[0].1, code);
    drop(deliveries);

    for event in publisher.published.lock().iter() {
        let json = serde_json::to_string(event).unwrap();
        assert!(!json.contains(&code));
    }

    // Use case 2: the user submits the code a minute later.
    clock.advance(Duration::seconds(60));
    let mut loaded = repo
        .find_by_id(challenge_id)
        .await
        .unwrap()
        .ok_or(AuthDomainError::NotFound {
            resource: "PasswordlessChallenge",
            id: Some(challenge_id.to_string()),
        })
        .unwrap();

    loaded.verify(&code, clock.now()).unwrap();
    attempt.succeed(clock.now()).unwrap();

    repo.save(&loaded).await.unwrap();
    let mut batch = loaded.take_events();
    batch.extend(attempt.take_events());
    publisher.publish(&batch).await.unwrap();

    let published = publisher.published.lock();
    let types: Vec<&str> = published.iter().map(|e| e.event.event_type()).collect();
    assert_eq!(
        types,
        vec![
            "authentication_started",
            "auth.passwordless.challenge_created",
            "auth.passwordless.challenge_verified",
            "authentication_succeeded",
        ]
    );
    drop(published);

    // The persisted challenge is terminal; replaying the code fails.
    let mut replayed = repo.find_by_id(challenge_id).await.unwrap().unwrap();
    let err = replayed.verify(&code, clock.now()).unwrap_err();
    assert!(matches!(err, AuthDomainError::AlreadyUsed { .. }));
}

#[tokio::test]
async fn test_expired_challenge_fails_the_attempt() {
    let clock = FixedClock::default();
    let repo = Arc::new(InMemoryChallengeRepo::default());
    let publisher = Arc::new(CollectingPublisher::default());

    let mut attempt = AuthenticationAttempt::start(
        AttemptId::new(),
        AuthMethod::Passwordless,
        None,
        clock.now(),
    );

    let issued_at = clock.now();
    let challenge = PasswordlessChallenge::issue(
        ChallengeId::new(),
        None,
        ChallengeChannel::Sms,
        Destination::new(ChallengeChannel::Sms, "+14155550100").unwrap(),
        ChallengeSecret::new("271828").unwrap(),
        issued_at,
        issued_at + Duration::seconds(300),
    )
    .unwrap();
    let challenge_id = challenge.id();
    repo.save(&challenge).await.unwrap();

    // The code arrives too late.
    clock.advance(Duration::seconds(301));
    let mut loaded = repo.find_by_id(challenge_id).await.unwrap().unwrap();
    let err = loaded.verify("271828", clock.now()).unwrap_err();
    assert!(matches!(err, AuthDomainError::Expired { .. }));

    // The orchestrator translates the expiry into a failed attempt.
    attempt.fail("challenge expired", clock.now()).unwrap();
    publisher.publish(&attempt.take_events()).await.unwrap();

    let published = publisher.published.lock();
    assert_eq!(
        published.last().unwrap().event.event_type(),
        "authentication_failed"
    );
}

#[tokio::test]
async fn test_mfa_session_retry_flow() {
    let clock = FixedClock::default();
    let identity_id = IdentityId::new();

    let mut session =
        MfaSession::start(MfaSessionId::new(), identity_id, 3, clock.now()).unwrap();
    session.take_events();

    let issued_at = clock.now();
    let challenge = MfaChallenge::new(
        ChallengeId::new(),
        identity_id,
        MfaChallengeType::EmailOtp,
        issued_at,
        issued_at + Duration::seconds(120),
    )
    .unwrap();
    session.issue_challenge(challenge, clock.now()).unwrap();

    // Two wrong submissions burn attempts but leave the session unverified.
    session.mark_attempt().unwrap();
    session.mark_attempt().unwrap();
    assert!(!session.is_verified());
    assert_eq!(session.attempts_remaining(), 1);

    // A fresh challenge cannot be issued while the first is live.
    let blocked = MfaChallenge::new(
        ChallengeId::new(),
        identity_id,
        MfaChallengeType::EmailOtp,
        clock.now(),
        clock.now() + Duration::seconds(120),
    )
    .unwrap();
    assert!(matches!(
        session.issue_challenge(blocked, clock.now()),
        Err(AuthDomainError::ActiveChallengeExists { .. })
    ));

    // Third submission matches; the session verifies and consumes the
    // challenge working set.
    session.mark_attempt().unwrap();
    session.verify(clock.now()).unwrap();
    assert!(session.is_verified());
    assert!(session.active_challenge(clock.now()).is_none());

    // No attempts remain after verification either way.
    assert!(matches!(
        session.mark_attempt(),
        Err(AuthDomainError::AttemptsExceeded { used: 4, max: 3, .. })
    ));
}
