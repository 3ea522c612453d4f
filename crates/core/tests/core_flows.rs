//! End-to-end flows across the core services.

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use lovear_common::config::{BlindDateConfig, DiscoveryConfig, ModerationConfig};
use lovear_core::{
    AccountService, BlindDateService, CreateBlindDateInput, CreatePaymentInput, MatchingService,
    MessagingService, ModerationFilter, PaymentService, RegisterInput, SendMessageInput,
    StoryService,
};
use lovear_store::entities::{Gender, LookingFor, PaymentType, SwipeAction};
use lovear_store::{
    BlindDateRepository, MatchRepository, MemStore, MessageRepository, PaymentRepository,
    StoryRepository, SwipeRepository, UserRepository, ViolationRepository,
};
use rust_decimal_macros::dec;

struct App {
    accounts: AccountService,
    matching: MatchingService,
    messaging: MessagingService,
    blind_dates: BlindDateService,
    payments: PaymentService,
    stories: StoryService,
    violations: ViolationRepository,
}

fn app() -> App {
    let store = MemStore::new();
    let user_repo = UserRepository::new(store.clone());
    let accounts = AccountService::new(user_repo.clone());
    let match_repo = MatchRepository::new(store.clone());
    let violations = ViolationRepository::new(store.clone());

    App {
        accounts: accounts.clone(),
        matching: MatchingService::new(
            SwipeRepository::new(store.clone()),
            match_repo.clone(),
            user_repo.clone(),
            DiscoveryConfig::default(),
        ),
        messaging: MessagingService::new(
            MessageRepository::new(store.clone()),
            match_repo,
            user_repo.clone(),
            violations.clone(),
            accounts.clone(),
            ModerationFilter::new(false),
            ModerationConfig::default(),
        ),
        blind_dates: BlindDateService::new(
            BlindDateRepository::new(store.clone()),
            user_repo.clone(),
            accounts.clone(),
            BlindDateConfig::default(),
        ),
        payments: PaymentService::new(
            PaymentRepository::new(store.clone()),
            violations.clone(),
            user_repo.clone(),
            accounts,
        ),
        stories: StoryService::new(
            StoryRepository::new(store),
            user_repo,
            DiscoveryConfig::default(),
        ),
        violations,
    }
}

async fn register(app: &App, username: &str, gender: Gender, looking_for: LookingFor) -> String {
    let user = app
        .accounts
        .register(RegisterInput {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "correct horse battery".to_string(),
            display_name: None,
            gender,
            looking_for,
            age: 28,
            age_min: 18,
            age_max: 99,
            max_distance_km: 50.0,
        })
        .await
        .unwrap();
    user.id
}

#[tokio::test]
async fn discover_swipe_match_and_chat() {
    let app = app();
    let alice = register(&app, "alice", Gender::Female, LookingFor::Male).await;
    let bob = register(&app, "bob", Gender::Male, LookingFor::Female).await;
    app.accounts.update_position(&alice, 0.0, 0.0).await.unwrap();
    app.accounts.update_position(&bob, 0.05, 0.0).await.unwrap();

    // They see each other in discovery.
    let for_alice = app.matching.discover(&alice, None).await.unwrap();
    assert_eq!(for_alice.len(), 1);
    assert_eq!(for_alice[0].id, bob);

    // Mutual like creates the match; the swiped user disappears from
    // discovery after the first swipe.
    app.matching
        .record_swipe(&alice, &bob, SwipeAction::Like)
        .await
        .unwrap();
    assert!(app.matching.discover(&alice, None).await.unwrap().is_empty());

    let outcome = app
        .matching
        .record_swipe(&bob, &alice, SwipeAction::Like)
        .await
        .unwrap();
    let m = outcome.new_match.unwrap();

    // Matched users can chat.
    app.messaging
        .send_message(
            &m.id,
            &alice,
            SendMessageInput {
                content: "hey! coffee this weekend?".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(app.messaging.unread_count(&bob).await.unwrap(), 1);
}

#[tokio::test]
async fn moderation_fine_and_reinstatement() {
    let app = app();
    let alice = register(&app, "alice", Gender::Female, LookingFor::Both).await;
    let bob = register(&app, "bob", Gender::Male, LookingFor::Both).await;

    app.matching
        .record_swipe(&alice, &bob, SwipeAction::Like)
        .await
        .unwrap();
    let m = app
        .matching
        .record_swipe(&bob, &alice, SwipeAction::Like)
        .await
        .unwrap()
        .new_match
        .unwrap();

    // Sharing a phone number gets the message rejected and the sender
    // suspended with a pending fine.
    let err = app
        .messaging
        .send_message(
            &m.id,
            &alice,
            SendMessageInput {
                content: "text me: (555) 123-4567".to_string(),
            },
        )
        .await;
    assert!(err.is_err());

    let violations = app.violations.find_by_user(&alice).await.unwrap();
    assert_eq!(violations.len(), 1);
    assert!(app
        .accounts
        .profile(&alice)
        .await
        .unwrap()
        .is_suspended_at(Utc::now()));

    // Suspension blocks swiping too.
    let carol = register(&app, "carol", Gender::Female, LookingFor::Both).await;
    assert!(app
        .matching
        .record_swipe(&alice, &carol, SwipeAction::Like)
        .await
        .is_err());

    // Paying the fine lifts the suspension and resolves the violation.
    let payment = app
        .payments
        .create(
            &alice,
            CreatePaymentInput {
                amount: dec!(0.0),
                payment_type: PaymentType::Fine,
                violation_id: Some(violations[0].id.clone()),
            },
        )
        .await
        .unwrap();
    assert_eq!(payment.amount, violations[0].fine_amount);
    app.payments.settle(&payment.id, true).await.unwrap();

    assert!(!app
        .accounts
        .profile(&alice)
        .await
        .unwrap()
        .is_suspended_at(Utc::now()));
    app.messaging
        .send_message(
            &m.id,
            &alice,
            SendMessageInput {
                content: "sorry, let's keep it here".to_string(),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn blind_date_escrow_lifecycle() {
    let app = app();
    let alice = register(&app, "alice", Gender::Female, LookingFor::Both).await;
    let bob = register(&app, "bob", Gender::Male, LookingFor::Both).await;
    app.accounts.update_position(&bob, 0.05, 0.0).await.unwrap();

    // Fund both wallets through settled top-ups.
    for user in [&alice, &bob] {
        let topup = app
            .payments
            .create(
                user,
                CreatePaymentInput {
                    amount: dec!(100.0),
                    payment_type: PaymentType::WalletTopup,
                    violation_id: None,
                },
            )
            .await
            .unwrap();
        app.payments.settle(&topup.id, true).await.unwrap();
    }

    let bd = app
        .blind_dates
        .create(
            &alice,
            CreateBlindDateInput {
                center_lat: 0.0,
                center_lng: 0.0,
                radius_km: 10.0,
                amount: dec!(25.0),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        app.accounts.profile(&alice).await.unwrap().wallet_balance,
        dec!(75.0)
    );

    // Bob finds and joins it; both stakes are now escrowed.
    let open = app.blind_dates.nearby(&bob).await.unwrap();
    assert_eq!(open.len(), 1);
    let matched = app.blind_dates.join(&open[0].id, &bob).await.unwrap();
    assert!(matched.scheduled_for.is_some());
    assert_eq!(
        app.accounts.profile(&bob).await.unwrap().wallet_balance,
        dec!(75.0)
    );

    // Completing consumes the stakes.
    app.blind_dates.complete(&bd.id, &alice).await.unwrap();
    assert_eq!(
        app.accounts.profile(&alice).await.unwrap().wallet_balance,
        dec!(75.0)
    );
}

#[tokio::test]
async fn stories_surface_for_nearby_users() {
    let app = app();
    let alice = register(&app, "alice", Gender::Female, LookingFor::Both).await;
    let bob = register(&app, "bob", Gender::Male, LookingFor::Both).await;
    app.accounts.update_position(&alice, 0.0, 0.0).await.unwrap();
    app.accounts.update_position(&bob, 0.05, 0.0).await.unwrap();

    app.stories
        .post(
            &alice,
            lovear_core::PostStoryInput {
                content: "anyone up for live music tonight?".to_string(),
                media_url: None,
            },
        )
        .await
        .unwrap();

    let seen = app.stories.nearby(&bob).await.unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].user_id, alice);
}
