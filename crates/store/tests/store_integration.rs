//! Integration tests for the in-memory storage layer.

#![allow(clippy::unwrap_used)]

use lovear_common::Position;
use lovear_store::entities::{Gender, LookingFor, NewMatch, NewMessage, NewSwipe, NewUser, SwipeAction};
use lovear_store::{
    MatchRepository, MemStore, MessageRepository, SwipeRepository, UserRepository,
};

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "hash".to_string(),
        token: format!("token-{username}"),
        display_name: None,
        gender: Gender::Male,
        looking_for: LookingFor::Both,
        age: 30,
        age_min: 20,
        age_max: 40,
        max_distance_km: 25.0,
    }
}

#[tokio::test]
async fn repositories_share_one_store() {
    let store = MemStore::new();
    let users = UserRepository::new(store.clone());
    let swipes = SwipeRepository::new(store.clone());
    let matches = MatchRepository::new(store.clone());
    let messages = MessageRepository::new(store);

    let alice = users.create(new_user("alice")).await.unwrap();
    let bob = users.create(new_user("bob")).await.unwrap();

    swipes
        .create(NewSwipe {
            swiper_id: alice.id.clone(),
            swiped_id: bob.id.clone(),
            action: SwipeAction::Like,
        })
        .await
        .unwrap();

    let m = matches
        .create(NewMatch {
            user1_id: alice.id.clone(),
            user2_id: bob.id.clone(),
        })
        .await
        .unwrap();

    messages
        .create(NewMessage {
            match_id: m.id.clone(),
            sender_id: alice.id.clone(),
            content: "hi!".to_string(),
        })
        .await
        .unwrap();

    // Everything lands in the same backend and is queryable across repos.
    assert!(swipes
        .find_by_pair(&alice.id, &bob.id)
        .await
        .unwrap()
        .is_some());
    assert_eq!(matches.find_active_for_user(&bob.id).await.unwrap().len(), 1);
    assert_eq!(
        messages
            .count_unread_in(&[m.id.clone()], &bob.id)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn ids_assigned_at_creation_are_monotonic() {
    let store = MemStore::new();
    let users = UserRepository::new(store.clone());
    let swipes = SwipeRepository::new(store);

    let a = users.create(new_user("a")).await.unwrap();
    let s = swipes
        .create(NewSwipe {
            swiper_id: a.id.clone(),
            swiped_id: "b".to_string(),
            action: SwipeAction::Pass,
        })
        .await
        .unwrap();
    let c = users.create(new_user("c")).await.unwrap();

    assert!(a.id < s.id);
    assert!(s.id < c.id);
}

#[tokio::test]
async fn nearby_users_follow_planar_semantics() {
    let store = MemStore::new();
    let users = UserRepository::new(store);

    let near = users.create(new_user("near")).await.unwrap();
    let far = users.create(new_user("far")).await.unwrap();
    users.set_position(&near.id, 0.05, 0.0).await.unwrap();
    users.set_position(&far.id, 1.0, 0.0).await.unwrap();

    let found = users
        .find_nearby(Position::new(0.0, 0.0), 10.0)
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, near.id);
}
