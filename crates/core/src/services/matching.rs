//! Matching service: swipe intake, reciprocal-like detection and discovery.

use chrono::Utc;
use lovear_common::{AppError, AppResult, config::DiscoveryConfig};
use lovear_store::entities::{Match, NewMatch, NewSwipe, Swipe, SwipeAction, User};
use lovear_store::{MatchRepository, SwipeRepository, UserRepository};
use std::collections::HashSet;

/// Outcome of recording a swipe.
#[derive(Debug, Clone)]
pub struct SwipeOutcome {
    /// The stored swipe.
    pub swipe: Swipe,
    /// The match created by this swipe, when it completed a reciprocal pair.
    pub new_match: Option<Match>,
}

/// Matching service for business logic.
#[derive(Clone)]
pub struct MatchingService {
    swipe_repo: SwipeRepository,
    match_repo: MatchRepository,
    user_repo: UserRepository,
    discovery: DiscoveryConfig,
}

impl MatchingService {
    /// Create a new matching service.
    #[must_use]
    pub const fn new(
        swipe_repo: SwipeRepository,
        match_repo: MatchRepository,
        user_repo: UserRepository,
        discovery: DiscoveryConfig,
    ) -> Self {
        Self {
            swipe_repo,
            match_repo,
            user_repo,
            discovery,
        }
    }

    /// Record a one-directional swipe intent.
    ///
    /// At most one swipe may exist per ordered pair; a second attempt is
    /// rejected as a duplicate. A `Like` (or `SuperLike`, which counts as a
    /// like on both sides) that completes a reciprocal pair creates exactly
    /// one match for the unordered pair, with the current swiper as user1.
    pub async fn record_swipe(
        &self,
        swiper_id: &str,
        swiped_id: &str,
        action: SwipeAction,
    ) -> AppResult<SwipeOutcome> {
        if swiper_id == swiped_id {
            return Err(AppError::BadRequest("Cannot swipe on yourself".to_string()));
        }

        let swiper = self.user_repo.get_by_id(swiper_id).await?;
        self.user_repo.get_by_id(swiped_id).await?;

        let now = Utc::now();
        if swiper.is_suspended_at(now) {
            // suspended_until is Some whenever is_suspended_at holds
            let until = swiper.suspended_until.unwrap_or(now);
            return Err(AppError::Suspended(until));
        }

        // Duplicate guard: the pair state is immutable once recorded.
        if self
            .swipe_repo
            .find_by_pair(swiper_id, swiped_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Already swiped on this user".to_string()));
        }

        let swipe = self
            .swipe_repo
            .create(NewSwipe {
                swiper_id: swiper_id.to_string(),
                swiped_id: swiped_id.to_string(),
                action,
            })
            .await?;

        let new_match = if action.expresses_interest() {
            self.try_create_match(swiper_id, swiped_id).await?
        } else {
            None
        };

        Ok(SwipeOutcome { swipe, new_match })
    }

    /// Create the match for a reciprocal pair, if the reverse swipe also
    /// expresses interest and no match exists yet.
    async fn try_create_match(
        &self,
        swiper_id: &str,
        swiped_id: &str,
    ) -> AppResult<Option<Match>> {
        let reverse = self.swipe_repo.find_by_pair(swiped_id, swiper_id).await?;
        let Some(reverse) = reverse else {
            return Ok(None);
        };
        if !reverse.action.expresses_interest() {
            return Ok(None);
        }

        if self
            .match_repo
            .find_by_pair(swiper_id, swiped_id)
            .await?
            .is_some()
        {
            return Ok(None);
        }

        let m = self
            .match_repo
            .create(NewMatch {
                user1_id: swiper_id.to_string(),
                user2_id: swiped_id.to_string(),
            })
            .await?;

        tracing::info!(match_id = %m.id, user1_id = %m.user1_id, user2_id = %m.user2_id, "Reciprocal like matched");
        Ok(Some(m))
    }

    /// Discovery candidates for a user.
    ///
    /// Returns nearby users excluding the requester, anyone already swiped
    /// in either direction, anyone outside the requester's age range or
    /// gender preference, and suspended accounts.
    pub async fn discover(&self, user_id: &str, limit: Option<usize>) -> AppResult<Vec<User>> {
        let requester = self.user_repo.get_by_id(user_id).await?;
        let Some(position) = requester.position() else {
            return Err(AppError::BadRequest(
                "No position reported; update your location first".to_string(),
            ));
        };

        let radius_km = if requester.max_distance_km > 0.0 {
            requester.max_distance_km
        } else {
            self.discovery.default_radius_km
        };
        let limit = limit.unwrap_or(self.discovery.default_limit);

        let swiped: HashSet<String> = self
            .swipe_repo
            .find_involving(user_id)
            .await?
            .into_iter()
            .map(|s| {
                if s.swiper_id == user_id {
                    s.swiped_id
                } else {
                    s.swiper_id
                }
            })
            .collect();

        let now = Utc::now();
        let mut candidates: Vec<User> = self
            .user_repo
            .find_nearby(position, radius_km)
            .await?
            .into_iter()
            .filter(|u| u.id != user_id)
            .filter(|u| !swiped.contains(&u.id))
            .filter(|u| u.age >= requester.age_min && u.age <= requester.age_max)
            .filter(|u| requester.looking_for.accepts(u.gender))
            .filter(|u| !u.is_suspended_at(now))
            .collect();

        candidates.sort_by(|a, b| a.id.cmp(&b.id));
        candidates.truncate(limit);
        Ok(candidates)
    }

    /// Active matches for a user, newest first.
    pub async fn matches_for(&self, user_id: &str) -> AppResult<Vec<Match>> {
        self.match_repo.find_active_for_user(user_id).await
    }

    /// Soft-deactivate a match. Participant only; the record is kept.
    pub async fn deactivate_match(&self, match_id: &str, user_id: &str) -> AppResult<Match> {
        let m = self.match_repo.get_by_id(match_id).await?;
        if !m.involves(user_id) {
            return Err(AppError::Forbidden(
                "Not a participant of this match".to_string(),
            ));
        }
        self.match_repo.set_active(match_id, false).await
    }
}
