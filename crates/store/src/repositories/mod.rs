//! In-memory repositories, one per entity type.

pub mod blind_date;
pub mod matches;
pub mod message;
pub mod payment;
pub mod story;
pub mod swipe;
pub mod user;
pub mod violation;

pub use blind_date::BlindDateRepository;
pub use matches::MatchRepository;
pub use message::MessageRepository;
pub use payment::PaymentRepository;
pub use story::StoryRepository;
pub use swipe::SwipeRepository;
pub use user::UserRepository;
pub use violation::ViolationRepository;
