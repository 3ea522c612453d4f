//! Business logic services.

pub mod account;
pub mod blind_date;
pub mod matching;
pub mod messaging;
pub mod moderation;
pub mod payment;
pub mod story;

pub use account::{AccountService, RegisterInput, UpdateProfileInput};
pub use blind_date::{BlindDateService, CreateBlindDateInput};
pub use matching::{MatchingService, SwipeOutcome};
pub use messaging::{MessagingService, SendMessageInput};
pub use moderation::{ModerationFilter, ModerationVerdict};
pub use payment::{CreatePaymentInput, PaymentService};
pub use story::{PostStoryInput, StoryService};
