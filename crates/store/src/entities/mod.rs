//! Entity models stored by the in-memory repositories.

pub mod blind_date;
pub mod matches;
pub mod message;
pub mod payment;
pub mod story;
pub mod swipe;
pub mod user;
pub mod violation;

pub use blind_date::{BlindDate, BlindDateStatus, NewBlindDate};
pub use matches::{Match, NewMatch};
pub use message::{Message, NewMessage};
pub use payment::{NewPayment, Payment, PaymentStatus, PaymentType};
pub use story::{NewStory, Story};
pub use swipe::{NewSwipe, Swipe, SwipeAction};
pub use user::{Gender, LookingFor, NewUser, User, UserPatch};
pub use violation::{NewViolation, Violation, ViolationStatus, ViolationType};
