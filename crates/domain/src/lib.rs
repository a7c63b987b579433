mod firm;
mod reminder;
mod shared;
mod user;

pub use firm::{Firm, FirmSettings};
pub use reminder::{day_diff, Reminder};
pub use shared::entity::{Entity, ID};
pub use shared::metadata::Metadata;
pub use user::{PlanTier, User};
