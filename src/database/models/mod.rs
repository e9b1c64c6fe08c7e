pub mod comment;
pub mod offer;
pub mod user;

pub use comment::Comment;
pub use offer::{City, Goods, Location, Offer, OfferType};
pub use user::{User, UserStatus};
