//! Entity model.
//!
//! Pure data contracts for everything kept in the record store, plus the
//! constructors and accessors that hold their invariants.

pub mod chat;
pub mod order;
pub mod product;
pub mod profile;
pub mod settings;

pub use chat::{ADMIN_SENDER_ID, ChatMessage, ROUTING_DELIMITER, SenderId};
pub use order::{Order, OrderBuilder, OrderItem, ShippingInfo};
pub use product::{ArticleLink, Product, ProductReview, default_catalog};
pub use profile::{AddressKind, UserProfile};
pub use settings::{MIN_PASSWORD_LENGTH, ShopSettings};
