pub mod item;
pub mod line_item;
pub mod project;
pub mod user;

pub use item::{Item, ItemCreate, ItemUpdate};
pub use line_item::{LineItem, LineItemCreate, LineItemUpdate, Price};
pub use project::{Project, ProjectCreate, ProjectUpdate};
pub use user::{User, UserCreate, UserUpdate};

use uuid::Uuid;

/// Rows that belong to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}
