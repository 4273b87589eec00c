pub mod categories;
pub mod item_types;
pub mod items;
pub mod navbar;
pub mod payments;
pub mod purchases;
pub mod sales;
pub mod users;
