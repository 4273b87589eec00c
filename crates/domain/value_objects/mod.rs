pub mod acks;
pub mod categories;
pub mod enums;
pub mod item_types;
pub mod items;
pub mod line_items;
pub mod navbar;
pub mod pagination;
pub mod payments;
pub mod purchases;
pub mod sales;
pub mod slugs;
pub mod users;
