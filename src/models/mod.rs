pub mod category;
pub mod transaction;
pub mod window;
