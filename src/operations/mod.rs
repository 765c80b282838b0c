pub mod add;
pub mod aggregate;
pub mod dashboard;
pub mod filter;
pub mod overview;
pub mod remove;
pub mod summary;
