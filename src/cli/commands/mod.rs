pub mod check;
pub mod filter;
pub mod scope;
