pub mod columns;
pub mod fact;
pub mod repository;
pub mod unifier;

pub use fact::{FactTable, SaleFact};
