pub mod filter;
pub mod service;

#[cfg(test)]
mod fixtures;
