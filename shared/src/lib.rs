pub mod models;
pub mod paths;
pub mod validation;
pub mod voter;

pub use models::*;
pub use validation::*;
pub use voter::*;

#[cfg(test)]
mod tests;
