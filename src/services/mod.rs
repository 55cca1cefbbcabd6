pub mod admission;
pub mod policy;
pub mod provider;
