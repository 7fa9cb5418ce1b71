pub mod candidate;
pub mod message;
