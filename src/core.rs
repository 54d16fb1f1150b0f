pub mod channel;
pub mod decision;
pub mod engine;
pub mod price;
pub mod runner;
pub mod strategy;
pub mod value;
