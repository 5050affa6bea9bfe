pub mod attributes;
pub mod network;
pub mod nodes;
pub mod session;
pub mod wheel;
