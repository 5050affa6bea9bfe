pub mod gene;
pub mod organism;
pub mod table;
