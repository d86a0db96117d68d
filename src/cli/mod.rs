pub mod setup;
pub mod simulate;
pub mod strategies;
pub mod ui;
