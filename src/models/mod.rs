pub mod creation;
pub mod folders;
pub mod health;
