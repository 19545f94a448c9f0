pub mod preferences;
pub mod user;

pub use user::{ActiveModel, Column, Entity, Model, Relation};
