//! Data models for kintree

mod person;

pub use person::{Person, PersonBuilder};
