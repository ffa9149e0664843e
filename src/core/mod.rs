//! Core orchestration for kintree

mod person_manager;

pub use person_manager::PersonManager;
