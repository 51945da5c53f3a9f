//! The building blocks of detection dataset loading.

mod common;

pub mod classes;
pub mod collate;
pub mod sample;
pub mod transform;
pub mod voc;
