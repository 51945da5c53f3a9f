//! Pascal VOC detection dataset loading.

mod dataset;
mod parser;
mod schema;

pub use dataset::*;
pub use parser::*;
pub use schema::*;
