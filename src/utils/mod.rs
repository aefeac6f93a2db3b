pub mod errors;
pub mod table;

pub use errors::ChartError;
pub use table::{Align, Table};
