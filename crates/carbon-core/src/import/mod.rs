pub mod xlsx;

pub use xlsx::parse_input_xlsx;
