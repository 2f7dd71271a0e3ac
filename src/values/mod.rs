pub mod arguments;
pub mod context;
pub mod data_path;
pub mod numeric;
