pub mod logging;
pub mod paths;
pub mod terminal;

pub use logging::init_logging;
pub use paths::{open_input, prepare_output_dir, validate_file_stem, validate_image_dir};
pub use terminal::strip_ansi_codes;
