pub mod formatter;

pub use formatter::{
    format_model_summary, format_result_json, format_result_text, should_use_colors,
};
