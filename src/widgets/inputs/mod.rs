pub mod masked;
pub mod text;
pub mod text_edit;
