pub mod status_text;
pub mod terminal;
