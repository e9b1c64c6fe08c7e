pub mod dto;
pub mod format;
