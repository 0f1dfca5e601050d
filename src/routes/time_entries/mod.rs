pub mod time_entry_handlers;
pub mod time_entry_models;
