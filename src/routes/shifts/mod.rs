pub mod shift_handlers;
pub mod shift_models;
