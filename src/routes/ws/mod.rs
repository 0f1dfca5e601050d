pub mod ws_handlers;
