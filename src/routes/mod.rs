pub mod auth;
pub mod routes;
pub mod shifts;
pub mod time_entries;
pub mod users;
pub mod ws;
