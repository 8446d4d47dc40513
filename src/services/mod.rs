pub mod conditions;
pub mod open_meteo;
pub mod weather;
