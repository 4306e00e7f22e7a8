pub mod battery;
pub mod clear_sky;
pub mod design_service;
pub mod load_profile;
pub mod nasa_power;
pub mod solar_array;
pub mod thermal;
