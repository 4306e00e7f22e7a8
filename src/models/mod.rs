pub mod api;
pub mod climate;
pub mod design;
pub mod irradiance;
