pub mod api_error;
pub mod design_controller;
