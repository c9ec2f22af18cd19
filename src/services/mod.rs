pub mod capture;
pub mod document_host;
pub mod fingerprint;
pub mod keycode_map;
pub mod simulated_screen;
pub mod virtual_device;
pub mod window_manager;
