pub mod selector_service;
