// Integration tests entry point
// Run with: cargo test --test integration_tests

mod integration {
    pub mod common;
    mod composition_test;
    mod config_test;
    mod decode_test;
}
