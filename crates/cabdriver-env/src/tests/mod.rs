mod env_core_tests;
mod property_rollover_tests;
