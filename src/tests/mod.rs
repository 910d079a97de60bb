mod support;

mod gateway_tests;
mod integrity_engine_tests;
