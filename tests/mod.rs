mod common;
mod renderer_tests;
