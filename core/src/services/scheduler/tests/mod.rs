mod mocks;
mod runner_tests;
