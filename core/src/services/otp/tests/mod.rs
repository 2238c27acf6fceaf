mod mocks;
mod verify_tests;
