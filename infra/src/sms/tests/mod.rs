//! Unit tests for the SMS gateway clients
