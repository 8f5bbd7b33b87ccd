//! Persisted record definitions for the PeopleDesk HR suite.

pub mod employee;
