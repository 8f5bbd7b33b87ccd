//! GraphQL surface of the PeopleDesk HR suite: employee records and the
//! dashboard welcome panel.

pub mod dashboard;
pub mod schema;
