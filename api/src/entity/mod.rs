//! SeaORM entities
//!
//! Table models for the PostgreSQL adapters. Domain code never sees these;
//! the adapters convert them to `domain::entities` types.

pub mod consultations;
pub mod lab_results;
pub mod test_requests;
pub mod users;
