//! Read and write shapes for the API. Read shapes expand related records
//! into nested objects; write shapes take flat foreign-key ids and never
//! carry owner fields, ownership always comes from the request identity.

pub mod place;
pub mod trip;
pub mod user;
pub mod vehicle;
