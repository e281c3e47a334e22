/*
* Token issuance and self-service role checks.
*/

pub mod handler;
pub mod routes;
