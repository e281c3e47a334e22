/*
* Join-us applications and their resume uploads.
*/

pub mod handler;
pub mod routes;
