/*
* Users: registration, profile updates, admin promotion, author cards.
*/

pub mod handler;
pub mod routes;
