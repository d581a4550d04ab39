pub mod errors;
pub mod extract;
pub mod state;
pub mod html;
pub mod routes;
pub mod openapi;
pub mod startup;
pub mod launch;

pub use startup::run;
