//! HTTP layer: routes, handlers and the response envelope

pub mod endpoints;
pub mod response;
