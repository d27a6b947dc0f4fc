//! Request executor capability and its `reqwest` implementation.
mod client;
mod executor;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use client::{ClientOptions, ReqwestExecutor, build_executor};
pub use executor::{
    BodyStream, ExecutorResponse, HttpMethod, RequestExecutor, RequestSpec, collect_body,
    drain_body,
};
