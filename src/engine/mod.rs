//! Concurrent measurement engine.
//!
//! A [`TransferProbe`] moves bytes once, a [`FanoutMeasurer`] runs a fixed
//! number of probes against one server and turns the byte total into a rate,
//! and an [`AverageAggregator`] repeats that for every discovered server and
//! averages the results. The first failure anywhere aborts the whole call.
mod aggregate;
mod fanout;
mod payload;
mod probe;
mod servers;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::{AverageAggregator, ServerPolicy};
pub use fanout::{DEFAULT_WORKLOAD, FanoutMeasurer};
pub use payload::{PAYLOAD_CHARSET, random_string, random_string_with_charset};
pub use probe::{DEFAULT_UPLOAD_SIZE, Direction, HttpTransferProbe, TransferProbe};
pub use servers::{ServerDescriptor, ServerDiscovery};
