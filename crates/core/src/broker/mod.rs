//! Work-queue capability used by the queue consumer.
//!
//! A broker hands out deliveries one queue at a time, carries replies back to
//! producers and acknowledges deliveries once they are handled.

mod error;
mod traits;

pub use error::{BrokerError, Result};
pub use traits::{queue_key, reply_key, Broker, Delivery};
