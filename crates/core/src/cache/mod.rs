mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{appointment_key, salon_key, user_key};
pub use serialization::{
    deserialize_appointment, deserialize_appointments, serialize_appointment,
    serialize_appointments, SerializationError,
};
pub use traits::{AppointmentMemory, Cache};
