mod error;
mod operations;
mod requests;
mod types;
mod validation;

pub use error::ValidationError;
pub use operations::{new_appointment, new_response, new_response_slice};
pub use requests::{
    AppResponse, AssignOrCancel, DeleteAppointment, FindById, FindBySalon, FindByUser,
    UpsertAppointment,
};
pub use types::Appointment;
pub use validation::RequestValidator;
