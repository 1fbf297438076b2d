mod castor;

pub use castor::{ApiErrorBody, ApiErrorObject, CastorError};
