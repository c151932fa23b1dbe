use md_core::{CoreError, CustomerId, RestaurantId, VehicleId};
use md_model::ModelError;
use md_policy::StopTarget;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("step called before the first reset")]
    NotReset,

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("invalid stop destination {0:?}")]
    InvalidDestination(StopTarget),

    #[error("vehicle {0} does not exist")]
    UnknownVehicle(VehicleId),

    #[error("restaurant {0} does not exist")]
    UnknownRestaurant(RestaurantId),

    #[error("customer {0} does not exist")]
    UnknownCustomer(CustomerId),

    #[error("mean delay requested but no customer has been served")]
    NoServedCustomers,

    #[error("day {day} did not finish within {steps} steps")]
    StepLimit { day: u32, steps: u64 },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
