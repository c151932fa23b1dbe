use md_core::{CoreError, CustomerId, RestaurantId, VehicleId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("pickup stop at {0} lists no orders")]
    EmptyPickup(RestaurantId),

    #[error("insertion index {index} is past the end of a sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("vehicle {0} already set off for its first stop; cannot insert before it")]
    DisplacesStartedStop(VehicleId),

    #[error("restaurant {0} not found")]
    UnknownRestaurant(RestaurantId),

    #[error("customer {customer} cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        customer: CustomerId,
        from:     crate::CustomerStatus,
        to:       crate::CustomerStatus,
    },

    #[error("customer {customer} did not order from {restaurant}")]
    NotOrderedFrom { customer: CustomerId, restaurant: RestaurantId },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ModelResult<T> = Result<T, ModelError>;
