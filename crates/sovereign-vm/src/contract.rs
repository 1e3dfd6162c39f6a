//! Contract trait implemented by every deployable component

use std::any::Any;
use std::fmt::Debug;

use crate::error::Result;
use crate::world::Env;

/// Code attached to an account
///
/// A contract receives opaque call data together with an [`Env`] describing
/// the frame (caller, value, own address) and giving access to nested calls,
/// deployments and notifications. Returning an error reverts the frame.
pub trait Contract: ContractBox + Debug + Send + Sync + 'static {
    fn call(&mut self, env: &mut Env<'_>, data: &[u8]) -> Result<Vec<u8>>;
}

/// Object-safe cloning and downcasting for boxed contracts
pub trait ContractBox {
    fn clone_box(&self) -> Box<dyn Contract>;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Contract + Clone> ContractBox for T {
    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Clone for Box<dyn Contract> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
