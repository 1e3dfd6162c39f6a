//! Minimal dispatch target holding one integer

use sovereign_vm::{codec, Blueprint, Contract, Deployment, Env, Result};
use tracing::debug;

use crate::abi::CounterCall;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter {
    integer: u64,
}

impl Counter {
    pub const CODE: &'static str = "counter";

    pub fn new(integer: u64) -> Self {
        Self { integer }
    }

    /// Blueprint deploying a counter starting at `initial`
    pub fn blueprint(initial: u64) -> Blueprint {
        Blueprint::with_args(Self::CODE, &initial)
    }

    /// Constructor taking an optional encoded initial value
    pub fn constructor(_deployment: &Deployment, args: &[u8]) -> Result<Box<dyn Contract>> {
        let initial = if args.is_empty() {
            0
        } else {
            codec::decode(args)?
        };
        Ok(Box::new(Self::new(initial)))
    }

    pub fn integer(&self) -> u64 {
        self.integer
    }
}

impl Contract for Counter {
    fn call(&mut self, env: &mut Env<'_>, data: &[u8]) -> Result<Vec<u8>> {
        match codec::decode(data)? {
            CounterCall::ChangeInteger(value) => {
                debug!("Counter {} set to {} by {}", env.this().short(), value, env.caller().short());
                self.integer = value;
                Ok(codec::encode(&value))
            }
        }
    }
}
