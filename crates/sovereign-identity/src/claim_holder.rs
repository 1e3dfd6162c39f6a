//! Claim Holder contract
//!
//! Stores claims issued about its owner, normally the identity's proxy
//! account. Anyone may file a claim; only its issuer may change or remove
//! it and only the owner may toggle its review flag.

use sovereign_core::{Address, Claim, ClaimFiling, ClaimId, ClaimRegistry, Event, Topic};
use sovereign_vm::{codec, Blueprint, Contract, Deployment, Env, Result};
use tracing::info;

use crate::abi::ClaimHolderCall;

#[derive(Debug, Clone)]
pub struct ClaimHolder {
    registry: ClaimRegistry,
}

impl ClaimHolder {
    pub const CODE: &'static str = "claim-holder";

    pub fn new(owner: Address) -> Self {
        Self {
            registry: ClaimRegistry::new(owner),
        }
    }

    pub fn blueprint(owner: Address) -> Blueprint {
        Blueprint::with_args(Self::CODE, &owner)
    }

    /// Constructor taking the encoded owner, defaulting to the deployer
    pub fn constructor(deployment: &Deployment, args: &[u8]) -> Result<Box<dyn Contract>> {
        let owner = if args.is_empty() {
            deployment.creator
        } else {
            codec::decode(args)?
        };
        Ok(Box::new(Self::new(owner)))
    }

    pub fn owner(&self) -> Address {
        self.registry.owner()
    }

    pub fn get_claim(&self, id: &ClaimId) -> Option<&Claim> {
        self.registry.get_claim(id)
    }

    pub fn get_topics(&self) -> &[Topic] {
        self.registry.get_topics()
    }

    pub fn existing_topic(&self, topic: &Topic) -> bool {
        self.registry.existing_topic(topic)
    }

    pub fn claims_by_topic(&self, topic: &Topic, index: usize) -> Option<ClaimId> {
        self.registry.claim_by_topic(topic, index)
    }

    pub fn get_claim_ids_by_topic(&self, topic: &Topic) -> &[ClaimId] {
        self.registry.claim_ids_by_topic(topic)
    }
}

impl Contract for ClaimHolder {
    fn call(&mut self, env: &mut Env<'_>, data: &[u8]) -> Result<Vec<u8>> {
        let caller = env.caller();

        match codec::decode(data)? {
            ClaimHolderCall::AddClaim {
                topic,
                scheme,
                data,
                uri,
            } => {
                let filing = self.registry.add_claim(caller, topic, scheme, data, uri);
                let id = filing.claim().id;
                match &filing {
                    ClaimFiling::Added(claim) => {
                        info!("Claim {} filed by {}", id.short(), caller.short());
                        env.emit(Event::claim_added(claim));
                    }
                    ClaimFiling::Changed(claim) => {
                        info!("Claim {} re-filed by {}", id.short(), caller.short());
                        env.emit(Event::claim_changed(claim));
                    }
                }
                Ok(codec::encode(&id))
            }
            ClaimHolderCall::ChangeClaim {
                id,
                scheme,
                data,
                uri,
            } => {
                let claim = self.registry.change_claim(caller, id, scheme, data, uri)?;
                info!("Claim {} changed", id.short());
                env.emit(Event::claim_changed(&claim));
                Ok(codec::encode(&true))
            }
            ClaimHolderCall::RemoveClaim { id } => {
                let previous = self.registry.remove_claim(caller, id)?;
                info!("Claim {} removed", id.short());
                env.emit(Event::claim_removed(&previous));
                Ok(codec::encode(&true))
            }
            ClaimHolderCall::ToggleReviewClaim { id } => {
                let claim = self.registry.toggle_review(caller, id)?;
                env.emit(Event::claim_approval_toggled(&claim));
                Ok(codec::encode(&claim.recipient_review))
            }
        }
    }
}
