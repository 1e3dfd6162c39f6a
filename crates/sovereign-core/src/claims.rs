//! Claim registry
//!
//! Third parties (issuers) file attestations about the identity that owns the
//! registry. A claim id is a pure function of (issuer, subject, topic), so an
//! issuer holds at most one claim per topic. Only the issuer may change or
//! invalidate its claim; only the owner may toggle its review flag.
//! Invalidated claims stay stored and indexed with `is_valid == false`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IdentityError, Result};
use crate::types::{Address, ClaimId, Topic};

/// A stored attestation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,

    /// What the claim is about
    pub topic: Topic,

    /// Verification scheme of the proof in `data`
    pub scheme: u64,

    /// Account that filed the claim
    pub issuer: Address,

    /// Opaque attestation payload
    pub data: Vec<u8>,

    /// Pointer to off-band evidence, possibly empty
    pub uri: String,

    /// Cleared by the issuer, never set again
    pub is_valid: bool,

    /// Review flag toggled by the subject's owner
    pub recipient_review: bool,
}

/// Outcome of filing a claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimFiling {
    /// First claim of this issuer on the topic
    Added(Claim),
    /// The issuer re-filed the topic; the existing claim was updated
    Changed(Claim),
}

impl ClaimFiling {
    pub fn claim(&self) -> &Claim {
        match self {
            ClaimFiling::Added(claim) | ClaimFiling::Changed(claim) => claim,
        }
    }
}

/// Claims held about one subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRegistry {
    /// Identity the claims are about; the only account allowed to review
    owner: Address,

    claims: HashMap<ClaimId, Claim>,

    /// Distinct topics in first-filed order
    topics: Vec<Topic>,

    /// Claim ids per topic in filing order
    claims_by_topic: HashMap<Topic, Vec<ClaimId>>,
}

impl ClaimRegistry {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            claims: HashMap::new(),
            topics: Vec::new(),
            claims_by_topic: HashMap::new(),
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// File a claim from `issuer`, updating it in place if it already exists
    pub fn add_claim(
        &mut self,
        issuer: Address,
        topic: Topic,
        scheme: u64,
        data: Vec<u8>,
        uri: String,
    ) -> ClaimFiling {
        let id = ClaimId::derive(&issuer, &self.owner, &topic);

        if let Some(existing) = self.claims.get_mut(&id) {
            existing.scheme = scheme;
            existing.data = data;
            existing.uri = uri;
            debug!("Claim {} re-filed by {}", id.short(), issuer.short());
            return ClaimFiling::Changed(existing.clone());
        }

        let claim = Claim {
            id,
            topic,
            scheme,
            issuer,
            data,
            uri,
            is_valid: true,
            recipient_review: false,
        };
        self.claims.insert(id, claim.clone());

        if !self.existing_topic(&topic) {
            self.topics.push(topic);
        }
        self.claims_by_topic.entry(topic).or_default().push(id);

        debug!("Claim {} added by {}", id.short(), issuer.short());
        ClaimFiling::Added(claim)
    }

    /// Update scheme, data and uri of a claim; issuer only
    pub fn change_claim(
        &mut self,
        caller: Address,
        id: ClaimId,
        scheme: u64,
        data: Vec<u8>,
        uri: String,
    ) -> Result<Claim> {
        let claim = self.issued_by_mut(caller, id)?;
        claim.scheme = scheme;
        claim.data = data;
        claim.uri = uri;
        Ok(claim.clone())
    }

    /// Invalidate a claim; issuer only. Returns the claim as it was before.
    pub fn remove_claim(&mut self, caller: Address, id: ClaimId) -> Result<Claim> {
        let claim = self.issued_by_mut(caller, id)?;
        let previous = claim.clone();
        claim.is_valid = false;
        Ok(previous)
    }

    /// Flip the review flag of a claim; owner only
    pub fn toggle_review(&mut self, caller: Address, id: ClaimId) -> Result<Claim> {
        if caller != self.owner {
            return Err(IdentityError::unauthorized(
                caller,
                "caller is not the owner",
            ));
        }
        let claim = self
            .claims
            .get_mut(&id)
            .ok_or(IdentityError::UnknownClaim(id))?;
        claim.recipient_review = !claim.recipient_review;
        Ok(claim.clone())
    }

    fn issued_by_mut(&mut self, caller: Address, id: ClaimId) -> Result<&mut Claim> {
        match self.claims.get_mut(&id) {
            Some(claim) if claim.issuer == caller => Ok(claim),
            _ => Err(IdentityError::unauthorized(
                caller,
                "caller is not the claim issuer",
            )),
        }
    }

    pub fn get_claim(&self, id: &ClaimId) -> Option<&Claim> {
        self.claims.get(id)
    }

    pub fn get_topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn existing_topic(&self, topic: &Topic) -> bool {
        self.claims_by_topic.contains_key(topic)
    }

    /// Claim id at a position of a topic's list
    pub fn claim_by_topic(&self, topic: &Topic, index: usize) -> Option<ClaimId> {
        self.claims_by_topic
            .get(topic)
            .and_then(|ids| ids.get(index))
            .copied()
    }

    pub fn claim_ids_by_topic(&self, topic: &Topic) -> &[ClaimId] {
        self.claims_by_topic
            .get(topic)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
