//! Core identifier newtypes

use core::fmt;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;
use crate::hash::{keccak256, keccak256_multi};

/// Account address (20 bytes)
///
/// Identifies externally owned accounts and deployed contracts alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(#[serde(with = "hex_bytes_20")] pub [u8; 20]);

impl Address {
    /// The zero address, never a valid call destination
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Take the low 20 bytes of a 32-byte word
    pub fn from_word(word: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Self(bytes)
    }

    /// Derive the account address of a secp256k1 public key
    ///
    /// Keccak-256 over the uncompressed point without its 0x04 tag, low 20 bytes.
    pub fn from_public_key(key: &k256::PublicKey) -> Self {
        let point = key.to_encoded_point(false);
        Self::from_word(&keccak256(&point.as_bytes()[1..]))
    }

    /// Derive the account address of a hex-encoded SEC1 public key
    ///
    /// Accepts compressed and uncompressed points, with or without `0x`.
    pub fn from_public_key_hex(s: &str) -> crate::error::Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| IdentityError::InvalidPublicKey(e.to_string()))?;
        let key = k256::PublicKey::from_sec1_bytes(&bytes)
            .map_err(|_| IdentityError::InvalidPublicKey(format!("not a secp256k1 point: {}", s)))?;
        Ok(Self::from_public_key(&key))
    }

    /// Address of the contract a creator deploys with the given nonce
    pub fn for_contract(creator: &Address, nonce: u64) -> Self {
        Self::from_word(&keccak256_multi(&[creator.as_bytes(), &nonce.to_be_bytes()]))
    }

    /// Short display format (first 4 bytes as hex)
    pub fn short(&self) -> String {
        format!("0x{}...", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

macro_rules! word_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        pub struct $name(#[serde(with = "hex_bytes_32")] pub [u8; 32]);

        impl $name {
            pub const ZERO: $name = $name([0u8; 32]);

            pub fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let mut bytes = [0u8; 32];
                hex::decode_to_slice(s, &mut bytes)?;
                Ok(Self(bytes))
            }

            /// Short display format (first 4 bytes as hex)
            pub fn short(&self) -> String {
                format!("0x{}...", hex::encode(&self.0[..4]))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

word_newtype!(
    /// Key identifier - keccak-256 of the credential's account address
    KeyId
);

word_newtype!(
    /// Claim identifier - keccak-256 of (issuer, subject, topic)
    ClaimId
);

word_newtype!(
    /// Claim topic (32 bytes)
    Topic
);

word_newtype!(
    /// Proxy metadata key (32 bytes)
    DataKey
);

impl KeyId {
    /// Key id of an account: keccak-256 over its 20 address bytes
    pub fn from_address(address: &Address) -> Self {
        Self(keccak256(address.as_bytes()))
    }
}

impl ClaimId {
    /// Deterministic claim id for an issuer filing a topic about a subject
    pub fn derive(issuer: &Address, subject: &Address, topic: &Topic) -> Self {
        Self(keccak256_multi(&[
            issuer.as_bytes(),
            subject.as_bytes(),
            topic.as_bytes(),
        ]))
    }
}

impl Topic {
    /// ASCII label right-padded with zeros; labels over 32 bytes are truncated
    pub fn from_label(label: &str) -> Self {
        let mut bytes = [0u8; 32];
        let len = label.len().min(32);
        bytes[..len].copy_from_slice(&label.as_bytes()[..len]);
        Self(bytes)
    }
}

impl DataKey {
    /// Reserved key holding the proxy owner
    pub const OWNER: DataKey = DataKey::ZERO;

    /// Key derived from a label (keccak-256 of its bytes)
    pub fn from_label(label: &str) -> Self {
        Self(keccak256(label.as_bytes()))
    }
}

/// Classification of the credential scheme behind a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KeyType(pub u64);

impl KeyType {
    /// Absent key
    pub const NONE: KeyType = KeyType(0);
    /// ECDSA-style key (account address)
    pub const ECDSA: KeyType = KeyType(1);
    /// RSA key
    pub const RSA: KeyType = KeyType(2);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            KeyType::NONE => write!(f, "none"),
            KeyType::ECDSA => write!(f, "ECDSA"),
            KeyType::RSA => write!(f, "RSA"),
            KeyType(other) => write!(f, "type {}", other),
        }
    }
}

/// Serde helper for 20-byte arrays as hex strings
pub mod hex_bytes_20 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 20], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 20], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(&s), &mut bytes)
            .map_err(serde::de::Error::custom)?;
        Ok(bytes)
    }
}

/// Serde helper for 32-byte arrays as hex strings
pub mod hex_bytes_32 {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(&s), &mut bytes)
            .map_err(serde::de::Error::custom)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_public_key() {
        // Private key 1 maps to a well-known Ethereum address
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let signing_key = k256::ecdsa::SigningKey::from_slice(&secret).unwrap();
        let public = k256::PublicKey::from(signing_key.verifying_key());

        let address = Address::from_public_key(&public);
        assert_eq!(address.to_hex(), "7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    #[test]
    fn test_address_from_public_key_hex() {
        // Generator point, i.e. the public key of private key 1
        let compressed = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
        let expected = "7e5f4552091a69125d5dfcb7b8c2659029395bdf";
        assert_eq!(Address::from_public_key_hex(compressed).unwrap().to_hex(), expected);

        let mut secret = [0u8; 32];
        secret[31] = 1;
        let signing_key = k256::ecdsa::SigningKey::from_slice(&secret).unwrap();
        let uncompressed = signing_key.verifying_key().to_encoded_point(false);
        let prefixed = format!("0x{}", hex::encode(uncompressed.as_bytes()));
        assert_eq!(Address::from_public_key_hex(&prefixed).unwrap().to_hex(), expected);

        assert!(matches!(
            Address::from_public_key_hex("zz"),
            Err(IdentityError::InvalidPublicKey(_))
        ));
        assert!(matches!(
            Address::from_public_key_hex(&format!("04{}", "11".repeat(10))),
            Err(IdentityError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_address_hex_roundtrip() {
        let address = Address::new([0xab; 20]);
        assert_eq!(Address::from_hex(&address.to_string()).unwrap(), address);
        assert_eq!(Address::from_hex(&address.to_hex()).unwrap(), address);
    }

    #[test]
    fn test_contract_address_depends_on_nonce() {
        let creator = Address::new([0x42; 20]);
        let first = Address::for_contract(&creator, 0);
        assert_eq!(first, Address::for_contract(&creator, 0));
        assert_ne!(first, Address::for_contract(&creator, 1));
        assert!(!first.is_zero());
    }

    #[test]
    fn test_key_id_is_hash_of_address() {
        let address = Address::new([0x11; 20]);
        assert_eq!(KeyId::from_address(&address).0, keccak256(&[0x11; 20]));
        assert!(!KeyId::from_address(&Address::ZERO).is_zero());
    }

    #[test]
    fn test_claim_id_depends_on_every_input() {
        let issuer = Address::new([1; 20]);
        let subject = Address::new([2; 20]);
        let topic = Topic::from_label("address");

        let id = ClaimId::derive(&issuer, &subject, &topic);
        assert_eq!(id, ClaimId::derive(&issuer, &subject, &topic));
        assert_ne!(id, ClaimId::derive(&subject, &issuer, &topic));
        assert_ne!(id, ClaimId::derive(&issuer, &subject, &Topic::from_label("email")));
    }

    #[test]
    fn test_topic_label_padding() {
        let topic = Topic::from_label("address");
        assert_eq!(&topic.0[..7], b"address");
        assert!(topic.0[7..].iter().all(|&b| b == 0));

        let long = Topic::from_label(&"x".repeat(40));
        assert!(long.0.iter().all(|&b| b == b'x'));
    }

    #[test]
    fn test_word_serde_as_hex() {
        let key = DataKey::from_label("ProxyAccount");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key.to_hex()));
        assert_eq!(serde_json::from_str::<DataKey>(&json).unwrap(), key);
    }
}
