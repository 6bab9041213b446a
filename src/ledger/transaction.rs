//! Transaction intents, signing payloads and broadcast bodies
//!
//! An intent describes what a step wants to do. [`UnsignedTransaction`] adds
//! fee, version, timestamp and chain, and [`UnsignedTransaction::sign`] binds
//! it to an account. Signed transactions are never mutated.

use super::account::{Account, Address};
use crate::errors::{LedgerError, LedgerResult};
use serde_json::{json, Map, Value};
use std::fmt;

/// Default version for every kind
pub const DEFAULT_VERSION: u8 = 3;

/// Key type byte for ed25519
const KEY_TYPE_ED25519: u8 = 1;

/// Kinds of transaction the scenarios issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Transfer,
    Anchor,
    Lease,
    CancelLease,
    Sponsorship,
    CancelSponsorship,
    Association,
    RevokeAssociation,
}

impl TransactionKind {
    /// Numeric type id on the wire
    pub fn type_id(self) -> u8 {
        match self {
            TransactionKind::Transfer => 4,
            TransactionKind::Lease => 8,
            TransactionKind::CancelLease => 9,
            TransactionKind::Anchor => 15,
            TransactionKind::Association => 16,
            TransactionKind::RevokeAssociation => 17,
            TransactionKind::Sponsorship => 18,
            TransactionKind::CancelSponsorship => 19,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TransactionKind::Transfer => "transfer",
            TransactionKind::Anchor => "anchor",
            TransactionKind::Lease => "lease",
            TransactionKind::CancelLease => "cancel lease",
            TransactionKind::Sponsorship => "sponsorship",
            TransactionKind::CancelSponsorship => "cancel sponsorship",
            TransactionKind::Association => "association",
            TransactionKind::RevokeAssociation => "revoke association",
        }
    }

    /// Versions with a known binary layout
    pub fn supports_version(self, version: u8) -> bool {
        match self {
            TransactionKind::Association | TransactionKind::RevokeAssociation => {
                version == 1 || version == 3
            }
            _ => version == 3,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a transaction should do, with the fields its kind requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionIntent {
    Transfer {
        recipient: Address,
        amount: u64,
        attachment: Vec<u8>,
    },
    Anchor {
        anchors: Vec<Vec<u8>>,
    },
    Lease {
        recipient: Address,
        amount: u64,
    },
    CancelLease {
        lease_id: String,
    },
    Sponsorship {
        recipient: Address,
    },
    CancelSponsorship {
        recipient: Address,
    },
    Association {
        party: Address,
        association_type: u64,
        anchor: Option<Vec<u8>>,
    },
    RevokeAssociation {
        party: Address,
        association_type: u64,
        anchor: Option<Vec<u8>>,
    },
}

impl TransactionIntent {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionIntent::Transfer { .. } => TransactionKind::Transfer,
            TransactionIntent::Anchor { .. } => TransactionKind::Anchor,
            TransactionIntent::Lease { .. } => TransactionKind::Lease,
            TransactionIntent::CancelLease { .. } => TransactionKind::CancelLease,
            TransactionIntent::Sponsorship { .. } => TransactionKind::Sponsorship,
            TransactionIntent::CancelSponsorship { .. } => TransactionKind::CancelSponsorship,
            TransactionIntent::Association { .. } => TransactionKind::Association,
            TransactionIntent::RevokeAssociation { .. } => TransactionKind::RevokeAssociation,
        }
    }

    /// Counterpart account, when the kind has one
    pub fn counterpart(&self) -> Option<&Address> {
        match self {
            TransactionIntent::Transfer { recipient, .. }
            | TransactionIntent::Lease { recipient, .. }
            | TransactionIntent::Sponsorship { recipient }
            | TransactionIntent::CancelSponsorship { recipient } => Some(recipient),
            TransactionIntent::Association { party, .. }
            | TransactionIntent::RevokeAssociation { party, .. } => Some(party),
            TransactionIntent::Anchor { .. } | TransactionIntent::CancelLease { .. } => None,
        }
    }

    /// Amount moved or locked, zero for kinds that only pay a fee
    pub fn amount(&self) -> u64 {
        match self {
            TransactionIntent::Transfer { amount, .. } | TransactionIntent::Lease { amount, .. } => {
                *amount
            }
            _ => 0,
        }
    }
}

/// Intent plus the envelope fields, ready to be signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub intent: TransactionIntent,
    pub version: u8,
    pub fee: u64,
    pub timestamp: u64,
    pub chain_id: u8,
}

impl UnsignedTransaction {
    /// Build with the current time, rejecting versions with no known layout
    pub fn new(intent: TransactionIntent, fee: u64, version: u8, chain_id: u8) -> LedgerResult<Self> {
        let kind = intent.kind();
        if !kind.supports_version(version) {
            return Err(LedgerError::UnsupportedVersion {
                kind: kind.name(),
                version,
            });
        }
        Ok(Self {
            intent,
            version,
            fee,
            timestamp: chrono::Utc::now().timestamp_millis() as u64,
            chain_id,
        })
    }

    pub fn kind(&self) -> TransactionKind {
        self.intent.kind()
    }

    /// Bytes covered by the sender's signature
    pub fn signing_payload(&self, sender_public_key: &[u8; 32]) -> LedgerResult<Vec<u8>> {
        if self.version == 1 {
            return self.v1_association_payload(sender_public_key);
        }

        let mut buf = Vec::with_capacity(128);
        buf.push(self.kind().type_id());
        buf.push(self.version);
        buf.push(self.chain_id);
        write_u64(&mut buf, self.timestamp);
        buf.push(KEY_TYPE_ED25519);
        buf.extend_from_slice(sender_public_key);
        write_u64(&mut buf, self.fee);

        match &self.intent {
            TransactionIntent::Transfer {
                recipient,
                amount,
                attachment,
            } => {
                buf.extend_from_slice(&recipient.to_bytes()?);
                write_u64(&mut buf, *amount);
                write_sized(&mut buf, "attachment", attachment)?;
            }
            TransactionIntent::Anchor { anchors } => {
                let count = u16::try_from(anchors.len()).map_err(|_| LedgerError::FieldTooLong {
                    field: "anchors",
                    len: anchors.len(),
                })?;
                write_u16(&mut buf, count);
                for anchor in anchors {
                    write_sized(&mut buf, "anchor", anchor)?;
                }
            }
            TransactionIntent::Lease { recipient, amount } => {
                buf.extend_from_slice(&recipient.to_bytes()?);
                write_u64(&mut buf, *amount);
            }
            TransactionIntent::CancelLease { lease_id } => {
                buf.extend_from_slice(&decode_lease_id(lease_id)?);
            }
            TransactionIntent::Sponsorship { recipient }
            | TransactionIntent::CancelSponsorship { recipient } => {
                buf.extend_from_slice(&recipient.to_bytes()?);
            }
            TransactionIntent::Association {
                party,
                association_type,
                anchor,
            } => {
                buf.extend_from_slice(&party.to_bytes()?);
                write_u64(&mut buf, *association_type);
                // No expiry
                write_u64(&mut buf, 0);
                write_sized(&mut buf, "anchor", anchor.as_deref().unwrap_or_default())?;
            }
            TransactionIntent::RevokeAssociation {
                party,
                association_type,
                anchor,
            } => {
                buf.extend_from_slice(&party.to_bytes()?);
                write_u64(&mut buf, *association_type);
                write_sized(&mut buf, "anchor", anchor.as_deref().unwrap_or_default())?;
            }
        }

        Ok(buf)
    }

    fn v1_association_payload(&self, sender_public_key: &[u8; 32]) -> LedgerResult<Vec<u8>> {
        let (party, association_type, anchor) = match &self.intent {
            TransactionIntent::Association {
                party,
                association_type,
                anchor,
            }
            | TransactionIntent::RevokeAssociation {
                party,
                association_type,
                anchor,
            } => (party, *association_type, anchor),
            other => {
                return Err(LedgerError::UnsupportedVersion {
                    kind: other.kind().name(),
                    version: 1,
                })
            }
        };
        let association_type =
            u32::try_from(association_type).map_err(|_| LedgerError::FieldTooLong {
                field: "association_type",
                len: 8,
            })?;

        let mut buf = Vec::with_capacity(96);
        buf.push(self.kind().type_id());
        buf.push(1);
        buf.push(self.chain_id);
        buf.extend_from_slice(sender_public_key);
        buf.extend_from_slice(&party.to_bytes()?);
        write_u32(&mut buf, association_type);
        match anchor {
            Some(anchor) if !anchor.is_empty() => {
                buf.push(1);
                write_sized(&mut buf, "anchor", anchor)?;
            }
            _ => buf.push(0),
        }
        write_u64(&mut buf, self.timestamp);
        write_u64(&mut buf, self.fee);
        Ok(buf)
    }

    /// Sign with the sender account
    pub fn sign(self, sender: &Account) -> LedgerResult<SignedTransaction> {
        let public_key = sender.public_key().to_bytes();
        let payload = self.signing_payload(&public_key)?;
        let proof = sender.sign(&payload).to_bytes();
        Ok(SignedTransaction {
            unsigned: self,
            sender: sender.address().clone(),
            sender_public_key: public_key,
            proof,
        })
    }
}

/// A transaction bound to its sender by an ed25519 proof
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    unsigned: UnsignedTransaction,
    sender: Address,
    sender_public_key: [u8; 32],
    proof: [u8; 64],
}

impl SignedTransaction {
    pub fn intent(&self) -> &TransactionIntent {
        &self.unsigned.intent
    }

    pub fn kind(&self) -> TransactionKind {
        self.unsigned.kind()
    }

    pub fn version(&self) -> u8 {
        self.unsigned.version
    }

    pub fn fee(&self) -> u64 {
        self.unsigned.fee
    }

    pub fn timestamp(&self) -> u64 {
        self.unsigned.timestamp
    }

    pub fn sender(&self) -> &Address {
        &self.sender
    }

    pub fn sender_public_key(&self) -> &[u8; 32] {
        &self.sender_public_key
    }

    pub fn proof(&self) -> &[u8; 64] {
        &self.proof
    }

    /// Check the proof against the sender key and the signing payload
    pub fn verify(&self) -> bool {
        let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(&self.sender_public_key) else {
            return false;
        };
        let Ok(payload) = self.unsigned.signing_payload(&self.sender_public_key) else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&self.proof);
        key.verify_strict(&payload, &signature).is_ok()
    }

    /// JSON body for the broadcast endpoint
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("type".into(), json!(self.kind().type_id()));
        body.insert("version".into(), json!(self.unsigned.version));
        body.insert("sender".into(), json!(self.sender.as_str()));
        body.insert("senderKeyType".into(), json!("ed25519"));
        body.insert(
            "senderPublicKey".into(),
            json!(bs58::encode(self.sender_public_key).into_string()),
        );
        body.insert("fee".into(), json!(self.unsigned.fee));
        body.insert("timestamp".into(), json!(self.unsigned.timestamp));
        body.insert(
            "proofs".into(),
            json!([bs58::encode(self.proof).into_string()]),
        );

        match &self.unsigned.intent {
            TransactionIntent::Transfer {
                recipient,
                amount,
                attachment,
            } => {
                body.insert("recipient".into(), json!(recipient.as_str()));
                body.insert("amount".into(), json!(amount));
                body.insert(
                    "attachment".into(),
                    json!(bs58::encode(attachment).into_string()),
                );
            }
            TransactionIntent::Anchor { anchors } => {
                let encoded: Vec<String> = anchors
                    .iter()
                    .map(|a| bs58::encode(a).into_string())
                    .collect();
                body.insert("anchors".into(), json!(encoded));
            }
            TransactionIntent::Lease { recipient, amount } => {
                body.insert("recipient".into(), json!(recipient.as_str()));
                body.insert("amount".into(), json!(amount));
            }
            TransactionIntent::CancelLease { lease_id } => {
                body.insert("leaseId".into(), json!(lease_id));
            }
            TransactionIntent::Sponsorship { recipient }
            | TransactionIntent::CancelSponsorship { recipient } => {
                body.insert("recipient".into(), json!(recipient.as_str()));
            }
            TransactionIntent::Association {
                party,
                association_type,
                anchor,
            }
            | TransactionIntent::RevokeAssociation {
                party,
                association_type,
                anchor,
            } => {
                body.insert("party".into(), json!(party.as_str()));
                body.insert("associationType".into(), json!(association_type));
                if let Some(anchor) = anchor.as_ref().filter(|a| !a.is_empty()) {
                    body.insert("hash".into(), json!(bs58::encode(anchor).into_string()));
                }
            }
        }

        Value::Object(body)
    }
}

fn write_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn write_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn write_u64(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// u16 length prefix followed by the bytes
fn write_sized(buf: &mut Vec<u8>, field: &'static str, data: &[u8]) -> LedgerResult<()> {
    let len = u16::try_from(data.len()).map_err(|_| LedgerError::FieldTooLong {
        field,
        len: data.len(),
    })?;
    write_u16(buf, len);
    buf.extend_from_slice(data);
    Ok(())
}

fn decode_lease_id(lease_id: &str) -> LedgerResult<[u8; 32]> {
    let raw = bs58::decode(lease_id)
        .into_vec()
        .map_err(|_| LedgerError::InvalidLeaseId(lease_id.to_string()))?;
    raw.try_into()
        .map_err(|_| LedgerError::InvalidLeaseId(lease_id.to_string()))
}
