//! AOS ring signatures over secp256k1.
//!
//! Signing hides the signer among the ring members by chaining Schnorr-style
//! challenges around the ring:
//!
//! ```text
//! c[start] = H(m || ring || k*G)                       start = signer + 1
//! c[j+1]   = H(m || ring || s[j]*G + c[j]*P[j])        every decoy j
//! s[idx]   = k - c[idx]*x                              closes the ring
//! ```
//!
//! Only `c[0]` and the responses are published. A verifier walks the chain from
//! index 0 and accepts when it lands back on `c[0]`.

use crate::constants::{COMPRESSED_POINT_BYTES, MIN_RING_SIZE};
use crate::curve::{self, Point};
use crate::errors::PrivacyError;
use crate::keys::{KeyPair, PrivateKey, PublicKey};
use k256::Scalar;
use rand::seq::SliceRandom;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordered ring of public keys. The order is part of every challenge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(Vec<PublicKey>);

impl Ring {
    pub fn new(members: Vec<PublicKey>) -> Self {
        Self(members)
    }

    pub fn from_hex<S: AsRef<str>>(keys: &[S]) -> Result<Self, PrivacyError> {
        keys.iter()
            .map(|k| PublicKey::from_hex(k.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn members(&self) -> &[PublicKey] {
        &self.0
    }

    pub fn position(&self, key: &PublicKey) -> Option<usize> {
        self.0.iter().position(|member| member == key)
    }

    pub fn to_hex(&self) -> Vec<String> {
        self.0.iter().map(PublicKey::to_hex).collect()
    }

    /// Concatenated compressed encodings, in ring order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len() * COMPRESSED_POINT_BYTES);
        for member in &self.0 {
            out.extend_from_slice(member.as_bytes());
        }
        out
    }
}

/// Published ring signature: the index-0 challenge and one response per member,
/// each a 64-character hex scalar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingSignature {
    pub c0: String,
    pub s: Vec<String>,
}

/// Result of signing: the exact ring that was hashed plus the signature over it.
///
/// When the signer was missing from the input ring it is appended, so `ring`
/// must be transmitted instead of the caller's original list.
#[derive(Clone, Debug)]
pub struct SignedRing {
    pub ring: Ring,
    pub signature: RingSignature,
    pub signer_appended: bool,
}

pub fn generate_keypair(rng: &mut (impl RngCore + CryptoRng)) -> Result<KeyPair, PrivacyError> {
    let private_key = PrivateKey::from_scalar(curve::random_nonzero_scalar(rng)?)?;
    let public_key = private_key.public_key();
    Ok(KeyPair { private_key, public_key })
}

fn challenge(message: &[u8], ring_bytes: &[u8], commitment: &Point) -> Scalar {
    let commitment = curve::serialize_compressed(commitment);
    curve::hash_to_scalar(&[message, ring_bytes, &commitment])
}

/// `s*G + c*P`, the commitment a verifier reconstructs at each ring index.
fn reconstruct_commitment(s: &Scalar, c: &Scalar, member: &PublicKey) -> Point {
    curve::point_add(
        &curve::scalar_base_mul(s),
        &curve::point_scalar_mul(member.point(), c),
    )
}

pub fn sign(
    rng: &mut (impl RngCore + CryptoRng),
    message: &[u8],
    private_key: &PrivateKey,
    ring: &Ring,
) -> Result<SignedRing, PrivacyError> {
    if ring.len() < MIN_RING_SIZE {
        return Err(PrivacyError::RingTooSmall { got: ring.len(), min: MIN_RING_SIZE });
    }

    let x = private_key.scalar();
    let own_key = private_key.public_key();

    let mut ring = ring.clone();
    let (idx, signer_appended) = match ring.position(&own_key) {
        Some(idx) => (idx, false),
        None => {
            ring.0.push(own_key);
            (ring.len() - 1, true)
        }
    };

    let n = ring.len();
    let start = (idx + 1) % n;
    let ring_bytes = ring.to_bytes();

    let k = curve::random_nonzero_scalar(rng)?;
    let mut c = vec![Scalar::ZERO; n];
    let mut s = vec![Scalar::ZERO; n];

    c[start] = challenge(message, &ring_bytes, &curve::scalar_base_mul(&k));

    // n >= 2, so start != idx and the walk visits every decoy exactly once.
    let mut j = start;
    while j != idx {
        s[j] = curve::random_nonzero_scalar(rng)?;
        let commitment = reconstruct_commitment(&s[j], &c[j], &ring.0[j]);
        let next = (j + 1) % n;
        c[next] = challenge(message, &ring_bytes, &commitment);
        j = next;
    }

    s[idx] = k - c[idx] * *x;

    debug!(ring_size = n, signer_appended, "ring signature created");

    Ok(SignedRing {
        ring,
        signature: RingSignature {
            c0: hex::encode(curve::scalar_to_bytes(&c[0])),
            s: s.iter().map(|si| hex::encode(curve::scalar_to_bytes(si))).collect(),
        },
        signer_appended,
    })
}

fn decode_scalar(label: &str, value: &str) -> Result<Scalar, PrivacyError> {
    let bytes = hex::decode(value)
        .map_err(|e| PrivacyError::MalformedSignature(format!("{label}: {e}")))?;
    curve::scalar_from_bytes(&bytes).ok_or_else(|| {
        PrivacyError::MalformedSignature(format!("{label}: not a canonical 32-byte scalar"))
    })
}

/// Returns `Ok(false)` for a well-formed signature that does not verify.
pub fn verify(message: &[u8], ring: &Ring, signature: &RingSignature) -> Result<bool, PrivacyError> {
    let n = ring.len();
    if n < MIN_RING_SIZE {
        return Err(PrivacyError::RingTooSmall { got: n, min: MIN_RING_SIZE });
    }
    if signature.s.len() != n {
        return Err(PrivacyError::MalformedSignature(format!(
            "expected {n} responses, got {}",
            signature.s.len()
        )));
    }

    let c0 = decode_scalar("c0", &signature.c0)?;
    let s = signature
        .s
        .iter()
        .enumerate()
        .map(|(i, si)| decode_scalar(&format!("s[{i}]"), si))
        .collect::<Result<Vec<_>, _>>()?;

    let ring_bytes = ring.to_bytes();
    let mut c = c0;
    for (member, si) in ring.0.iter().zip(&s) {
        let commitment = reconstruct_commitment(si, &c, member);
        c = challenge(message, &ring_bytes, &commitment);
    }

    Ok(c == c0)
}

/// Build a ring of `target_size` members around `own_key`.
///
/// Distinct candidates are taken in order, the remainder is filled with fresh
/// decoy keys whose secrets are discarded, and the result is shuffled.
pub fn assemble_ring(
    rng: &mut (impl RngCore + CryptoRng),
    own_key: &PublicKey,
    candidates: &[PublicKey],
    target_size: usize,
) -> Result<Ring, PrivacyError> {
    if target_size < MIN_RING_SIZE {
        return Err(PrivacyError::RingTooSmall { got: target_size, min: MIN_RING_SIZE });
    }

    let mut members = Vec::with_capacity(target_size);
    members.push(*own_key);
    for candidate in candidates {
        if members.len() == target_size {
            break;
        }
        if !members.contains(candidate) {
            members.push(*candidate);
        }
    }

    let from_candidates = members.len() - 1;
    while members.len() < target_size {
        members.push(generate_keypair(rng)?.public_key);
    }
    members.shuffle(rng);

    debug!(ring_size = target_size, from_candidates, "ring assembled");
    Ok(Ring(members))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const MESSAGE: &[u8] = b"ring42|5.234|6.12";

    fn keypairs(rng: &mut ChaCha20Rng, n: usize) -> Vec<KeyPair> {
        (0..n).map(|_| generate_keypair(rng).unwrap()).collect()
    }

    fn ring_of(pairs: &[KeyPair]) -> Ring {
        Ring::new(pairs.iter().map(|kp| kp.public_key).collect())
    }

    /// Flip one byte of a hex-encoded scalar.
    fn flip_byte(hex_scalar: &str, byte: usize) -> String {
        let mut bytes = hex::decode(hex_scalar).unwrap();
        bytes[byte] ^= 0x01;
        hex::encode(bytes)
    }

    #[test]
    fn signs_and_verifies_at_every_position() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let pairs = keypairs(&mut rng, 5);
        let ring = ring_of(&pairs);

        for signer in &pairs {
            let signed = sign(&mut rng, MESSAGE, &signer.private_key, &ring).unwrap();
            assert!(!signed.signer_appended);
            assert_eq!(signed.ring, ring);
            assert_eq!(signed.signature.s.len(), ring.len());
            assert!(verify(MESSAGE, &signed.ring, &signed.signature).unwrap());
        }
    }

    #[test]
    fn absent_signer_is_appended_last() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let pairs = keypairs(&mut rng, 3);
        let outsider = generate_keypair(&mut rng).unwrap();
        let ring = ring_of(&pairs);

        let signed = sign(&mut rng, MESSAGE, &outsider.private_key, &ring).unwrap();
        assert!(signed.signer_appended);
        assert_eq!(signed.ring.len(), 4);
        assert_eq!(signed.ring.position(&outsider.public_key), Some(3));
        assert!(verify(MESSAGE, &signed.ring, &signed.signature).unwrap());

        // The caller's original ring no longer matches the hashed membership.
        assert!(matches!(
            verify(MESSAGE, &ring, &signed.signature),
            Err(PrivacyError::MalformedSignature(_))
        ));
    }

    #[test]
    fn signer_at_last_index_starts_the_chain_at_zero() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let pairs = keypairs(&mut rng, 2);
        let ring = ring_of(&pairs);

        let signed = sign(&mut rng, MESSAGE, &pairs[1].private_key, &ring).unwrap();
        assert!(verify(MESSAGE, &ring, &signed.signature).unwrap());
    }

    #[test]
    fn rejects_small_rings() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let pairs = keypairs(&mut rng, 1);

        assert_eq!(
            sign(&mut rng, MESSAGE, &pairs[0].private_key, &Ring::default()).unwrap_err(),
            PrivacyError::RingTooSmall { got: 0, min: 2 }
        );
        assert_eq!(
            sign(&mut rng, MESSAGE, &pairs[0].private_key, &ring_of(&pairs)).unwrap_err(),
            PrivacyError::RingTooSmall { got: 1, min: 2 }
        );
    }

    #[test]
    fn size_is_checked_before_the_signer_is_appended() {
        let mut rng = ChaCha20Rng::seed_from_u64(40);
        let pairs = keypairs(&mut rng, 2);
        let lone_decoy = Ring::new(vec![pairs[0].public_key]);

        assert_eq!(
            sign(&mut rng, MESSAGE, &pairs[1].private_key, &lone_decoy).unwrap_err(),
            PrivacyError::RingTooSmall { got: 1, min: 2 }
        );
    }

    #[test]
    fn tampering_any_scalar_fails_verification() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let pairs = keypairs(&mut rng, 3);
        let ring = ring_of(&pairs);
        let signed = sign(&mut rng, MESSAGE, &pairs[0].private_key, &ring).unwrap();

        for byte in [1usize, 16, 31] {
            let mut bad = signed.signature.clone();
            bad.c0 = flip_byte(&bad.c0, byte);
            assert!(!verify(MESSAGE, &ring, &bad).unwrap());

            for i in 0..ring.len() {
                let mut bad = signed.signature.clone();
                bad.s[i] = flip_byte(&bad.s[i], byte);
                assert!(!verify(MESSAGE, &ring, &bad).unwrap());
            }
        }
    }

    #[test]
    fn different_message_or_order_fails() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let pairs = keypairs(&mut rng, 3);
        let ring = ring_of(&pairs);
        let signed = sign(&mut rng, MESSAGE, &pairs[2].private_key, &ring).unwrap();

        assert!(!verify(b"ring42|5.234|6.13", &ring, &signed.signature).unwrap());

        let mut reordered: Vec<_> = ring.members().to_vec();
        reordered.swap(0, 1);
        assert!(!verify(MESSAGE, &Ring::new(reordered), &signed.signature).unwrap());
    }

    #[test]
    fn malformed_signatures_are_errors() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let pairs = keypairs(&mut rng, 3);
        let ring = ring_of(&pairs);
        let signed = sign(&mut rng, MESSAGE, &pairs[0].private_key, &ring).unwrap();

        let mut short = signed.signature.clone();
        short.s.pop();
        assert!(matches!(
            verify(MESSAGE, &ring, &short),
            Err(PrivacyError::MalformedSignature(_))
        ));

        let mut bad_hex = signed.signature.clone();
        bad_hex.c0 = "not-hex".to_string();
        assert!(matches!(
            verify(MESSAGE, &ring, &bad_hex),
            Err(PrivacyError::MalformedSignature(_))
        ));

        let mut over_order = signed.signature.clone();
        over_order.s[1] = "ff".repeat(32);
        assert!(matches!(
            verify(MESSAGE, &ring, &over_order),
            Err(PrivacyError::MalformedSignature(_))
        ));
    }

    #[test]
    fn signature_serializes_as_hex_fields() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let pairs = keypairs(&mut rng, 2);
        let signed = sign(&mut rng, MESSAGE, &pairs[0].private_key, &ring_of(&pairs)).unwrap();

        let json = serde_json::to_value(&signed.signature).unwrap();
        assert_eq!(json["c0"].as_str().unwrap().len(), 64);
        assert_eq!(json["s"].as_array().unwrap().len(), 2);

        let ring_json = serde_json::to_value(&signed.ring).unwrap();
        assert_eq!(ring_json[0].as_str().unwrap().len(), 66);
    }

    #[test]
    fn assembled_ring_contains_owner_once_and_has_target_size() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let own = generate_keypair(&mut rng).unwrap().public_key;
        let others: Vec<_> = keypairs(&mut rng, 2).into_iter().map(|kp| kp.public_key).collect();
        let candidates = vec![others[0], own, others[0], others[1]];

        let ring = assemble_ring(&mut rng, &own, &candidates, 5).unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.members().iter().filter(|m| **m == own).count(), 1);
        assert!(ring.position(&others[0]).is_some());
        assert!(ring.position(&others[1]).is_some());

        assert_eq!(
            assemble_ring(&mut rng, &own, &[], 1).unwrap_err(),
            PrivacyError::RingTooSmall { got: 1, min: 2 }
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 16, ..ProptestConfig::default() })]

        #[test]
        fn any_signer_position_round_trips(seed in any::<u64>(), n in 2usize..7, pick in any::<usize>()) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let pairs = keypairs(&mut rng, n);
            let ring = ring_of(&pairs);
            let signer = &pairs[pick % n];

            let signed = sign(&mut rng, MESSAGE, &signer.private_key, &ring).unwrap();
            prop_assert_eq!(signed.signature.s.len(), n);
            prop_assert!(verify(MESSAGE, &signed.ring, &signed.signature).unwrap());
        }
    }
}
