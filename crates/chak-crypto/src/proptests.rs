#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use crate::codec::{
        decode_bytes, decode_key, decode_nonce, encode_bytes, encode_key, encode_nonce,
    };
    use crate::envelope::{decrypt_message, encrypt_message_with};
    use crate::error::CryptoError;
    use crate::exchange::{derive_shared_secret, derive_symmetric_key};
    use crate::keys::{generate_key_pair_with, KeyPair};
    use crate::symmetric::{decrypt_symmetric, encrypt_symmetric_with};

    fn key_pair(seed: u64) -> KeyPair {
        generate_key_pair_with(&mut ChaCha20Rng::seed_from_u64(seed)).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_message_round_trip(
            seed in any::<u64>(),
            msg in "\\PC{1,256}",
        ) {
            let recipient = key_pair(seed);
            let mut rng = ChaCha20Rng::seed_from_u64(seed.wrapping_add(1));

            let env = encrypt_message_with(&mut rng, &msg, recipient.public_key()).unwrap();
            prop_assert_eq!(decrypt_message(&env, recipient.private_key()).unwrap(), msg);
        }

        #[test]
        fn test_key_codec_round_trip(key in any::<[u8; 32]>()) {
            let text = encode_key(&key);
            prop_assert_eq!(decode_key(&text).unwrap(), key);
        }

        #[test]
        fn test_wrong_length_keys_rejected(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            prop_assume!(bytes.len() != 32);
            let text = encode_bytes(&bytes);
            let is_length_error = matches!(
                decode_key(&text),
                Err(CryptoError::InvalidLength { .. })
            );
            prop_assert!(is_length_error);
        }

        #[test]
        fn test_ecdh_commutes(a in any::<u64>(), b in any::<u64>()) {
            let a = key_pair(a);
            let b = key_pair(b);

            prop_assert_eq!(
                derive_shared_secret(a.private_key(), b.public_key()),
                derive_shared_secret(b.private_key(), a.public_key())
            );
            prop_assert_eq!(
                derive_symmetric_key(a.private_key(), b.public_key()).unwrap(),
                derive_symmetric_key(b.private_key(), a.public_key()).unwrap()
            );
        }

        #[test]
        fn test_symmetric_round_trip(
            key in any::<[u8; 32]>(),
            seed in any::<u64>(),
            msg in "\\PC{1,256}",
        ) {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let ct = encrypt_symmetric_with(&mut rng, &msg, &key).unwrap();
            prop_assert_eq!(decrypt_symmetric(&ct, &key).unwrap(), msg);
        }

        #[test]
        fn test_any_ciphertext_bit_flip_rejected(
            seed in any::<u64>(),
            msg in "\\PC{1,64}",
            index in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let recipient = key_pair(seed);
            let mut rng = ChaCha20Rng::seed_from_u64(seed ^ 0x5a5a);
            let mut env = encrypt_message_with(&mut rng, &msg, recipient.public_key()).unwrap();

            let mut ct = decode_bytes("ciphertext", &env.ciphertext).unwrap();
            let i = index.index(ct.len());
            ct[i] ^= 1 << bit;
            env.ciphertext = encode_bytes(&ct);

            prop_assert_eq!(
                decrypt_message(&env, recipient.private_key()),
                Err(CryptoError::Authentication)
            );
        }

        #[test]
        fn test_any_nonce_bit_flip_rejected(
            seed in any::<u64>(),
            msg in "\\PC{1,64}",
            index in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let recipient = key_pair(seed);
            let mut rng = ChaCha20Rng::seed_from_u64(seed ^ 0xa5a5);
            let mut env = encrypt_message_with(&mut rng, &msg, recipient.public_key()).unwrap();

            let mut nonce = decode_nonce(&env.nonce).unwrap();
            nonce[index.index(nonce.len())] ^= 1 << bit;
            env.nonce = encode_nonce(&nonce);

            prop_assert_eq!(
                decrypt_message(&env, recipient.private_key()),
                Err(CryptoError::Authentication)
            );
        }

        #[test]
        fn test_any_ephemeral_bit_flip_rejected(
            seed in any::<u64>(),
            msg in "\\PC{1,64}",
            index in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let recipient = key_pair(seed);
            let mut rng = ChaCha20Rng::seed_from_u64(seed ^ 0x3c3c);
            let mut env = encrypt_message_with(&mut rng, &msg, recipient.public_key()).unwrap();

            let mut ephemeral = decode_key(&env.ephemeral_public_key).unwrap();
            ephemeral[index.index(ephemeral.len())] ^= 1 << bit;
            env.ephemeral_public_key = encode_key(&ephemeral);

            prop_assert_eq!(
                decrypt_message(&env, recipient.private_key()),
                Err(CryptoError::Authentication)
            );
        }

        #[test]
        fn test_any_symmetric_bit_flip_rejected(
            key in any::<[u8; 32]>(),
            msg in "\\PC{1,64}",
            index in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut rng = ChaCha20Rng::seed_from_u64(7);
            let ct = encrypt_symmetric_with(&mut rng, &msg, &key).unwrap();

            let mut blob = decode_bytes("symmetric ciphertext", &ct).unwrap();
            let i = index.index(blob.len());
            blob[i] ^= 1 << bit;

            prop_assert_eq!(
                decrypt_symmetric(&encode_bytes(&blob), &key),
                Err(CryptoError::Authentication)
            );
        }
    }
}
