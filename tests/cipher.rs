use qkd_bb84::cipher::{decrypt, decrypt_to_string, encrypt, encrypt_str};
use qkd_bb84::errors::CipherError;
use qkd_bb84::{AcceptedKey, ProtocolConfig, exchange_key};
use rand::SeedableRng;
use rand::rngs::StdRng;

const MESSAGES: [&str; 4] = ["", "hello world", "héllo wörld ✓ 🔐", "a"];

fn keys() -> Vec<Vec<bool>> {
    vec![
        vec![true],
        vec![false],
        vec![true, false, true],
        vec![true; 11],
        (0..64).map(|i| i % 3 == 0).collect(),
    ]
}

#[test]
fn round_trip_for_every_key_and_message() {
    for key in keys() {
        for message in MESSAGES {
            let ct = encrypt(message.as_bytes(), &key).unwrap();
            assert_eq!(decrypt(&ct, &key).unwrap(), message.as_bytes());
            assert_eq!(
                decrypt_to_string(&encrypt_str(message, &key).unwrap(), &key).unwrap(),
                message
            );
        }
    }
}

#[test]
fn ciphertext_length_ignores_key_length() {
    for key in keys() {
        for message in MESSAGES {
            assert_eq!(encrypt(message.as_bytes(), &key).unwrap().len(), message.len());
        }
    }
}

#[test]
fn empty_key_is_invalid() {
    assert_eq!(encrypt_str("hello", &[]), Err(CipherError::InvalidKey));
    assert_eq!(decrypt_to_string(b"hello", &[]), Err(CipherError::InvalidKey));
}

#[test]
fn all_zero_key_is_identity() {
    let ct = encrypt(b"plain", &[false, false]).unwrap();
    assert_eq!(ct, b"plain");
}

#[test]
fn established_key_encrypts_and_survives_persistence() {
    let config = ProtocolConfig {
        qubit_count: 64,
        eve_present: false,
        noise_probability: 0.0,
        ..Default::default()
    };
    let exchange = exchange_key(&config, &mut StdRng::seed_from_u64(77)).unwrap();
    let key = exchange.outcome.into_key().unwrap();
    assert!(!key.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("key.txt");
    std::fs::write(&path, key.to_string()).unwrap();
    let restored: AcceptedKey = std::fs::read_to_string(&path).unwrap().parse().unwrap();
    assert_eq!(restored, key);

    let ct = encrypt_str("hello world", key.bits()).unwrap();
    assert_eq!(decrypt_to_string(&ct, restored.bits()).unwrap(), "hello world");
}
