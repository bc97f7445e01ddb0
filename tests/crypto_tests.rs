//! Integration tests for the todovault crypto module.

use todovault::crypto::{
    decrypt, derive_key, encrypt, generate_params, KdfAlgorithm, KdfParams, KdfSettings,
};
use todovault::errors::TodoVaultError;

fn cheap_kdf() -> KdfSettings {
    KdfSettings {
        n: 1 << 10,
        ..KdfSettings::scrypt()
    }
}

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let plaintexts: [&[u8]; 3] = [
        b"",
        br#"{"next_id":2,"tasks":[{"id":1,"text":"buy milk","done":false}]}"#,
        "ünïcødé ✓ tasks".as_bytes(),
    ];

    for plaintext in plaintexts {
        let sealed = encrypt(b"hunter2", plaintext, &cheap_kdf()).expect("encrypt");
        let recovered =
            decrypt(b"hunter2", &sealed.kdf, &sealed.nonce, &sealed.ciphertext).expect("decrypt");
        assert_eq!(recovered.as_slice(), plaintext);
    }
}

#[test]
fn decrypt_with_wrong_password_fails() {
    let sealed = encrypt(b"right", b"TOP_SECRET", &cheap_kdf()).expect("encrypt");

    for wrong in [&b"wrong"[..], b"Right", b"right\n", b""] {
        let result = decrypt(wrong, &sealed.kdf, &sealed.nonce, &sealed.ciphertext);
        assert!(matches!(result, Err(TodoVaultError::AuthenticationFailed)));
    }
}

#[test]
fn tampered_ciphertext_and_wrong_password_look_the_same() {
    let sealed = encrypt(b"pw", b"payload", &cheap_kdf()).unwrap();

    let mut tampered = sealed.ciphertext.clone();
    tampered[0] ^= 0x80;
    let tamper_err = decrypt(b"pw", &sealed.kdf, &sealed.nonce, &tampered).unwrap_err();
    let password_err =
        decrypt(b"nope", &sealed.kdf, &sealed.nonce, &sealed.ciphertext).unwrap_err();

    assert_eq!(tamper_err.to_string(), password_err.to_string());
}

#[test]
fn historical_cost_settings_still_decrypt() {
    // Seal with one cost, then decrypt without knowing it up front.
    let old_cost = KdfSettings {
        n: 1 << 11,
        r: 4,
        p: 2,
        ..KdfSettings::scrypt()
    };
    let sealed = encrypt(b"pw", b"old vault", &old_cost).unwrap();
    assert_eq!(sealed.kdf.n, 2048);
    assert_eq!(sealed.kdf.r, 4);
    assert_eq!(sealed.kdf.p, 2);

    let plain = decrypt(b"pw", &sealed.kdf, &sealed.nonce, &sealed.ciphertext).unwrap();
    assert_eq!(plain.as_slice(), b"old vault");
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derive_key_known_vector_is_stable() {
    let params = KdfParams {
        name: KdfAlgorithm::Scrypt,
        n: 1 << 10,
        r: 8,
        p: 1,
        salt: vec![7u8; 16],
    };
    let a = derive_key(b"password", &params).unwrap();
    let b = derive_key(b"password", &params).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
    assert_eq!(a.as_bytes().len(), 32);
    assert_ne!(a.as_bytes(), &[0u8; 32]);
}

#[test]
fn scrypt_and_argon2_give_different_keys() {
    let salt = vec![9u8; 16];
    let scrypt = KdfParams {
        name: KdfAlgorithm::Scrypt,
        n: 1 << 10,
        r: 8,
        p: 1,
        salt: salt.clone(),
    };
    let argon = KdfParams {
        name: KdfAlgorithm::Argon2id,
        n: 8_192,
        r: 1,
        p: 1,
        salt,
    };
    let k1 = derive_key(b"pw", &scrypt).unwrap();
    let k2 = derive_key(b"pw", &argon).unwrap();
    assert_ne!(k1.as_bytes(), k2.as_bytes());
}

#[test]
fn generate_params_never_repeats_salt() {
    let mut salts = std::collections::HashSet::new();
    for _ in 0..100 {
        let params = generate_params(&cheap_kdf()).unwrap();
        assert!(salts.insert(params.salt));
    }
}

#[test]
fn encrypt_rejects_weak_settings() {
    let weak = KdfSettings {
        n: 16,
        ..KdfSettings::scrypt()
    };
    assert!(matches!(
        encrypt(b"pw", b"data", &weak),
        Err(TodoVaultError::KeyDerivationFailed(_))
    ));
}
