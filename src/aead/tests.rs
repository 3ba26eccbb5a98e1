use super::*;
use crate::catalog::CryptoAlg;
use crate::error::error_codes;
use crate::utils;

const AEAD_ALGS: [CryptoAlg; 4] = [
    CryptoAlg::Aes128Gcm,
    CryptoAlg::Aes192Gcm,
    CryptoAlg::Aes256Gcm,
    CryptoAlg::ChaCha20Poly1305,
];

fn supported_algs() -> impl Iterator<Item = CryptoAlg> {
    AEAD_ALGS
        .into_iter()
        .filter(|alg| AeadCipherContext::is_supported(*alg))
}

fn keyed(alg: CryptoAlg) -> AeadCipherContext {
    let key = utils::random_key(alg).unwrap();
    let mut ctx = AeadCipherContext::new();
    ctx.init(alg, &key, Mode::Encrypt).unwrap();
    ctx
}

#[test]
fn test_encrypt_decrypt_all_algorithms() {
    for alg in supported_algs() {
        let ctx = keyed(alg);
        let iv = utils::random_iv().unwrap();

        // Test data
        let plaintext = b"This is a test message for the data channel";
        let ad = b"Additional authenticated data";

        let mut sealed = vec![0u8; plaintext.len() + AUTH_TAG_LEN];
        let written = ctx.encrypt(plaintext, &mut sealed, &iv, ad).unwrap();
        assert_eq!(written, plaintext.len() + AUTH_TAG_LEN);

        // Verify ciphertext is not the same as plaintext
        assert_ne!(&sealed[..plaintext.len()], &plaintext[..]);

        let mut opened = vec![0u8; plaintext.len()];
        let read = ctx.decrypt(&sealed, &mut opened, &iv, None, ad).unwrap();
        assert_eq!(read, plaintext.len());
        assert_eq!(&opened[..], &plaintext[..], "{} round trip", alg);
    }
}

#[test]
fn test_empty_plaintext_and_ad() {
    for alg in supported_algs() {
        let ctx = keyed(alg);
        let iv = [0u8; IV_LEN];

        let sealed = ctx.encrypt_to_vec(b"", &iv, b"").unwrap();
        assert_eq!(sealed.len(), AUTH_TAG_LEN);

        let opened = ctx.decrypt_to_vec(&sealed, &iv, b"").unwrap();
        assert!(opened.is_empty());
    }
}

#[test]
fn test_oversized_buffers_are_accepted() {
    let ctx = keyed(CryptoAlg::Aes128Gcm);
    let iv = [7u8; IV_LEN];
    let plaintext = b"short";

    let mut sealed = [0xAAu8; 64];
    let written = ctx.encrypt(plaintext, &mut sealed, &iv, b"").unwrap();
    // Bytes past the tag are left alone
    assert!(sealed[written..].iter().all(|b| *b == 0xAA));

    let mut opened = [0u8; 64];
    let read = ctx.decrypt(&sealed[..written], &mut opened, &iv, None, b"").unwrap();
    assert_eq!(&opened[..read], plaintext);
}

#[test]
fn test_not_initialized() {
    let ctx = AeadCipherContext::new();
    assert_eq!(ctx.state(), ContextState::Uninitialized);
    assert_eq!(ctx.algorithm(), None);

    let iv = [0u8; IV_LEN];
    let mut out = [0u8; 64];

    let err = ctx.encrypt(b"data", &mut out, &iv, b"").unwrap_err();
    assert_eq!(err.error_code(), error_codes::NOT_INITIALIZED);

    let err = ctx.decrypt(&[0u8; 32], &mut out, &iv, None, b"").unwrap_err();
    assert_eq!(err.error_code(), error_codes::NOT_INITIALIZED);
}

#[test]
fn test_insufficient_key_material() {
    for alg in supported_algs() {
        let short_key = vec![0x11u8; alg.key_size() - 1];
        let mut ctx = AeadCipherContext::new();
        let err = ctx.init(alg, &short_key, Mode::Decrypt).unwrap_err();
        assert_eq!(err.error_code(), error_codes::INSUFFICIENT_KEY_MATERIAL);
        assert!(!ctx.is_initialized());

        let err = ctx.init(alg, &[], Mode::Decrypt).unwrap_err();
        assert_eq!(err.error_code(), error_codes::INSUFFICIENT_KEY_MATERIAL);
    }
}

#[test]
fn test_longer_key_material_uses_prefix() {
    // Static key material is usually longer than any one cipher needs
    let material = [0x5Au8; 64];
    let iv = [1u8; IV_LEN];

    let mut long = AeadCipherContext::new();
    long.init(CryptoAlg::Aes128Gcm, &material, Mode::Encrypt).unwrap();

    let mut exact = AeadCipherContext::new();
    exact.init(CryptoAlg::Aes128Gcm, &material[..16], Mode::Decrypt).unwrap();

    let sealed = long.encrypt_to_vec(b"payload", &iv, b"ad").unwrap();
    assert_eq!(exact.decrypt_to_vec(&sealed, &iv, b"ad").unwrap(), b"payload");
}

#[test]
fn test_unsupported_algorithms() {
    let key = [0u8; 64];
    for alg in [
        CryptoAlg::None,
        CryptoAlg::Aes128Cbc,
        CryptoAlg::Aes256Cbc,
        CryptoAlg::BfCbc,
    ] {
        assert!(!AeadCipherContext::is_supported(alg));
        let mut ctx = AeadCipherContext::new();
        let err = ctx.init(alg, &key, Mode::Encrypt).unwrap_err();
        assert_eq!(err.error_code(), error_codes::UNSUPPORTED_ALGORITHM);
        assert!(err.to_string().contains(alg.name()));
    }
}

#[test]
fn test_undefined_mode_is_rejected() {
    let mut ctx = AeadCipherContext::new();
    let err = ctx
        .init(CryptoAlg::Aes256Gcm, &[0u8; 32], Mode::Undefined)
        .unwrap_err();
    assert_eq!(err.error_code(), error_codes::INVALID_MODE);
    assert!(!ctx.is_initialized());
}

#[test]
fn test_failed_init_leaves_context_uninitialized() {
    let mut ctx = keyed(CryptoAlg::ChaCha20Poly1305);
    assert!(ctx.is_initialized());

    assert!(ctx.init(CryptoAlg::Aes256Gcm, &[0u8; 8], Mode::Encrypt).is_err());
    assert_eq!(ctx.state(), ContextState::Uninitialized);

    let mut out = [0u8; 32];
    let err = ctx.encrypt(b"x", &mut out, &[0u8; IV_LEN], b"").unwrap_err();
    assert_eq!(err.error_code(), error_codes::NOT_INITIALIZED);
}

#[test]
fn test_reinit_switches_backend() {
    let key = [0x33u8; 32];
    let iv = [9u8; IV_LEN];

    let mut ctx = AeadCipherContext::new();
    ctx.init(CryptoAlg::Aes256Gcm, &key, Mode::Encrypt).unwrap();
    assert_eq!(ctx.algorithm(), Some(CryptoAlg::Aes256Gcm));
    let gcm_sealed = ctx.encrypt_to_vec(b"hello", &iv, b"").unwrap();

    ctx.init(CryptoAlg::ChaCha20Poly1305, &key, Mode::Encrypt).unwrap();
    assert_eq!(ctx.algorithm(), Some(CryptoAlg::ChaCha20Poly1305));

    // Re-initialized context behaves exactly like a fresh one
    let mut fresh = AeadCipherContext::new();
    fresh.init(CryptoAlg::ChaCha20Poly1305, &key, Mode::Decrypt).unwrap();
    let sealed = ctx.encrypt_to_vec(b"hello", &iv, b"").unwrap();
    assert_eq!(sealed, fresh.encrypt_to_vec(b"hello", &iv, b"").unwrap());
    assert_ne!(sealed, gcm_sealed);

    // The GCM output no longer authenticates under the new backend
    let err = ctx.decrypt_to_vec(&gcm_sealed, &iv, b"").unwrap_err();
    assert!(err.is_authentication_failure());
}

#[test]
fn test_erase_is_idempotent() {
    let mut ctx = AeadCipherContext::new();
    ctx.erase();
    ctx.erase();
    assert!(!ctx.is_initialized());

    let mut ctx = keyed(CryptoAlg::Aes128Gcm);
    ctx.erase();
    assert_eq!(ctx.state(), ContextState::Uninitialized);
    ctx.erase();
    assert_eq!(ctx.algorithm(), None);
}

#[test]
fn test_iv_length_is_enforced() {
    let ctx = keyed(CryptoAlg::Aes256Gcm);
    let mut out = [0u8; 64];

    for bad in [&[0u8; 8][..], &[0u8; 16][..], &[][..]] {
        let err = ctx.encrypt(b"data", &mut out, bad, b"").unwrap_err();
        assert_eq!(err.error_code(), error_codes::INVALID_IV_LENGTH);

        let err = ctx.decrypt(&[0u8; 20], &mut out, bad, None, b"").unwrap_err();
        assert_eq!(err.error_code(), error_codes::INVALID_IV_LENGTH);
    }
}

#[test]
fn test_separate_tag_is_rejected() {
    let ctx = keyed(CryptoAlg::Aes128Gcm);
    let iv = [0u8; IV_LEN];
    let sealed = ctx.encrypt_to_vec(b"payload", &iv, b"").unwrap();
    let (ciphertext, tag) = sealed.split_at(sealed.len() - AUTH_TAG_LEN);

    let mut out = [0xEEu8; 32];
    let err = ctx
        .decrypt(ciphertext, &mut out, &iv, Some(tag), b"")
        .unwrap_err();
    assert_eq!(err.error_code(), error_codes::INVALID_TAG_CONVENTION);
    assert!(!err.is_authentication_failure());
    // Output untouched on argument errors
    assert!(out.iter().all(|b| *b == 0xEE));

    // Same with the tag supplied in both places
    let err = ctx.decrypt(&sealed, &mut out, &iv, Some(tag), b"").unwrap_err();
    assert_eq!(err.error_code(), error_codes::INVALID_TAG_CONVENTION);
}

#[test]
fn test_short_buffers() {
    let ctx = keyed(CryptoAlg::ChaCha20Poly1305);
    let iv = [0u8; IV_LEN];

    let mut small = [0u8; 10];
    let err = ctx.encrypt(b"ten bytes!", &mut small, &iv, b"").unwrap_err();
    assert_eq!(err.error_code(), error_codes::OUTPUT_BUFFER_TOO_SMALL);

    let err = ctx
        .decrypt(&[0u8; AUTH_TAG_LEN - 1], &mut small, &iv, None, b"")
        .unwrap_err();
    assert_eq!(err.error_code(), error_codes::INPUT_TOO_SHORT);

    let sealed = ctx.encrypt_to_vec(&[0u8; 20], &iv, b"").unwrap();
    let err = ctx.decrypt(&sealed, &mut small, &iv, None, b"").unwrap_err();
    assert_eq!(err.error_code(), error_codes::OUTPUT_BUFFER_TOO_SMALL);
}

#[test]
fn test_tampering_detection() {
    for alg in supported_algs() {
        let ctx = keyed(alg);
        let iv = utils::random_iv().unwrap();
        let plaintext = b"This is a test message for tampering detection";
        let ad = b"header";

        let sealed = ctx.encrypt_to_vec(plaintext, &iv, ad).unwrap();

        // Flip one bit in the ciphertext and one in the tag
        for index in [0, sealed.len() - 1] {
            let mut tampered = sealed.clone();
            tampered[index] ^= 0x01;

            let mut out = vec![0u8; plaintext.len()];
            let err = ctx.decrypt(&tampered, &mut out, &iv, None, ad).unwrap_err();
            assert!(err.is_authentication_failure(), "{} index {}", alg, index);
            // No unverified bytes are released
            assert!(out.iter().all(|b| *b == 0));
        }

        // Different AD must fail because AD is authenticated
        let err = ctx.decrypt_to_vec(&sealed, &iv, b"Header").unwrap_err();
        assert!(err.is_authentication_failure());

        // Missing AD must fail too
        let err = ctx.decrypt_to_vec(&sealed, &iv, b"").unwrap_err();
        assert!(err.is_authentication_failure());

        // Wrong IV
        let mut other_iv = iv;
        other_iv[0] ^= 0x80;
        let err = ctx.decrypt_to_vec(&sealed, &other_iv, ad).unwrap_err();
        assert!(err.is_authentication_failure());
    }
}

#[test]
fn test_authentication_failure_wipes_stale_output() {
    let ctx = keyed(CryptoAlg::Aes256Gcm);
    let iv = [3u8; IV_LEN];
    let mut sealed = ctx.encrypt_to_vec(b"secret", &iv, b"").unwrap();
    sealed[0] ^= 0xFF;

    // Output previously held unrelated data; it must not survive as "plaintext"
    let mut out = *b"previous!";
    assert!(ctx.decrypt(&sealed, &mut out, &iv, None, b"").is_err());
    assert_eq!(&out[..6], &[0u8; 6]);
    assert_eq!(&out[6..], b"us!");
}

#[test]
fn test_modes_do_not_change_output() {
    let key = [0x77u8; 32];
    let iv = [0u8; IV_LEN];

    let mut enc = AeadCipherContext::new();
    enc.init(CryptoAlg::Aes256Gcm, &key, Mode::Encrypt).unwrap();
    let mut dec = AeadCipherContext::new();
    dec.init(CryptoAlg::Aes256Gcm, &key, Mode::Decrypt).unwrap();

    assert_eq!(
        enc.encrypt_to_vec(b"same", &iv, b"ad").unwrap(),
        dec.encrypt_to_vec(b"same", &iv, b"ad").unwrap()
    );
}

#[test]
fn test_backend_debug_hides_key() {
    let ctx = keyed(CryptoAlg::Aes128Gcm);
    let debug = format!("{:?}", ctx);
    assert!(debug.contains("AES-128-GCM"));
    assert!(debug.contains("[AES-GCM Cipher]"));

    let ctx = keyed(CryptoAlg::ChaCha20Poly1305);
    assert!(format!("{:?}", ctx).contains("[ChaCha20-Poly1305 Cipher]"));
}

#[test]
fn test_tag_convention_is_fixed() {
    assert!(AeadCipherContext::requires_authtag_at_end());
    assert_eq!(IV_LEN, 12);
    assert_eq!(AUTH_TAG_LEN, 16);
    assert_eq!(CHACHA20_POLY1305_KEY_SIZE, 32);
}

#[test]
fn test_context_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AeadCipherContext>();
}

#[test]
fn test_status_codes_are_distinct() {
    let codes = [
        status::GCM_BAD_KEY,
        status::GCM_BAD_INPUT,
        status::GCM_AUTH_FAILED,
        status::CHACHAPOLY_BAD_KEY,
        status::CHACHAPOLY_BAD_STATE,
        status::CHACHAPOLY_AUTH_FAILED,
    ];
    for (i, a) in codes.iter().enumerate() {
        assert!(*a < 0);
        for b in &codes[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
