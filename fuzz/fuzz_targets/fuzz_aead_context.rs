#![no_main]

use aead_context::prelude::*;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct AeadFuzzInput {
    algorithm: u8,
    key: Vec<u8>,
    iv: Vec<u8>,
    associated_data: Vec<u8>,
    plaintext: Vec<u8>,
    ciphertext: Vec<u8>,
    output_len: u16,
}

fuzz_target!(|input: AeadFuzzInput| {
    let algs = CryptoAlg::all();
    let alg = algs[input.algorithm as usize % algs.len()];

    let mut ctx = AeadCipherContext::new();
    if ctx.init(alg, &input.key, Mode::Encrypt).is_err() {
        assert!(!ctx.is_initialized());
        return;
    }

    // Round trip must hold for any accepted input
    if let Ok(sealed) = ctx.encrypt_to_vec(&input.plaintext, &input.iv, &input.associated_data) {
        let opened = ctx
            .decrypt_to_vec(&sealed, &input.iv, &input.associated_data)
            .expect("round trip");
        assert_eq!(opened, input.plaintext);
    }

    // Arbitrary ciphertext must never yield plaintext alongside an error
    let mut output = vec![0u8; input.output_len as usize];
    match ctx.decrypt(&input.ciphertext, &mut output, &input.iv, None, &input.associated_data) {
        Ok(len) => assert!(len <= output.len()),
        Err(err) if err.is_authentication_failure() => {
            let len = input.ciphertext.len() - AUTH_TAG_LEN;
            assert!(output[..len].iter().all(|b| *b == 0));
        }
        Err(_) => {}
    }
});
