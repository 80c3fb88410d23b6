use evdb_rs::md5_hex;

#[test]
fn test_md5_hex_known_vectors() {
    assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(md5_hex(b"secret"), "5ebe2294ecd0e0f08eab7690d2a6ee69");
}

#[test]
fn test_md5_hex_is_lowercase() {
    let digest = md5_hex(b"Anything At All");
    assert_eq!(digest, digest.to_ascii_lowercase());
    assert_eq!(digest.len(), 32);
}

#[test]
fn test_login_response_digest_composition() {
    // The wire contract: response = md5("<nonce>:" + md5(password)), both
    // hex-encoded lowercase.
    let pass_digest = md5_hex(b"secret");
    let response = md5_hex(format!("abc123:{pass_digest}").as_bytes());
    assert_eq!(response, "9b69f2ea3eab1291c7f80769d9e0052a");
}
