use super::*;

fn validator() -> Validator {
    Validator::new(&Config::default()).unwrap()
}

fn magnet_with_hash(hash: &str) -> String {
    format!("magnet:?xt=urn:btih:{hash}")
}

#[test]
fn empty_and_whitespace_are_rejected() {
    let v = validator();
    assert_eq!(v.validate(""), Err(ValidationError::EmptyReference));
    assert_eq!(v.validate("   \t\n"), Err(ValidationError::EmptyReference));
}

#[test]
fn non_ascii_hash_characters_are_not_a_magnet() {
    let v = validator();
    // KELVIN SIGN folds to 'k' under Unicode case folding.
    let input = magnet_with_hash(&"\u{212A}".repeat(32));
    assert_eq!(
        v.validate(&input),
        Err(ValidationError::UnrecognizedReference {
            input: input.clone(),
            extension: ".torrent".to_string(),
        })
    );
}

#[test]
fn magnet_hash_lengths_32_to_40_are_accepted() {
    let v = validator();
    for len in 32..=40 {
        let input = magnet_with_hash(&"a1".repeat(20)[..len]);
        match v.validate(&input).map(Reference::into_kind) {
            Ok(ReferenceKind::Magnet(uri)) => assert_eq!(uri, input),
            other => panic!("length {len}: expected magnet, got {other:?}"),
        }
    }
}

#[test]
fn magnet_with_trailing_parameters_is_accepted() {
    let v = validator();
    let input = format!(
        "{}&dn=debian-12.iso&tr=udp%3A%2F%2Ftracker.example%3A1337",
        magnet_with_hash("c9e15763f722f23e98a29decdfae341b98d53056")
    );
    assert!(matches!(
        v.validate(&input).map(Reference::into_kind),
        Ok(ReferenceKind::Magnet(_))
    ));
}

#[test]
fn magnet_prefix_is_case_insensitive() {
    let v = validator();
    let input = "MAGNET:?XT=URN:BTIH:C9E15763F722F23E98A29DECDFAE341B98D53056";
    assert!(matches!(
        v.validate(input).map(Reference::into_kind),
        Ok(ReferenceKind::Magnet(_))
    ));
}

#[test]
fn magnet_hash_out_of_range_is_rejected() {
    let v = validator();
    for len in [0usize, 1, 31, 41, 50] {
        let input = magnet_with_hash(&"b".repeat(len));
        assert!(
            v.validate(&input).is_err(),
            "length {len} should not validate"
        );
    }
}

#[test]
fn magnet_hash_with_disallowed_characters_is_rejected() {
    let v = validator();
    let mut hash = "c".repeat(39);
    hash.push('-');
    assert_eq!(
        v.validate(&magnet_with_hash(&hash)),
        Err(ValidationError::UnrecognizedReference {
            input: magnet_with_hash(&hash),
            extension: ".torrent".to_string(),
        })
    );
    assert!(v.validate(&magnet_with_hash(&"z!".repeat(18))).is_err());
}

#[test]
fn existing_descriptor_file_is_accepted_case_insensitively() {
    let v = validator();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo.TORRENT");
    std::fs::write(&path, b"d4:infod4:name3:fooee").unwrap();

    let input = path.to_string_lossy().into_owned();
    assert_eq!(
        v.validate(&input).map(Reference::into_kind),
        Ok(ReferenceKind::LocalDescriptor(path))
    );
}

#[test]
fn existing_file_with_other_extension_is_wrong_extension() {
    let v = validator();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo.txt");
    std::fs::write(&path, b"not a torrent").unwrap();

    let input = path.to_string_lossy().into_owned();
    assert_eq!(
        v.validate(&input),
        Err(ValidationError::WrongExtension {
            input,
            extension: ".torrent".to_string(),
        })
    );
}

#[test]
fn missing_local_file_is_unrecognized() {
    let v = validator();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("gone.torrent").to_string_lossy().into_owned();
    assert!(matches!(
        v.validate(&input),
        Err(ValidationError::UnrecognizedReference { .. })
    ));
}

#[test]
fn remote_descriptor_url_is_accepted() {
    let v = validator();
    match v.validate("https://x.test/a.torrent").map(Reference::into_kind) {
        Ok(ReferenceKind::RemoteDescriptor(url)) => assert_eq!(url.path(), "/a.torrent"),
        other => panic!("expected remote descriptor, got {other:?}"),
    }
    assert!(v.validate("http://x.test/dir/B.Torrent?x=1").is_ok());
}

#[test]
fn remote_url_with_other_extension_is_wrong_extension() {
    let v = validator();
    assert_eq!(
        v.validate("https://x.test/a.zip"),
        Err(ValidationError::WrongExtension {
            input: "https://x.test/a.zip".to_string(),
            extension: ".torrent".to_string(),
        })
    );
}

#[test]
fn extension_only_in_query_does_not_count() {
    let v = validator();
    assert!(matches!(
        v.validate("https://x.test/download?file=a.torrent"),
        Err(ValidationError::WrongExtension { .. })
    ));
}

#[test]
fn plain_words_are_unrecognized() {
    let v = validator();
    assert!(matches!(
        v.validate("debian iso please"),
        Err(ValidationError::UnrecognizedReference { .. })
    ));
    // scheme without host
    assert!(matches!(
        v.validate("file.torrent:"),
        Err(ValidationError::UnrecognizedReference { .. })
    ));
}

#[test]
fn invalid_configured_pattern_is_a_config_error() {
    let cfg = Config {
        magnet_pattern: "(unclosed".to_string(),
        ..Config::default()
    };
    assert!(matches!(
        Validator::new(&cfg),
        Err(ConfigError::InvalidPattern { .. })
    ));
}

#[test]
fn configured_extension_is_honored() {
    let cfg = Config {
        descriptor_extension: ".META".to_string(),
        ..Config::default()
    };
    let v = Validator::new(&cfg).unwrap();
    assert_eq!(v.extension(), ".meta");
    assert!(v.validate("https://x.test/a.meta").is_ok());
    assert!(v.validate("https://x.test/a.torrent").is_err());
}

#[test]
fn clean_input_strips_quotes_and_whitespace() {
    assert_eq!(clean_input("  '/tmp/a b.torrent'\n"), "/tmp/a b.torrent");
    assert_eq!(clean_input("\"magnet:?xt=urn:btih:abc\""), "magnet:?xt=urn:btih:abc");
    assert_eq!(clean_input("   "), "");
}

#[test]
fn display_shows_the_original_reference() {
    let v = validator();
    let r = v.validate("https://x.test/a.torrent").unwrap();
    assert_eq!(r.to_string(), "https://x.test/a.torrent");
}
