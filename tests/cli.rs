use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cryptstring"));
    cmd.env_remove("CRYPTSTRING_ALGORITHM")
        .env_remove("CRYPTSTRING_SALT_LEN")
        .env_remove("CRYPTSTRING_PLAINTEXT");
    cmd
}

fn fast_argon2(cmd: &mut Command) -> &mut Command {
    cmd.arg("--algorithm")
        .arg("argon2")
        .arg("--argon-mem")
        .arg("8")
        .arg("--argon-time")
        .arg("1")
}

fn line_value(stdout: &str, label: &str) -> String {
    stdout
        .lines()
        .find_map(|l| l.strip_prefix(label))
        .unwrap()
        .trim()
        .to_string()
}

#[test]
fn salt_prints_requested_length() {
    let output = bin()
        .arg("salt")
        .arg("--salt-len")
        .arg("8")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let salt = String::from_utf8(output).unwrap();
    let salt = salt.trim();
    assert_eq!(salt.len(), 8);
    assert!(salt.chars().all(|c| c == '.' || c == '/' || c.is_ascii_alphanumeric()));
}

#[test]
fn salt_length_above_the_cap_is_rejected() {
    for len in [65, usize::MAX] {
        bin()
            .arg("salt")
            .arg("--salt-len")
            .arg(len.to_string())
            .assert()
            .failure()
            .stderr(predicate::str::contains("exceeds the maximum of 64"));
    }
}

#[test]
fn encrypt_with_known_salt() {
    bin()
        .env("CRYPTSTRING_PLAINTEXT", "password")
        .arg("encrypt")
        .arg("--salt")
        .arg("xO")
        .assert()
        .success()
        .stdout(predicate::str::contains("Salt: xO"))
        .stdout(predicate::str::contains("Hashed: xOAFZqRz5RduI"))
        .stdout(predicate::str::contains("password").not());
}

#[test]
fn encrypt_reads_plaintext_from_stdin() {
    bin()
        .arg("encrypt")
        .arg("--salt")
        .arg("aZ")
        .write_stdin("test\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hashed: aZGJuE6EXrjEE"));
}

#[test]
fn encrypt_with_malformed_salt_fails() {
    bin()
        .env("CRYPTSTRING_PLAINTEXT", "password")
        .arg("encrypt")
        .arg("--salt")
        .arg("!!")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Encryption failed."));
}

#[test]
fn encrypt_then_verify_roundtrip() {
    let output = bin()
        .env("CRYPTSTRING_PLAINTEXT", "hunter2")
        .arg("encrypt")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let salt = line_value(&stdout, "Salt:");
    let hash = line_value(&stdout, "Hashed:");

    bin()
        .env("CRYPTSTRING_PLAINTEXT", "hunter2")
        .arg("verify")
        .arg("--hash")
        .arg(&hash)
        .arg("--salt")
        .arg(&salt)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ciphertext matches the salt."));

    bin()
        .env("CRYPTSTRING_PLAINTEXT", "wrong")
        .arg("verify")
        .arg("--hash")
        .arg(&hash)
        .arg("--salt")
        .arg(&salt)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ciphertext does not match the salt."));
}

#[test]
fn verify_with_malformed_salt_is_an_error_not_a_mismatch() {
    bin()
        .env("CRYPTSTRING_PLAINTEXT", "password")
        .arg("verify")
        .arg("--hash")
        .arg("xOAFZqRz5RduI")
        .arg("--salt")
        .arg("!")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Verification failed."))
        .stdout(predicate::str::contains("does not match").not());
}

#[test]
fn verify_with_corrupted_argon2_hash_is_an_error_not_a_mismatch() {
    let output = fast_argon2(&mut bin())
        .env("CRYPTSTRING_PLAINTEXT", "pw")
        .arg("encrypt")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let salt = line_value(&stdout, "Salt:");
    let hash = line_value(&stdout, "Hashed:");
    assert!(hash.contains(",p=1$"));

    bin()
        .env("CRYPTSTRING_PLAINTEXT", "pw")
        .arg("verify")
        .arg("--hash")
        .arg(hash.replace(",p=1$", ",p=0$"))
        .arg("--salt")
        .arg(&salt)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Verification failed."))
        .stdout(predicate::str::contains("does not match").not());
}

#[test]
fn verify_warns_when_algorithm_flag_disagrees_with_hash() {
    bin()
        .env("CRYPTSTRING_PLAINTEXT", "password")
        .arg("--algorithm")
        .arg("argon2")
        .arg("verify")
        .arg("--hash")
        .arg("xOAFZqRz5RduI")
        .arg("--salt")
        .arg("xO")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ciphertext matches the salt."))
        .stderr(predicate::str::contains("ignoring --algorithm"));

    bin()
        .env("CRYPTSTRING_PLAINTEXT", "password")
        .arg("--algorithm")
        .arg("des")
        .arg("verify")
        .arg("--hash")
        .arg("xOAFZqRz5RduI")
        .arg("--salt")
        .arg("xO")
        .assert()
        .success()
        .stderr(predicate::str::contains("ignoring --algorithm").not());
}

#[test]
fn verify_requires_hash_and_salt_or_record() {
    bin()
        .env("CRYPTSTRING_PLAINTEXT", "password")
        .arg("verify")
        .arg("--hash")
        .arg("xOAFZqRz5RduI")
        .assert()
        .failure();

    bin()
        .env("CRYPTSTRING_PLAINTEXT", "password")
        .arg("verify")
        .assert()
        .failure();
}

#[test]
fn argon2_record_file_roundtrip() {
    let dir = tempdir().unwrap();
    let record = dir.path().join("alice.json");

    fast_argon2(&mut bin())
        .env("CRYPTSTRING_PLAINTEXT", "correct horse")
        .arg("encrypt")
        .arg("--out")
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("Hashed: $argon2id$v=19$m=8,t=1,p=1$"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&record).unwrap()).unwrap();
    assert_eq!(json["algorithm"], "argon2id");
    assert_eq!(json["salt"].as_str().unwrap().len(), 16);

    // parameters are recovered from the stored hash, not from the defaults
    bin()
        .env("CRYPTSTRING_PLAINTEXT", "correct horse")
        .arg("verify")
        .arg("--record")
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ciphertext matches the salt."));

    bin()
        .env("CRYPTSTRING_PLAINTEXT", "battery staple")
        .arg("verify")
        .arg("--record")
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ciphertext does not match the salt."));
}

#[test]
fn encrypt_refuses_to_overwrite_record_without_force() {
    let dir = tempdir().unwrap();
    let record = dir.path().join("bob.json");

    bin()
        .env("CRYPTSTRING_PLAINTEXT", "pw")
        .arg("encrypt")
        .arg("--out")
        .arg(&record)
        .assert()
        .success();

    bin()
        .env("CRYPTSTRING_PLAINTEXT", "pw")
        .arg("encrypt")
        .arg("--out")
        .arg(&record)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    bin()
        .env("CRYPTSTRING_PLAINTEXT", "pw2")
        .arg("encrypt")
        .arg("--out")
        .arg(&record)
        .arg("--force")
        .assert()
        .success();

    bin()
        .env("CRYPTSTRING_PLAINTEXT", "pw2")
        .arg("verify")
        .arg("--record")
        .arg(&record)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ciphertext matches the salt."));
}

#[test]
fn encrypt_json_output() {
    let output = bin()
        .env("CRYPTSTRING_PLAINTEXT", "password")
        .arg("encrypt")
        .arg("--salt")
        .arg("xO")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["algorithm"], "des-crypt");
    assert_eq!(json["hash"], "xOAFZqRz5RduI");
    assert_eq!(json["salt"], "xO");
}

#[test]
fn verify_missing_record_fails() {
    let dir = tempdir().unwrap();

    bin()
        .env("CRYPTSTRING_PLAINTEXT", "pw")
        .arg("verify")
        .arg("--record")
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn unknown_algorithm_is_rejected() {
    bin()
        .arg("--algorithm")
        .arg("md5")
        .arg("salt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown algorithm"));
}

#[test]
fn invalid_argon2_parameters_are_rejected() {
    bin()
        .arg("--argon-mem")
        .arg("0")
        .arg("salt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid Argon2 parameters"));
}
