//! Plaintext input for the CLI.

use anyhow::{Result, bail};
use std::io::{self, IsTerminal};
use zeroize::Zeroizing;

pub const PLAINTEXT_ENV: &str = "CRYPTSTRING_PLAINTEXT";

/// Reads the plaintext to hash or verify.
///
/// Sources, in order: the `CRYPTSTRING_PLAINTEXT` environment variable, one
/// line of piped stdin, then an echo-free terminal prompt. An empty
/// plaintext is returned as-is; flagging it is up to the caller.
pub fn read_plaintext(prompt: &str) -> Result<Zeroizing<String>> {
    //  CRYPTSTRING_PLAINTEXT="hunter2" cryptstring encrypt
    if let Ok(pt) = std::env::var(PLAINTEXT_ENV) {
        return Ok(Zeroizing::new(pt));
    }

    //  echo "hunter2" | cryptstring encrypt
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        if io::stdin().read_line(&mut buf)? == 0 {
            bail!("no plaintext provided");
        }
        trim_newline(&mut buf);
        return Ok(buf);
    }

    let pt = rpassword::prompt_password(prompt)?;
    Ok(Zeroizing::new(pt))
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
