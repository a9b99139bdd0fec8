use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

const PASSWORD_ENV: &str = "HASHNEST_PASSWORD";

pub fn read_password() -> Result<Zeroizing<String>> {
    //  HASHNEST_PASSWORD="supersecret" hashnest verify '$2b$10$...'
    if let Some(pw) = from_env() {
        return Ok(pw);
    }

    //  printf "%s" "$PW" | hashnest verify '$2b$10$...'
    if !io::stdin().is_terminal() {
        return from_stdin();
    }

    let pw = Zeroizing::new(rpassword::prompt_password("Password: ")?);
    if pw.is_empty() {
        bail!("no password provided");
    }
    Ok(pw)
}

/// Like [`read_password`], but an interactive prompt asks twice.
pub fn read_new_password_with_confirmation() -> Result<Zeroizing<String>> {
    if let Some(pw) = from_env() {
        return Ok(pw);
    }

    if !io::stdin().is_terminal() {
        return from_stdin();
    }

    let pw1 = Zeroizing::new(rpassword::prompt_password("New password: ")?);
    let pw2 = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);

    if pw1.is_empty() {
        bail!("password cannot be empty");
    }

    if pw1 != pw2 {
        bail!("passwords do not match");
    }

    Ok(pw1)
}

fn from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

fn from_stdin() -> Result<Zeroizing<String>> {
    let mut buf = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut buf)?;
    trim_newline(&mut buf);

    if buf.is_empty() {
        bail!("no password provided");
    }
    Ok(buf)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
