//! Reads a password from stdin and prints its argon2 PHC string, ready to be
//! stored in `employees.password`.

use std::io::{self, BufRead};

use anyhow::{Context, anyhow};
use pms::auth::password::hash_password;

fn main() -> anyhow::Result<()> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(anyhow!("password must not be empty"));
    }

    let hashed = hash_password(password).map_err(|e| anyhow!("failed to hash password: {e}"))?;
    println!("{hashed}");
    Ok(())
}
